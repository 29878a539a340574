//! Typed bindings for the CloudFormation resources Stratus knows about.
//!
//! Each resource is a plain struct: required properties are plain fields,
//! optional ones are `Option`s, and nested property types are structs of
//! their own.

pub mod b2bi;
pub mod ec2;
pub mod ecs;
pub mod events;
pub mod iam;
pub mod kinesisanalytics;
pub mod lambda;
pub mod logs;
pub mod secretsmanager;
mod tag;

pub use tag::Tag;

use stratus_template::Registry;

/// Registry with every bound resource type, for binding stack files
pub fn registry() -> Registry {
    Registry::new()
        .with::<b2bi::Capability>()
        .with::<b2bi::Partnership>()
        .with::<b2bi::Profile>()
        .with::<b2bi::Transformer>()
        .with::<ec2::SecurityGroup>()
        .with::<ec2::Subnet>()
        .with::<ec2::Vpc>()
        .with::<ecs::Cluster>()
        .with::<ecs::Service>()
        .with::<ecs::TaskDefinition>()
        .with::<events::Rule>()
        .with::<iam::Role>()
        .with::<kinesisanalytics::Application>()
        .with::<lambda::Function>()
        .with::<lambda::Permission>()
        .with::<logs::LogGroup>()
        .with::<secretsmanager::Secret>()
}
