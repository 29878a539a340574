pub mod stacks;
pub mod synth;
pub mod types;
pub mod validate;
use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Synthesize a CloudFormation template from a built-in stack or a stack file
    Synth(synth::SynthCommand),

    /// Check a stack file without writing a template
    Validate(validate::ValidateCommand),

    /// List built-in stacks
    Stacks(stacks::StacksCommand),

    /// List supported resource types, or describe the properties of one
    Types(types::TypesCommand),
}
