use crate::binder::bind_untyped;
use crate::error::{child_path, index_path, ValidationError};
use crate::mapper::render_untyped;
use crate::value::PropertyValue;
use serde_json::{json, Map, Value};

/// Pseudo parameters, usable as `Ref` targets without being declared
pub mod pseudo {
    pub const ACCOUNT_ID: &str = "AWS::AccountId";
    pub const PARTITION: &str = "AWS::Partition";
    pub const REGION: &str = "AWS::Region";
    pub const STACK_NAME: &str = "AWS::StackName";
    pub const URL_SUFFIX: &str = "AWS::URLSuffix";
}

/// CloudFormation intrinsic function, resolved at deploy time
#[derive(Debug, Clone, PartialEq)]
pub enum Intrinsic {
    Ref(String),
    GetAtt {
        logical_id: String,
        attribute: String,
    },
    Sub(String),
    Join {
        delimiter: String,
        values: Vec<PropertyValue>,
    },
    Select {
        index: usize,
        list: Box<PropertyValue>,
    },
    Split {
        delimiter: String,
        source: Box<PropertyValue>,
    },
}

impl Intrinsic {
    pub fn reference(logical_id: impl Into<String>) -> Self {
        Intrinsic::Ref(logical_id.into())
    }

    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Intrinsic::GetAtt {
            logical_id: logical_id.into(),
            attribute: attribute.into(),
        }
    }

    pub fn sub(template: impl Into<String>) -> Self {
        Intrinsic::Sub(template.into())
    }

    pub fn join(delimiter: impl Into<String>, values: Vec<PropertyValue>) -> Self {
        Intrinsic::Join {
            delimiter: delimiter.into(),
            values,
        }
    }

    pub fn select(index: usize, list: impl Into<PropertyValue>) -> Self {
        Intrinsic::Select {
            index,
            list: Box::new(list.into()),
        }
    }

    pub fn split(delimiter: impl Into<String>, source: impl Into<PropertyValue>) -> Self {
        Intrinsic::Split {
            delimiter: delimiter.into(),
            source: Box::new(source.into()),
        }
    }

    pub(crate) fn render(&self, path: &str) -> Result<Value, ValidationError> {
        Ok(match self {
            Intrinsic::Ref(logical_id) => json!({ "Ref": logical_id }),
            Intrinsic::GetAtt {
                logical_id,
                attribute,
            } => json!({ "Fn::GetAtt": [logical_id, attribute] }),
            Intrinsic::Sub(template) => json!({ "Fn::Sub": template }),
            Intrinsic::Join { delimiter, values } => {
                let values = values
                    .iter()
                    .enumerate()
                    .map(|(i, value)| render_untyped(value, &index_path(path, i)))
                    .collect::<Result<Vec<_>, _>>()?;

                json!({ "Fn::Join": [delimiter, values] })
            }
            Intrinsic::Select { index, list } => {
                json!({ "Fn::Select": [index, render_untyped(list, path)?] })
            }
            Intrinsic::Split { delimiter, source } => {
                json!({ "Fn::Split": [delimiter, render_untyped(source, path)?] })
            }
        })
    }

    /// Recognize an intrinsic function object in raw input
    ///
    /// Returns `None` for anything that is not a single-key object keyed by
    /// `Ref` or `Fn::*`.
    pub(crate) fn parse(raw: &Value, path: &str) -> Result<Option<Self>, ValidationError> {
        let Some((name, args)) = single_entry(raw) else {
            return Ok(None);
        };

        if name != "Ref" && !name.starts_with("Fn::") {
            return Ok(None);
        }

        let path = child_path(path, name);
        let invalid = |reason: &str| ValidationError::InvalidIntrinsic {
            path: path.clone(),
            reason: reason.to_string(),
        };

        let intrinsic = match name.as_str() {
            "Ref" => Intrinsic::Ref(
                args.as_str()
                    .ok_or_else(|| invalid("expects a logical ID"))?
                    .to_string(),
            ),

            "Fn::GetAtt" => match args {
                // Short form "Resource.Attribute"
                Value::String(target) => {
                    let (logical_id, attribute) = target
                        .split_once('.')
                        .ok_or_else(|| invalid("expects `LogicalId.Attribute`"))?;

                    Intrinsic::get_att(logical_id, attribute)
                }
                Value::Array(items) => match items.as_slice() {
                    [Value::String(logical_id), Value::String(attribute)] => {
                        Intrinsic::get_att(logical_id, attribute)
                    }
                    _ => return Err(invalid("expects [LogicalId, Attribute]")),
                },
                _ => return Err(invalid("expects [LogicalId, Attribute]")),
            },

            "Fn::Sub" => Intrinsic::Sub(
                args.as_str()
                    .ok_or_else(|| invalid("only the string form is supported"))?
                    .to_string(),
            ),

            "Fn::Join" => match args.as_array().map(Vec::as_slice) {
                Some([Value::String(delimiter), Value::Array(values)]) => Intrinsic::Join {
                    delimiter: delimiter.clone(),
                    values: values
                        .iter()
                        .enumerate()
                        .map(|(i, value)| bind_untyped(value, &index_path(&path, i)))
                        .collect::<Result<_, _>>()?,
                },
                _ => return Err(invalid("expects [Delimiter, [Values]]")),
            },

            "Fn::Select" => match args.as_array().map(Vec::as_slice) {
                Some([index, list]) => Intrinsic::Select {
                    index: select_index(index).ok_or_else(|| invalid("expects a list index"))?,
                    list: Box::new(bind_untyped(list, &path)?),
                },
                _ => return Err(invalid("expects [Index, List]")),
            },

            "Fn::Split" => match args.as_array().map(Vec::as_slice) {
                Some([Value::String(delimiter), source]) => Intrinsic::Split {
                    delimiter: delimiter.clone(),
                    source: Box::new(bind_untyped(source, &path)?),
                },
                _ => return Err(invalid("expects [Delimiter, Source]")),
            },

            _ => return Err(invalid("unsupported function")),
        };

        Ok(Some(intrinsic))
    }
}

fn single_entry(raw: &Value) -> Option<(&String, &Value)> {
    let object: &Map<String, Value> = raw.as_object()?;

    if object.len() != 1 {
        return None;
    }

    object.iter().next()
}

/// Index of Fn::Select, which CloudFormation accepts as a number or a numeric string
fn select_index(raw: &Value) -> Option<usize> {
    match raw {
        Value::Number(number) => number.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(string) => string.parse().ok(),
        _ => None,
    }
}
