use eyre::{bail, eyre};
use saphyr_parser_bw::{Event, Parser, ScalarStyle, Span, Tag};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

/// Intrinsic functions written with a short tag, e.g. `!GetAtt Role.Arn`
const SHORT_FORMS: [(&str, &str); 17] = [
    ("Ref", "Ref"),
    ("Condition", "Condition"),
    ("GetAtt", "Fn::GetAtt"),
    ("Sub", "Fn::Sub"),
    ("Join", "Fn::Join"),
    ("Select", "Fn::Select"),
    ("Split", "Fn::Split"),
    ("Base64", "Fn::Base64"),
    ("Cidr", "Fn::Cidr"),
    ("FindInMap", "Fn::FindInMap"),
    ("GetAZs", "Fn::GetAZs"),
    ("ImportValue", "Fn::ImportValue"),
    ("If", "Fn::If"),
    ("Equals", "Fn::Equals"),
    ("And", "Fn::And"),
    ("Or", "Fn::Or"),
    ("Not", "Fn::Not"),
];

/// Parse a CloudFormation YAML document into JSON
///
/// Short intrinsic tags are expanded to their long form, so `!Ref Bucket`
/// becomes `{"Ref": "Bucket"}`. Any other local tag is an error.
pub(crate) fn parse(text: &str) -> eyre::Result<Value> {
    let events = Parser::new_from_str(text)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| eyre!("{e}"))?;

    let mut loader = Loader {
        events: events.into_iter(),
        anchors: HashMap::new(),
    };

    loader.document()
}

struct Loader<'a> {
    events: std::vec::IntoIter<(Event<'a>, Span)>,

    /// Values of anchored nodes by anchor ID, for aliases
    anchors: HashMap<usize, Value>,
}

impl<'a> Loader<'a> {
    fn document(&mut self) -> eyre::Result<Value> {
        while matches!(
            self.peek(),
            Some(Event::StreamStart) | Some(Event::DocumentStart(_))
        ) {
            self.next()?;
        }

        // Empty file
        if matches!(self.peek(), Some(Event::StreamEnd) | None) {
            return Ok(Value::Null);
        }

        let value = self.node()?;

        while let Some((event, span)) = self.events.next() {
            if matches!(event, Event::DocumentStart(_)) {
                bail!("A stack file holds a single document, another one starts at line {}", span.start.line());
            }
        }

        Ok(value)
    }

    fn node(&mut self) -> eyre::Result<Value> {
        let (event, span) = self.next()?;

        match event {
            Event::Alias(id) => self
                .anchors
                .get(&id)
                .cloned()
                .ok_or_else(|| eyre!("Unknown alias at line {}", span.start.line())),

            Event::Scalar(text, style, anchor, tag) => {
                let value = match tag.as_deref() {
                    Some(tag) if tag.is_yaml_core_schema() => core_scalar(&text, tag, &span)?,
                    // Short intrinsic forms and `! value` take the scalar as written
                    Some(_) => Value::String(text.to_string()),
                    None => resolve(&text, style),
                };

                self.finish(value, anchor, tag.as_deref(), &span)
            }

            Event::SequenceStart(anchor, tag) => {
                let mut values = vec![];

                while !matches!(self.peek(), Some(Event::SequenceEnd)) {
                    values.push(self.node()?);
                }

                self.next()?;
                self.finish(Value::Array(values), anchor, tag.as_deref(), &span)
            }

            Event::MappingStart(anchor, tag) => {
                let mut mapping = Map::new();

                while !matches!(self.peek(), Some(Event::MappingEnd)) {
                    let key = match self.node()? {
                        Value::String(key) => key,
                        Value::Null => bail!("Empty key at line {}", span.start.line()),
                        other => other.to_string(),
                    };

                    let value = self.node()?;

                    if mapping.contains_key(&key) {
                        bail!("Duplicate key `{key}` in the mapping at line {}", span.start.line());
                    }

                    mapping.insert(key, value);
                }

                self.next()?;
                self.finish(Value::Object(mapping), anchor, tag.as_deref(), &span)
            }

            _ => Err(eyre!("Unexpected YAML structure at line {}", span.start.line())),
        }
    }

    /// Apply the tag of a node and remember it under its anchor
    fn finish(
        &mut self,
        value: Value,
        anchor: usize,
        tag: Option<&Tag>,
        span: &Span,
    ) -> eyre::Result<Value> {
        let value = match tag {
            Some(tag) if tag.handle == "!" && !tag.suffix.is_empty() => {
                let Some((_, function)) = SHORT_FORMS.iter().find(|(short, _)| *short == tag.suffix)
                else {
                    bail!("Unknown tag `{tag}` at line {}", span.start.line());
                };

                Value::Object(Map::from_iter([(function.to_string(), value)]))
            }
            Some(tag) if !tag.is_yaml_core_schema() && tag.handle != "!" => {
                bail!("Unknown tag `{tag}` at line {}", span.start.line())
            }
            _ => value,
        };

        // Anchor IDs start from 1
        if anchor > 0 {
            self.anchors.insert(anchor, value.clone());
        }

        Ok(value)
    }

    fn peek(&self) -> Option<&Event<'a>> {
        self.events.as_slice().first().map(|(event, _)| event)
    }

    fn next(&mut self) -> eyre::Result<(Event<'a>, Span)> {
        self.events
            .next()
            .ok_or_else(|| eyre!("Unexpected end of the YAML document"))
    }
}

/// Scalar with an explicit core schema tag, e.g. `!!str 2012-10-17`
fn core_scalar(text: &str, tag: &Tag, span: &Span) -> eyre::Result<Value> {
    let invalid = || eyre!("`{text}` is not a valid {tag} at line {}", span.start.line());

    Ok(match tag.suffix.as_str() {
        "str" => Value::String(text.to_string()),
        "null" => Value::Null,
        "bool" => match resolve(text, ScalarStyle::Plain) {
            Value::Bool(value) => Value::Bool(value),
            _ => return Err(invalid()),
        },
        "int" => match resolve(text, ScalarStyle::Plain) {
            Value::Number(number) if number.is_i64() || number.is_u64() => Value::Number(number),
            _ => return Err(invalid()),
        },
        "float" => match resolve(text, ScalarStyle::Plain) {
            Value::Number(number) => Value::Number(number),
            _ => return Err(invalid()),
        },
        _ => resolve(text, ScalarStyle::Plain),
    })
}

/// Type of an untagged scalar, following the YAML 1.2 core schema
///
/// Quoted scalars are always strings. Floats JSON can not hold (`.inf`, `.nan`)
/// stay strings.
fn resolve(text: &str, style: ScalarStyle) -> Value {
    if style != ScalarStyle::Plain {
        return Value::String(text.to_string());
    }

    match text {
        "" | "~" | "null" | "Null" | "NULL" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }

    if let Some(number) = integer(text) {
        return Value::Number(number);
    }

    let numeric = text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'));

    if numeric {
        if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    }

    Value::String(text.to_string())
}

fn integer(text: &str) -> Option<Number> {
    if let Some(hex) = text.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).ok().map(Number::from);
    }

    if let Some(octal) = text.strip_prefix("0o") {
        return i64::from_str_radix(octal, 8).ok().map(Number::from);
    }

    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    text.parse::<i64>()
        .ok()
        .map(Number::from)
        .or_else(|| text.parse::<u64>().ok().map(Number::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        let value = parse(
            r#"
Name: app
Count: 3
Negative: -7
Ratio: 0.5
Enabled: true
Missing: ~
Version: 2012-10-17
Quoted: "42"
Forced: !!str 10
Mode: 0o644
"#,
        )
        .unwrap();

        assert_eq!(
            value,
            json!({
                "Name": "app",
                "Count": 3,
                "Negative": -7,
                "Ratio": 0.5,
                "Enabled": true,
                "Missing": null,
                "Version": "2012-10-17",
                "Quoted": "42",
                "Forced": "10",
                "Mode": 420
            })
        );
    }

    #[test]
    fn test_short_intrinsics() {
        let value = parse(
            r#"
Role: !GetAtt HandlerRole.Arn
Bucket: !Ref Bucket
Name: !Sub "${AWS::StackName}-handler"
Arn: !Join [":", [arn, !Ref "AWS::Partition", s3]]
First: !Select
  - 0
  - !Split [",", !Ref Subnets]
"#,
        )
        .unwrap();

        assert_eq!(
            value,
            json!({
                "Role": { "Fn::GetAtt": "HandlerRole.Arn" },
                "Bucket": { "Ref": "Bucket" },
                "Name": { "Fn::Sub": "${AWS::StackName}-handler" },
                "Arn": { "Fn::Join": [":", ["arn", { "Ref": "AWS::Partition" }, "s3"]] },
                "First": { "Fn::Select": [0, { "Fn::Split": [",", { "Ref": "Subnets" }] }] }
            })
        );
    }

    #[test]
    fn test_unknown_tag() {
        let error = parse("Name: !Secret db\n").unwrap_err();
        assert!(error.to_string().starts_with("Unknown tag `!Secret`"));
    }

    #[test]
    fn test_anchors_and_aliases() {
        let value = parse(
            r#"
Defaults: &retention
  RetentionInDays: 7
Logs: *retention
"#,
        )
        .unwrap();

        assert_eq!(value["Logs"], json!({ "RetentionInDays": 7 }));
    }

    #[test]
    fn test_duplicate_key() {
        let error = parse("Name: a\nName: b\n").unwrap_err();
        assert!(error.to_string().starts_with("Duplicate key `Name`"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse("").unwrap(), Value::Null);
    }
}
