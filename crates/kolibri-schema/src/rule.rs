use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::error::Result;
use crate::schema::FieldSchema;

/// JSON shapes checked by [`FieldRule::Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl Kind {
    /// The shape's name as used in violation messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Object => "object",
            Kind::Array => "array",
        }
    }

    /// Returns true if `value` has this shape.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Kind::String => value.is_string(),
            Kind::Number => value.is_number(),
            Kind::Boolean => value.is_boolean(),
            Kind::Object => value.is_object(),
            Kind::Array => value.is_array(),
        }
    }
}

/// One composable constraint evaluated against a single field's value.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Accepts any value.
    Any,
    /// Value has the given JSON shape.
    Type(Kind),
    /// Number within inclusive bounds; integer rules reject fractions.
    Range { min: f64, max: f64, integer: bool },
    /// String or array length within inclusive bounds, in code points.
    Length { min: usize, max: usize },
    /// String matching a regular expression.
    Pattern(Regex),
    /// Value equal to one of a fixed literal set.
    Enum(Vec<Value>),
    /// Array with at least one element, each optionally checked.
    NonEmptyArray(Option<Box<FieldRule>>),
    /// Array (possibly empty) whose elements are each checked.
    ArrayOf(Box<FieldRule>),
    /// Object validated against a nested schema.
    Nested(FieldSchema),
    /// Value accepted by at least one of the alternatives.
    OneOf(Vec<FieldRule>),
    /// Value accepted by every rule; evaluation stops at the first failure.
    AllOf(Vec<FieldRule>),
    /// String that parses as a date and re-formats to itself as `yyyy-MM-dd`.
    CanonicalDate,
    /// A rule reported under its own name in violations.
    Named(&'static str, Box<FieldRule>),
}

impl FieldRule {
    /// Any string.
    pub fn string() -> Self {
        FieldRule::Type(Kind::String)
    }

    /// `true` or `false`.
    pub fn boolean() -> Self {
        FieldRule::Type(Kind::Boolean)
    }

    /// Any object, contents unchecked.
    pub fn object() -> Self {
        FieldRule::Type(Kind::Object)
    }

    /// Integer in `[min, max]`.
    pub fn integer(min: i64, max: i64) -> Self {
        FieldRule::Range {
            min: min as f64,
            max: max as f64,
            integer: true,
        }
    }

    /// Any number in `[min, max]`.
    pub fn number(min: f64, max: f64) -> Self {
        FieldRule::Range {
            min,
            max,
            integer: false,
        }
    }

    /// String with a code-point length in `[min, max]`.
    pub fn bounded_string(min: usize, max: usize) -> Self {
        FieldRule::AllOf(vec![FieldRule::string(), FieldRule::Length { min, max }])
    }

    /// Compile a pattern rule. Identifier-like fields match case-insensitively.
    pub fn pattern(source: &str, case_insensitive: bool) -> Result<Self> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(FieldRule::Pattern(regex))
    }

    /// String equal to one of the given literals.
    pub fn literals(values: &[&str]) -> Self {
        FieldRule::Enum(values.iter().map(|v| Value::from(*v)).collect())
    }

    /// Array of at least one element, each matching `item`.
    pub fn non_empty_array(item: FieldRule) -> Self {
        FieldRule::NonEmptyArray(Some(Box::new(item)))
    }

    /// Array, possibly empty, whose elements each match `item`.
    pub fn array_of(item: FieldRule) -> Self {
        FieldRule::ArrayOf(Box::new(item))
    }

    /// Object validated against `schema`.
    pub fn nested(schema: FieldSchema) -> Self {
        FieldRule::Nested(schema)
    }

    /// Report violations of `rule` under `name`.
    pub fn named(name: &'static str, rule: FieldRule) -> Self {
        FieldRule::Named(name, Box::new(rule))
    }

    /// The name reported in violations raised by this rule.
    pub fn name(&self) -> &'static str {
        match self {
            FieldRule::Any => "any",
            FieldRule::Type(_) => "type",
            FieldRule::Range { .. } => "range",
            FieldRule::Length { .. } => "length",
            FieldRule::Pattern(_) => "pattern",
            FieldRule::Enum(_) => "enum",
            FieldRule::NonEmptyArray(_) => "nonEmptyArray",
            FieldRule::ArrayOf(_) => "arrayOf",
            FieldRule::Nested(_) => "nested",
            FieldRule::OneOf(_) => "oneOf",
            FieldRule::AllOf(_) => "allOf",
            FieldRule::CanonicalDate => "canonicalDate",
            FieldRule::Named(name, _) => *name,
        }
    }

    /// The object schema behind this rule, looking through arrays and names.
    pub fn schema(&self) -> Option<&FieldSchema> {
        match self {
            FieldRule::Nested(schema) => Some(schema),
            FieldRule::NonEmptyArray(Some(item)) | FieldRule::ArrayOf(item) => item.schema(),
            FieldRule::Named(_, inner) => inner.schema(),
            _ => None,
        }
    }

    /// Short human-readable description, used by registry listings.
    pub fn describe(&self) -> String {
        match self {
            FieldRule::Any => "any".to_string(),
            FieldRule::Type(kind) => kind.name().to_string(),
            FieldRule::Range { min, max, integer } => {
                let base = if *integer { "integer" } else { "number" };
                format!("{base} {min}..{max}")
            }
            FieldRule::Length { min, max } => format!("length {min}..{max}"),
            FieldRule::Pattern(regex) => format!("pattern {}", regex.as_str()),
            FieldRule::Enum(values) => {
                let values: Vec<String> = values.iter().map(literal_text).collect();
                values.join("|")
            }
            FieldRule::NonEmptyArray(Some(item)) => format!("[{}, ...]", item.describe()),
            FieldRule::NonEmptyArray(None) => "[any, ...]".to_string(),
            FieldRule::ArrayOf(item) => format!("[{}]", item.describe()),
            FieldRule::Nested(schema) => {
                let names: Vec<&str> = schema.fields().iter().map(|f| f.name).collect();
                format!("{{{}}}", names.join(", "))
            }
            FieldRule::OneOf(rules) => {
                let rules: Vec<String> = rules.iter().map(FieldRule::describe).collect();
                rules.join(" or ")
            }
            FieldRule::AllOf(rules) => {
                let rules: Vec<String> = rules.iter().map(FieldRule::describe).collect();
                rules.join(", ")
            }
            FieldRule::CanonicalDate => "date yyyy-MM-dd".to_string(),
            FieldRule::Named(name, _) => (*name).to_string(),
        }
    }
}

pub(crate) fn literal_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
