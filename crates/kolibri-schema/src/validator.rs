use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::config::ValidatorConfig;
use crate::rule::{literal_text, FieldRule};
use crate::schema::{FieldSchema, SetRule};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Path to the offending value (e.g. `params.tid` or `params[0].path`).
    pub path: String,
    /// Name of the rule that failed.
    pub rule: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl Violation {
    pub fn new(path: &str, rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path, self.message, self.rule)
    }
}

/// Result of validation: every violation found, or success.
pub type ValidationResult = Result<(), Vec<Violation>>;

/// Validate `params` against an object schema with the default config.
///
/// Violation paths are rooted at `params`.
pub fn validate(value: &Value, schema: &FieldSchema) -> ValidationResult {
    Validator::default().validate_schema(value, schema, "params")
}

/// Interprets field rules against JSON values.
///
/// Never fails on malformed input: anything unexpected becomes a violation.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Check a value against one rule, reporting paths under `root`.
    pub fn validate(&self, value: &Value, rule: &FieldRule, root: &str) -> ValidationResult {
        let mut walk = Walk::new(&self.config);
        walk.check(value, rule, root);
        walk.finish()
    }

    /// Check a value against one rule and, when it passes, rewrite it into
    /// the form typed decoding expects.
    ///
    /// Partial-update fields whose violations were masked by a valid sibling
    /// are removed, and integral floats accepted by integer rules (`7.0`)
    /// become integers. The value is left untouched when validation fails.
    pub fn normalize(&self, value: &mut Value, rule: &FieldRule, root: &str) -> ValidationResult {
        let mut walk = Walk::new(&self.config);
        walk.check(value, rule, root);
        let fixups = std::mem::take(&mut walk.fixups);
        walk.finish()?;
        for fixup in fixups {
            fixup.apply(value, root);
        }
        Ok(())
    }

    /// Check a value against an object schema, reporting paths under `root`.
    pub fn validate_schema(
        &self,
        value: &Value,
        schema: &FieldSchema,
        root: &str,
    ) -> ValidationResult {
        let mut walk = Walk::new(&self.config);
        walk.check_object(value, schema, root);
        walk.finish()
    }
}

/// A rewrite recorded while walking, applied only if the value is accepted.
#[derive(Debug)]
enum Fixup {
    /// Remove `field` from the object at `object`.
    Drop { object: String, field: &'static str },
    /// Replace the integral float at this path with an integer.
    Integral(String),
}

impl Fixup {
    fn apply(self, value: &mut Value, root: &str) {
        match self {
            Fixup::Drop { object, field } => {
                if let Some(map) = locate(value, root, &object).and_then(Value::as_object_mut) {
                    map.remove(field);
                }
            }
            Fixup::Integral(path) => {
                if let Some(slot) = locate(value, root, &path) {
                    if let Some(integer) = slot.as_f64().and_then(integral) {
                        *slot = integer;
                    }
                }
            }
        }
    }
}

/// Find the value at a violation-style path (`params.items[2].path`).
fn locate<'v>(value: &'v mut Value, root: &str, path: &str) -> Option<&'v mut Value> {
    let mut rest = path.strip_prefix(root)?;
    let mut current = value;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix('[') {
            let end = tail.find(']')?;
            let index: usize = tail[..end].parse().ok()?;
            current = current.get_mut(index)?;
            rest = &tail[end + 1..];
        } else if let Some(tail) = rest.strip_prefix('.') {
            rest = tail;
        } else {
            let end = rest.find(|c: char| c == '.' || c == '[').unwrap_or(rest.len());
            let (name, tail) = rest.split_at(end);
            current = current.get_mut(name)?;
            rest = tail;
        }
    }
    Some(current)
}

fn integral(number: f64) -> Option<Value> {
    if number.fract() != 0.0 {
        return None;
    }
    if (0.0..=u64::MAX as f64).contains(&number) {
        Some(Value::from(number as u64))
    } else if (i64::MIN as f64..0.0).contains(&number) {
        Some(Value::from(number as i64))
    } else {
        None
    }
}

struct Walk<'a> {
    config: &'a ValidatorConfig,
    violations: Vec<Violation>,
    fixups: Vec<Fixup>,
}

impl<'a> Walk<'a> {
    fn new(config: &'a ValidatorConfig) -> Self {
        Self {
            config,
            violations: Vec::new(),
            fixups: Vec::new(),
        }
    }

    fn finish(mut self) -> ValidationResult {
        if self.violations.is_empty() {
            return Ok(());
        }
        self.violations.truncate(self.config.max_violations.max(1));
        Err(self.violations)
    }

    fn push(&mut self, violation: Violation) {
        if self.violations.len() < self.config.max_violations.max(1) {
            self.violations.push(violation);
        }
    }

    /// Run `f` against a fresh buffer and hand back what it found.
    fn isolated(&self, f: impl FnOnce(&mut Walk<'a>)) -> Walk<'a> {
        let mut inner = Walk::new(self.config);
        f(&mut inner);
        inner
    }

    /// Keep the violations and rewrites of an isolated walk.
    fn absorb(&mut self, inner: Walk<'a>) {
        for violation in inner.violations {
            self.push(violation);
        }
        self.fixups.extend(inner.fixups);
    }

    fn check(&mut self, value: &Value, rule: &FieldRule, path: &str) {
        match rule {
            FieldRule::Any => {}
            FieldRule::Type(kind) => {
                if !kind.matches(value) {
                    self.push(Violation::new(
                        path,
                        rule.name(),
                        format!("expected {}, got {}", kind.name(), json_type_name(value)),
                    ));
                }
            }
            FieldRule::Range { min, max, integer } => {
                self.check_range(value, *min, *max, *integer, path);
            }
            FieldRule::Length { min, max } => {
                let len = match value {
                    Value::String(text) => text.chars().count(),
                    Value::Array(items) => items.len(),
                    other => {
                        self.push(Violation::new(
                            path,
                            rule.name(),
                            format!("expected string or array, got {}", json_type_name(other)),
                        ));
                        return;
                    }
                };
                if len < *min || len > *max {
                    self.push(Violation::new(
                        path,
                        rule.name(),
                        format!("length must be between {min} and {max}, got {len}"),
                    ));
                }
            }
            FieldRule::Pattern(regex) => match value.as_str() {
                Some(text) if regex.is_match(text) => {}
                Some(_) => self.push(Violation::new(
                    path,
                    rule.name(),
                    format!("does not match pattern {}", regex.as_str()),
                )),
                None => self.push(Violation::new(
                    path,
                    rule.name(),
                    format!("expected string, got {}", json_type_name(value)),
                )),
            },
            FieldRule::Enum(values) => {
                if !values.contains(value) {
                    let allowed: Vec<String> = values.iter().map(literal_text).collect();
                    self.push(Violation::new(
                        path,
                        rule.name(),
                        format!("must be one of: {}", allowed.join(", ")),
                    ));
                }
            }
            FieldRule::NonEmptyArray(item) => match value {
                Value::Array(items) if items.is_empty() => {
                    self.push(Violation::new(path, rule.name(), "must not be empty"));
                }
                Value::Array(items) => {
                    if let Some(item) = item {
                        self.check_items(items, item, path);
                    }
                }
                other => self.push(Violation::new(
                    path,
                    rule.name(),
                    format!("expected array, got {}", json_type_name(other)),
                )),
            },
            FieldRule::ArrayOf(item) => match value {
                Value::Array(items) => self.check_items(items, item, path),
                other => self.push(Violation::new(
                    path,
                    rule.name(),
                    format!("expected array, got {}", json_type_name(other)),
                )),
            },
            FieldRule::Nested(schema) => self.check_object(value, schema, path),
            FieldRule::OneOf(rules) => {
                let matched = rules.iter().find_map(|alt| {
                    let inner = self.isolated(|walk| walk.check(value, alt, path));
                    inner.violations.is_empty().then_some(inner)
                });
                match matched {
                    Some(inner) => self.absorb(inner),
                    None => self.push(Violation::new(
                        path,
                        rule.name(),
                        "does not match any allowed shape",
                    )),
                }
            }
            FieldRule::AllOf(rules) => {
                for inner in rules {
                    let found = self.isolated(|walk| walk.check(value, inner, path));
                    let failed = !found.violations.is_empty();
                    self.absorb(found);
                    if failed {
                        break;
                    }
                }
            }
            FieldRule::CanonicalDate => {
                if !is_canonical_date(value) {
                    self.push(Violation::new(
                        path,
                        rule.name(),
                        "must be a calendar date in canonical yyyy-MM-dd form",
                    ));
                }
            }
            FieldRule::Named(name, inner) => {
                let mut found = self.isolated(|walk| walk.check(value, inner, path));
                for violation in &mut found.violations {
                    if violation.path == path {
                        violation.rule = *name;
                    }
                }
                self.absorb(found);
            }
        }
    }

    fn check_range(&mut self, value: &Value, min: f64, max: f64, integer: bool, path: &str) {
        let Some(number) = value.as_f64() else {
            let expected = if integer { "integer" } else { "number" };
            self.push(Violation::new(
                path,
                "range",
                format!("expected {expected}, got {}", json_type_name(value)),
            ));
            return;
        };
        if integer && number.fract() != 0.0 {
            self.push(Violation::new(
                path,
                "range",
                format!("must be an integer, got {value}"),
            ));
            return;
        }
        if number < min || number > max {
            self.push(Violation::new(
                path,
                "range",
                format!("must be between {min} and {max}, got {value}"),
            ));
            return;
        }
        if integer && value.is_f64() {
            self.fixups.push(Fixup::Integral(path.to_string()));
        }
    }

    fn check_items(&mut self, items: &[Value], item: &FieldRule, path: &str) {
        for (index, element) in items.iter().enumerate() {
            self.check(element, item, &format!("{path}[{index}]"));
        }
    }

    fn check_object(&mut self, value: &Value, schema: &FieldSchema, path: &str) {
        let Value::Object(map) = value else {
            self.push(Violation::new(
                path,
                "nested",
                format!("expected object, got {}", json_type_name(value)),
            ));
            return;
        };

        let partial = schema.set_rule() == Some(SetRule::AtLeastOneOptional);
        let mut partial_fields: Vec<(&'static str, Walk<'a>)> = Vec::new();

        for spec in schema.fields() {
            let field_path = child_path(path, spec.name);
            match map.get(spec.name) {
                None | Some(Value::Null) => {
                    if spec.is_required() {
                        self.push(Violation::new(&field_path, "required", "is required"));
                    }
                }
                Some(field) if partial && !spec.is_required() => {
                    let found = self.isolated(|walk| walk.check(field, &spec.rule, &field_path));
                    partial_fields.push((spec.name, found));
                }
                Some(field) => self.check(field, &spec.rule, &field_path),
            }
        }

        if partial {
            self.check_partial(schema, path, partial_fields);
        }

        if self.config.strict_mode {
            self.check_unknown_fields(map, schema, path);
        }
    }

    /// Partial-update objects: one present optional field is required. By
    /// default a single valid optional field accepts the object, and its
    /// invalid siblings are dropped from the normalized value.
    fn check_partial(
        &mut self,
        schema: &FieldSchema,
        path: &str,
        present: Vec<(&'static str, Walk<'a>)>,
    ) {
        if present.is_empty() {
            self.push(Violation::new(
                path,
                "atLeastOne",
                format!(
                    "at least one of {} must be provided",
                    schema.optional_names().join(", ")
                ),
            ));
            return;
        }

        let any_valid = present.iter().any(|(_, found)| found.violations.is_empty());
        if any_valid && !self.config.conjunctive_partial_updates {
            let mut masked = Vec::new();
            for (name, found) in present {
                if found.violations.is_empty() {
                    self.fixups.extend(found.fixups);
                } else {
                    masked.push(name);
                    self.fixups.push(Fixup::Drop {
                        object: path.to_string(),
                        field: name,
                    });
                }
            }
            if !masked.is_empty() {
                trace!(path, ?masked, "partial update accepted despite invalid fields");
            }
            return;
        }

        for (_, found) in present {
            self.absorb(found);
        }
    }

    fn check_unknown_fields(&mut self, map: &Map<String, Value>, schema: &FieldSchema, path: &str) {
        for key in map.keys() {
            if schema.field(key).is_none() {
                self.push(Violation::new(
                    &child_path(path, key),
                    "unknownField",
                    "is not a recognized field",
                ));
            }
        }
    }
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn is_canonical_date(value: &Value) -> bool {
    let Some(text) = value.as_str() else {
        return false;
    };
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string() == text)
        .unwrap_or(false)
}

/// Returns the JSON type name for a value.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::library::{node_path, unsigned16, user_name};

    fn cancel_schema() -> FieldSchema {
        FieldSchema::new().required("tid", unsigned16())
    }

    fn modify_schema() -> FieldSchema {
        FieldSchema::new()
            .required("user", user_name())
            .optional("description", FieldRule::bounded_string(0, 8))
            .optional("active", FieldRule::boolean())
            .at_least_one()
    }

    #[test]
    fn cancel_tid_out_of_range() {
        let err = validate(&json!({"tid": 70000}), &cancel_schema()).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].path, "params.tid");
        assert_eq!(err[0].rule, "unsigned16");
        assert!(err[0].message.contains("65535"), "{}", err[0].message);
    }

    #[test]
    fn missing_and_null_required_fields() {
        let missing = validate(&json!({}), &cancel_schema()).unwrap_err();
        let null = validate(&json!({"tid": null}), &cancel_schema()).unwrap_err();
        for err in [missing, null] {
            assert_eq!(err.len(), 1);
            assert_eq!(err[0].rule, "required");
            assert_eq!(err[0].path, "params.tid");
        }
    }

    #[test]
    fn non_object_params_are_one_violation() {
        let err = validate(&json!([1, 2]), &cancel_schema()).unwrap_err();
        assert_eq!(
            err,
            vec![Violation::new("params", "nested", "expected object, got array")]
        );
    }

    #[test]
    fn collects_every_violation() {
        let schema = FieldSchema::new()
            .required("path", node_path())
            .required("levels", FieldRule::integer(0, 16))
            .optional("detailed", FieldRule::boolean());
        let err = validate(
            &json!({"path": "no-slash", "levels": 99, "detailed": "yes"}),
            &schema,
        )
        .unwrap_err();

        let paths: Vec<&str> = err.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, ["params.path", "params.levels", "params.detailed"]);
        let rules: Vec<&str> = err.iter().map(|v| v.rule).collect();
        assert_eq!(rules, ["nodePath", "range", "type"]);
    }

    #[test]
    fn array_items_are_indexed() {
        let item = FieldSchema::new().required("path", node_path());
        let rule = FieldRule::non_empty_array(FieldRule::nested(item));
        let validator = Validator::default();

        let err = validator
            .validate(&json!([{"path": "/ok"}, {"path": "bad"}, {}]), &rule, "params")
            .unwrap_err();
        let paths: Vec<&str> = err.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, ["params[1].path", "params[2].path"]);

        let empty = validator.validate(&json!([]), &rule, "params").unwrap_err();
        assert_eq!(empty[0].rule, "nonEmptyArray");
    }

    #[test]
    fn length_counts_code_points() {
        let rule = FieldRule::bounded_string(1, 3);
        let validator = Validator::default();
        assert!(validator.validate(&json!("äöü"), &rule, "v").is_ok());
        assert!(validator.validate(&json!("äöüß"), &rule, "v").is_err());
        assert!(validator.validate(&json!(""), &rule, "v").is_err());
    }

    #[test]
    fn all_of_stops_at_first_failure() {
        let err = Validator::default()
            .validate(&json!(17), &FieldRule::bounded_string(1, 3), "v")
            .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].rule, "type");
    }

    #[test]
    fn one_of_accepts_any_alternative() {
        let rule = FieldRule::OneOf(vec![FieldRule::boolean(), FieldRule::integer(0, 1)]);
        let validator = Validator::default();
        assert!(validator.validate(&json!(true), &rule, "v").is_ok());
        assert!(validator.validate(&json!(1), &rule, "v").is_ok());
        let err = validator.validate(&json!("x"), &rule, "v").unwrap_err();
        assert_eq!(err[0].rule, "oneOf");
    }

    #[test]
    fn enum_lists_allowed_literals() {
        let rule = FieldRule::literals(&["good", "bad"]);
        let err = Validator::default()
            .validate(&json!("meh"), &rule, "q")
            .unwrap_err();
        assert_eq!(err[0].message, "must be one of: good, bad");
    }

    #[test]
    fn partial_update_needs_one_optional_field() {
        let err = validate(&json!({"user": "ops"}), &modify_schema()).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].rule, "atLeastOne");
        assert_eq!(err[0].path, "params");
        assert_eq!(err[0].message, "at least one of description, active must be provided");

        let nulls = json!({"user": "ops", "description": null, "active": null});
        assert!(validate(&nulls, &modify_schema()).is_err());
        assert!(validate(&json!({"user": "ops", "active": false}), &modify_schema()).is_ok());
    }

    #[test]
    fn partial_update_single_valid_field_masks_sibling() {
        let value = json!({"user": "ops", "active": true, "description": "far too long"});
        assert!(validate(&value, &modify_schema()).is_ok());

        let conjunctive = Validator::new(ValidatorConfig {
            conjunctive_partial_updates: true,
            ..ValidatorConfig::default()
        });
        let err = conjunctive
            .validate_schema(&value, &modify_schema(), "params")
            .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].path, "params.description");
    }

    #[test]
    fn partial_update_reports_when_every_field_fails() {
        let value = json!({"user": "ops", "active": "yes", "description": "far too long"});
        let err = validate(&value, &modify_schema()).unwrap_err();
        let paths: Vec<&str> = err.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, ["params.description", "params.active"]);
    }

    #[test]
    fn partial_update_still_checks_required_fields() {
        let value = json!({"user": "-bad-", "active": true});
        let err = validate(&value, &modify_schema()).unwrap_err();
        assert_eq!(err[0].path, "params.user");
    }

    #[test]
    fn strict_mode_rejects_unknown_fields() {
        let value = json!({"tid": 1, "extra": true});
        assert!(validate(&value, &cancel_schema()).is_ok());

        let strict = Validator::new(ValidatorConfig {
            strict_mode: true,
            ..ValidatorConfig::default()
        });
        let err = strict
            .validate_schema(&value, &cancel_schema(), "params")
            .unwrap_err();
        assert_eq!(
            err,
            vec![Violation::new(
                "params.extra",
                "unknownField",
                "is not a recognized field"
            )]
        );
    }

    #[test]
    fn strict_mode_applies_to_nested_objects() {
        let schema = FieldSchema::new().required(
            "nested",
            FieldRule::nested(FieldSchema::new().required("v", FieldRule::integer(0, 9))),
        );
        let strict = Validator::new(ValidatorConfig {
            strict_mode: true,
            ..ValidatorConfig::default()
        });
        assert!(strict
            .validate_schema(&json!({"nested": {"v": 1}}), &schema, "params")
            .is_ok());
        let err = strict
            .validate_schema(&json!({"nested": {"v": 1, "x": 0}}), &schema, "params")
            .unwrap_err();
        assert_eq!(err[0].path, "params.nested.x");
    }

    #[test]
    fn violation_count_is_capped() {
        let item = FieldSchema::new().required("path", node_path());
        let rule = FieldRule::non_empty_array(FieldRule::nested(item));
        let items: Vec<Value> = (0..10).map(|_| json!({})).collect();

        let capped = Validator::new(ValidatorConfig {
            max_violations: 3,
            ..ValidatorConfig::default()
        });
        let err = capped
            .validate(&Value::Array(items), &rule, "params")
            .unwrap_err();
        assert_eq!(err.len(), 3);
    }

    #[test]
    fn normalize_drops_masked_partial_update_fields() {
        let rule = FieldRule::nested(modify_schema());
        let mut value = json!({"user": "ops", "active": true, "description": 5});
        Validator::default()
            .normalize(&mut value, &rule, "params")
            .unwrap();
        assert_eq!(value, json!({"user": "ops", "active": true}));
    }

    #[test]
    fn normalize_turns_integral_floats_into_integers() {
        let item = FieldSchema::new()
            .required("tid", unsigned16())
            .optional("gain", FieldRule::number(0.0, 10.0));
        let rule = FieldRule::non_empty_array(FieldRule::nested(item));
        let mut value = json!([{"tid": 7.0, "gain": 2.0}, {"tid": 8}]);
        Validator::default()
            .normalize(&mut value, &rule, "params")
            .unwrap();
        assert_eq!(value, json!([{"tid": 7, "gain": 2.0}, {"tid": 8}]));
        assert!(value[0]["tid"].is_u64());
    }

    #[test]
    fn normalize_leaves_rejected_values_alone() {
        let rule = FieldRule::nested(cancel_schema());
        let mut value = json!({"tid": 7.5});
        let err = Validator::default()
            .normalize(&mut value, &rule, "params")
            .unwrap_err();
        assert_eq!(err[0].path, "params.tid");
        assert_eq!(value, json!({"tid": 7.5}));
    }

    #[test]
    fn conjunctive_mode_never_drops_fields() {
        let conjunctive = Validator::new(ValidatorConfig {
            conjunctive_partial_updates: true,
            ..ValidatorConfig::default()
        });
        let rule = FieldRule::nested(modify_schema());
        let mut value = json!({"user": "ops", "active": true, "description": "short"});
        conjunctive.normalize(&mut value, &rule, "params").unwrap();
        assert_eq!(value["description"], "short");
    }

    #[test]
    fn violation_display() {
        let violation = Violation::new("params.tid", "unsigned16", "must be between 0 and 65535");
        assert_eq!(
            violation.to_string(),
            "params.tid: must be between 0 and 65535 (unsigned16)"
        );
    }
}
