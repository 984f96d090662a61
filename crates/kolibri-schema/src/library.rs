//! Custom field rules of the Kolibri protocol.
//!
//! Identifier-like rules (paths, project, user and usergroup names) match
//! case-insensitively.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::rule::FieldRule;

/// Maximum length of a node path, in code points.
pub const MAX_NODE_PATH_LEN: usize = 4096;

/// Maximum length of project, user and usergroup names.
pub const MAX_NAME_LEN: usize = 32;

fn case_insensitive(source: &str) -> Regex {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|err| panic!("BUG: built-in field pattern {source} is invalid: {err}"))
}

static NODE_PATH: LazyLock<Regex> =
    LazyLock::new(|| case_insensitive(r"^/([a-z0-9][a-z0-9_.-]{0,31}/?)*$"));

static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| case_insensitive(r"^([a-z0-9]|[a-z0-9][a-z0-9-]{0,30}[a-z0-9])$"));

static ACCOUNT_NAME: LazyLock<Regex> =
    LazyLock::new(|| case_insensitive(r"^([a-z0-9]|[a-z0-9][a-z0-9_.-]{0,30}[a-z0-9])$"));

fn identifier(name: &'static str, max: usize, pattern: &Regex) -> FieldRule {
    FieldRule::named(
        name,
        FieldRule::AllOf(vec![
            FieldRule::string(),
            FieldRule::Length { min: 1, max },
            FieldRule::Pattern(pattern.clone()),
        ]),
    )
}

/// Absolute node path such as `/plant/line-1/temp_2`.
pub fn node_path() -> FieldRule {
    identifier("nodePath", MAX_NODE_PATH_LEN, &NODE_PATH)
}

/// Project name: alphanumerics and inner dashes.
pub fn project_name() -> FieldRule {
    identifier("projectName", MAX_NAME_LEN, &PROJECT_NAME)
}

/// User name: alphanumerics with inner `_`, `.` and `-`.
pub fn user_name() -> FieldRule {
    identifier("userName", MAX_NAME_LEN, &ACCOUNT_NAME)
}

/// Usergroup name: same syntax as user names.
pub fn usergroup_name() -> FieldRule {
    identifier("usergroupName", MAX_NAME_LEN, &ACCOUNT_NAME)
}

/// Calendar date in canonical `yyyy-MM-dd` form.
pub fn canonical_date() -> FieldRule {
    FieldRule::CanonicalDate
}

/// Integer in `[0, 65535]`.
pub fn unsigned16() -> FieldRule {
    FieldRule::named("unsigned16", FieldRule::integer(0, i64::from(u16::MAX)))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::validator::Validator;

    fn accepts(rule: &FieldRule, value: Value) -> bool {
        Validator::default().validate(&value, rule, "v").is_ok()
    }

    #[test]
    fn node_path_contract() {
        let rule = node_path();
        assert!(accepts(&rule, json!("/a/b-1/c_2")));
        assert!(accepts(&rule, json!("/")));
        assert!(accepts(&rule, json!("/Plant/Line.1/")));
        assert!(!accepts(&rule, json!("/A//B")));
        assert!(!accepts(&rule, json!("a/b")));
        assert!(!accepts(&rule, json!("/-leading-dash")));
        assert!(!accepts(&rule, json!("")));
        assert!(!accepts(&rule, json!(42)));

        // The separator after each segment is optional in
        // `^/([a-z0-9][a-z0-9_.-]{0,31}/?)*$`, so a 33-character run matches
        // as two segments (32 + 1). Single-segment names are `nodeName`.
        let run = format!("/{}", "a".repeat(33));
        assert!(accepts(&rule, json!(run)));

        let long: String = std::iter::once('/')
            .chain("abcdefgh/".chars().cycle())
            .take(MAX_NODE_PATH_LEN + 1)
            .collect();
        assert_eq!(long.chars().count(), 4097);
        assert!(!accepts(&rule, json!(long)));

        let fits: String = long.chars().take(MAX_NODE_PATH_LEN).collect();
        assert!(accepts(&rule, json!(fits)));
    }

    #[test]
    fn node_path_violation_is_named() {
        let err = Validator::default()
            .validate(&json!("/A//B"), &node_path(), "params.path")
            .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].rule, "nodePath");
        assert_eq!(err[0].path, "params.path");
    }

    #[test]
    fn project_name_contract() {
        let rule = project_name();
        assert!(accepts(&rule, json!("a")));
        assert!(accepts(&rule, json!("Plant-7")));
        assert!(!accepts(&rule, json!("-plant")));
        assert!(!accepts(&rule, json!("plant-")));
        assert!(!accepts(&rule, json!("plant_7")));
        assert!(!accepts(&rule, json!("a".repeat(33))));
        assert!(accepts(&rule, json!("a".repeat(32))));
    }

    #[test]
    fn account_name_contract() {
        for rule in [user_name(), usergroup_name()] {
            assert!(accepts(&rule, json!("j.doe")));
            assert!(accepts(&rule, json!("Ops_Team-2")));
            assert!(!accepts(&rule, json!("_ops")));
            assert!(!accepts(&rule, json!("ops.")));
            assert!(!accepts(&rule, json!("with space")));
            assert!(!accepts(&rule, json!("")));
        }
    }

    #[test]
    fn canonical_date_contract() {
        let rule = canonical_date();
        assert!(accepts(&rule, json!("2021-04-12")));
        assert!(accepts(&rule, json!("2024-02-29")));
        assert!(!accepts(&rule, json!("2021-4-12")));
        assert!(!accepts(&rule, json!("2021-13-40")));
        assert!(!accepts(&rule, json!("2023-02-29")));
        assert!(!accepts(&rule, json!("2021-04-12T00:00:00")));
        assert!(!accepts(&rule, json!(20210412)));
    }

    #[test]
    fn unsigned16_contract() {
        let rule = unsigned16();
        assert!(accepts(&rule, json!(0)));
        assert!(accepts(&rule, json!(65535)));
        assert!(!accepts(&rule, json!(-1)));
        assert!(!accepts(&rule, json!(65536)));
        assert!(!accepts(&rule, json!(2.5)));
        assert!(!accepts(&rule, json!("7")));
    }
}
