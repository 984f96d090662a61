//! Field rules shared by the catalog layers.

use std::sync::LazyLock;

use kolibri_schema::FieldRule;
use regex::{Regex, RegexBuilder};

use crate::params::{Access, DataType, NodeType, Quality};

/// Largest integer a JSON number carries without loss.
pub(crate) const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// One day in milliseconds.
pub(crate) const MAX_INTERVAL_MS: i64 = 86_400_000;

fn case_insensitive(source: &str) -> Regex {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|err| panic!("BUG: catalog pattern {source} is invalid: {err}"))
}

static NODE_NAME: LazyLock<Regex> =
    LazyLock::new(|| case_insensitive(r"^[a-z0-9][a-z0-9_.-]{0,31}$"));

static SEMVER: LazyLock<Regex> = LazyLock::new(|| {
    case_insensitive(r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(-[0-9a-z.-]+)?$")
});

/// A single path segment.
pub(crate) fn node_name() -> FieldRule {
    FieldRule::named(
        "nodeName",
        FieldRule::AllOf(vec![
            FieldRule::string(),
            FieldRule::Pattern(NODE_NAME.clone()),
        ]),
    )
}

pub(crate) fn password() -> FieldRule {
    FieldRule::named("password", FieldRule::bounded_string(1, 256))
}

pub(crate) fn description() -> FieldRule {
    FieldRule::bounded_string(0, 256)
}

pub(crate) fn semver() -> FieldRule {
    FieldRule::named(
        "semVer",
        FieldRule::AllOf(vec![FieldRule::string(), FieldRule::Pattern(SEMVER.clone())]),
    )
}

/// Epoch milliseconds.
pub(crate) fn timestamp() -> FieldRule {
    FieldRule::named("timestamp", FieldRule::integer(0, MAX_SAFE_INTEGER))
}

/// Duration in milliseconds, at most one day.
pub(crate) fn interval() -> FieldRule {
    FieldRule::named("interval", FieldRule::integer(0, MAX_INTERVAL_MS))
}

pub(crate) fn limit() -> FieldRule {
    FieldRule::named("limit", FieldRule::integer(1, 10_000))
}

pub(crate) fn access() -> FieldRule {
    FieldRule::literals(Access::NAMES)
}

pub(crate) fn quality() -> FieldRule {
    FieldRule::literals(Quality::NAMES)
}

pub(crate) fn node_type() -> FieldRule {
    FieldRule::literals(NodeType::NAMES)
}

pub(crate) fn data_type() -> FieldRule {
    FieldRule::literals(DataType::NAMES)
}
