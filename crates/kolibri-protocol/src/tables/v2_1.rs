//! Metadata, search and session management.

use kolibri_schema::library::{node_path, unsigned16};
use kolibri_schema::{FieldRule, FieldSchema, MethodDescriptor};

use super::rules::{access, data_type, description, limit, timestamp};
use super::{call, v1_0};
use crate::method::Method;
use crate::version::V2_1;

fn browse_schema() -> FieldSchema {
    v1_0::browse_schema().optional("detailed", FieldRule::boolean())
}

fn subscribe_item_schema() -> FieldSchema {
    v1_0::subscribe_item_schema().optional("onChange", FieldRule::boolean())
}

fn detailed_entry_schema() -> FieldSchema {
    v1_0::browse_entry_schema()
        .optional("dataType", data_type())
        .optional("description", description())
        .optional("unit", FieldRule::bounded_string(0, 32))
        .optional("access", access())
}

pub(super) fn layer() -> Vec<MethodDescriptor> {
    vec![
        call(Method::NodeBrowse, V2_1)
            .object_params(browse_schema())
            .result(FieldRule::array_of(FieldRule::nested(detailed_entry_schema()))),
        call(Method::Subscribe, V2_1).list_params(subscribe_item_schema()),
        call(Method::NodeSetMetadata, V2_1).object_params(
            FieldSchema::new()
                .required("path", node_path())
                .optional("unit", FieldRule::bounded_string(0, 32))
                .optional("min", FieldRule::number(f64::MIN, f64::MAX))
                .optional("max", FieldRule::number(f64::MIN, f64::MAX))
                .optional("precision", FieldRule::integer(0, 15))
                .optional("description", description())
                .at_least_one(),
        ),
        call(Method::NodeGetMetadata, V2_1)
            .object_params(FieldSchema::new().required("path", node_path())),
        call(Method::NodeSearch, V2_1).object_params(
            FieldSchema::new()
                .required("path", node_path())
                .required("pattern", FieldRule::bounded_string(1, 256))
                .optional("limit", limit()),
        ),
        call(Method::HistoryDelete, V2_1).object_params(
            FieldSchema::new()
                .required("path", node_path())
                .required("from", timestamp())
                .required("to", timestamp()),
        ),
        call(Method::SessionList, V2_1),
        call(Method::SessionKill, V2_1)
            .object_params(FieldSchema::new().required("sid", unsigned16())),
    ]
}
