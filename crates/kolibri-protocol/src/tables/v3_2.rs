//! Bulk membership and alarms.

use kolibri_schema::library::{node_path, user_name, usergroup_name};
use kolibri_schema::{FieldRule, FieldSchema, MethodDescriptor};

use super::rules::{description, interval};
use super::{call, v1_0};
use crate::method::Method;
use crate::version::V3_2;

/// Largest alarm id.
const MAX_ALARM_ID: i64 = u32::MAX as i64;

pub(super) fn alarm_id() -> FieldRule {
    FieldRule::integer(0, MAX_ALARM_ID)
}

fn bulk_membership() -> FieldSchema {
    FieldSchema::new()
        .required("usergroup", usergroup_name())
        .required("users", FieldRule::non_empty_array(user_name()))
}

pub(super) fn layer() -> Vec<MethodDescriptor> {
    vec![
        call(Method::UsergroupAddMembers, V3_2).object_params(bulk_membership()),
        call(Method::UsergroupRemoveMembers, V3_2).object_params(bulk_membership()),
        call(Method::AlarmList, V3_2)
            .object_params(FieldSchema::new().optional("path", node_path())),
        call(Method::AlarmAcknowledge, V3_2).object_params(
            FieldSchema::new()
                .required("id", alarm_id())
                .optional("comment", description()),
        ),
        call(Method::Read, V3_2)
            .list_params(v1_0::read_item_schema().optional("maxAge", interval()))
            .result(v1_0::read_result()),
    ]
}
