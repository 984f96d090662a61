//! Node moves, project cloning and server push for alarms and sessions.

use kolibri_schema::library::{canonical_date, node_path, project_name, unsigned16, user_name};
use kolibri_schema::{FieldRule, FieldSchema, MethodDescriptor};

use super::{call, notification, v1_0, v3_2};
use crate::method::Method;
use crate::params::{AlarmState, SessionEvent};
use crate::version::V3_3;

pub(super) fn layer() -> Vec<MethodDescriptor> {
    vec![
        call(Method::NodeMove, V3_3).object_params(
            FieldSchema::new()
                .required("path", node_path())
                .required("target", node_path()),
        ),
        call(Method::ProjectClone, V3_3).object_params(
            FieldSchema::new()
                .required("project", project_name())
                .required("target", project_name()),
        ),
        notification(Method::AlarmNotify, V3_3).object_params(
            FieldSchema::new()
                .required("id", v3_2::alarm_id())
                .required("path", node_path())
                .required("state", FieldRule::literals(AlarmState::NAMES)),
        ),
        notification(Method::SessionNotify, V3_3).object_params(
            FieldSchema::new()
                .required("sid", unsigned16())
                .required("event", FieldRule::literals(SessionEvent::NAMES))
                .optional("user", user_name()),
        ),
        notification(Method::UserNotify, V3_3)
            .object_params(v1_0::user_notify_schema().optional("expires", canonical_date())),
    ]
}
