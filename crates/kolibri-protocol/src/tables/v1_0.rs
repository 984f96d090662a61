//! Base layer.

use kolibri_schema::library::{node_path, project_name, unsigned16, user_name, usergroup_name};
use kolibri_schema::{FieldRule, FieldSchema, MethodDescriptor};

use super::rules::{
    access, data_type, description, interval, limit, node_name, node_type, password, quality,
    timestamp,
};
use super::{call, notification};
use crate::method::Method;
use crate::params::NodeEvent;
use crate::version::V1_0;

pub(super) fn login_schema() -> FieldSchema {
    FieldSchema::new()
        .required("user", user_name())
        .required("password", password())
        .optional("interval", interval())
        .optional("timeout", interval())
}

pub(super) fn read_item_schema() -> FieldSchema {
    FieldSchema::new().required("path", node_path())
}

pub(super) fn read_result() -> FieldRule {
    FieldRule::array_of(FieldRule::nested(
        FieldSchema::new()
            .required("path", node_path())
            .optional("value", FieldRule::Any)
            .optional("timestamp", timestamp())
            .optional("quality", quality()),
    ))
}

pub(super) fn subscribe_item_schema() -> FieldSchema {
    FieldSchema::new()
        .required("path", node_path())
        .optional("deadband", FieldRule::number(0.0, f64::MAX))
        .optional("interval", interval())
}

pub(super) fn browse_schema() -> FieldSchema {
    FieldSchema::new()
        .required("path", node_path())
        .optional("levels", FieldRule::integer(0, 16))
}

pub(super) fn browse_entry_schema() -> FieldSchema {
    FieldSchema::new()
        .required("path", node_path())
        .required("type", node_type())
}

pub(super) fn user_create_schema() -> FieldSchema {
    FieldSchema::new()
        .required("user", user_name())
        .required("password", password())
        .optional("description", description())
        .optional("active", FieldRule::boolean())
}

pub(super) fn user_modify_schema() -> FieldSchema {
    FieldSchema::new()
        .required("user", user_name())
        .optional("password", password())
        .optional("description", description())
        .optional("active", FieldRule::boolean())
        .at_least_one()
}

pub(super) fn user_notify_schema() -> FieldSchema {
    FieldSchema::new()
        .required("user", user_name())
        .optional("description", description())
        .optional("active", FieldRule::boolean())
        .optional("deleted", FieldRule::boolean())
        .at_least_one()
}

pub(super) fn project_create_schema() -> FieldSchema {
    FieldSchema::new()
        .required("project", project_name())
        .optional("description", description())
}

pub(super) fn project_modify_schema() -> FieldSchema {
    FieldSchema::new()
        .required("project", project_name())
        .optional("description", description())
        .at_least_one()
}

fn path_only() -> FieldSchema {
    FieldSchema::new().required("path", node_path())
}

fn user_only() -> FieldSchema {
    FieldSchema::new().required("user", user_name())
}

fn usergroup_only() -> FieldSchema {
    FieldSchema::new().required("usergroup", usergroup_name())
}

fn project_only() -> FieldSchema {
    FieldSchema::new().required("project", project_name())
}

fn server_info_result() -> FieldRule {
    FieldRule::nested(
        FieldSchema::new()
            .required("name", FieldRule::string())
            .required("version", FieldRule::string())
            .required(
                "protocols",
                FieldRule::non_empty_array(FieldRule::string()),
            ),
    )
}

fn user_list_result() -> FieldRule {
    FieldRule::array_of(FieldRule::nested(
        FieldSchema::new()
            .required("user", user_name())
            .optional("description", description())
            .optional("active", FieldRule::boolean()),
    ))
}

fn session_methods() -> Vec<MethodDescriptor> {
    vec![
        call(Method::Login, V1_0).object_params(login_schema()),
        call(Method::Logout, V1_0),
        call(Method::Ping, V1_0),
        call(Method::ServerInfo, V1_0).result(server_info_result()),
        notification(Method::Close, V1_0),
        call(Method::Cancel, V1_0)
            .object_params(FieldSchema::new().required("tid", unsigned16())),
    ]
}

fn data_methods() -> Vec<MethodDescriptor> {
    vec![
        call(Method::Read, V1_0)
            .list_params(read_item_schema())
            .result(read_result()),
        call(Method::Write, V1_0).list_params(
            FieldSchema::new()
                .required("path", node_path())
                .required("value", FieldRule::Any)
                .optional("timestamp", timestamp())
                .optional("quality", quality()),
        ),
        call(Method::Subscribe, V1_0).list_params(subscribe_item_schema()),
        call(Method::Unsubscribe, V1_0).list_params(path_only()),
        notification(Method::DataNotify, V1_0).list_params(
            FieldSchema::new()
                .required("path", node_path())
                .required("timestamp", timestamp())
                .optional("value", FieldRule::Any)
                .optional("quality", quality()),
        ),
        call(Method::HistoryRead, V1_0).object_params(
            FieldSchema::new()
                .required("path", node_path())
                .required("from", timestamp())
                .required("to", timestamp())
                .optional("limit", limit()),
        ),
    ]
}

fn node_methods() -> Vec<MethodDescriptor> {
    vec![
        call(Method::NodeBrowse, V1_0)
            .object_params(browse_schema())
            .result(FieldRule::array_of(FieldRule::nested(browse_entry_schema()))),
        call(Method::NodeGetProperties, V1_0).object_params(path_only()),
        call(Method::NodeCreate, V1_0).object_params(
            FieldSchema::new()
                .required("path", node_path())
                .required("type", node_type())
                .optional("dataType", data_type())
                .optional("description", description()),
        ),
        call(Method::NodeDelete, V1_0).object_params(path_only()),
        call(Method::NodeModify, V1_0).object_params(
            FieldSchema::new()
                .required("path", node_path())
                .optional("description", description())
                .optional("dataType", data_type())
                .at_least_one(),
        ),
        call(Method::NodeRename, V1_0).object_params(
            FieldSchema::new()
                .required("path", node_path())
                .required("name", node_name()),
        ),
        notification(Method::NodeNotify, V1_0).object_params(
            FieldSchema::new()
                .required("path", node_path())
                .required("event", FieldRule::literals(NodeEvent::NAMES)),
        ),
    ]
}

fn user_methods() -> Vec<MethodDescriptor> {
    vec![
        call(Method::UserCreate, V1_0).object_params(user_create_schema()),
        call(Method::UserDelete, V1_0).object_params(user_only()),
        call(Method::UserModify, V1_0).object_params(user_modify_schema()),
        call(Method::UserList, V1_0).result(user_list_result()),
        call(Method::UserGetProperties, V1_0).object_params(user_only()),
        call(Method::UserChangePassword, V1_0).object_params(
            FieldSchema::new()
                .required("oldPassword", password())
                .required("newPassword", password()),
        ),
        notification(Method::UserNotify, V1_0).object_params(user_notify_schema()),
    ]
}

fn usergroup_methods() -> Vec<MethodDescriptor> {
    let membership = || {
        FieldSchema::new()
            .required("usergroup", usergroup_name())
            .required("user", user_name())
    };
    vec![
        call(Method::UsergroupCreate, V1_0).object_params(
            FieldSchema::new()
                .required("usergroup", usergroup_name())
                .optional("description", description()),
        ),
        call(Method::UsergroupDelete, V1_0).object_params(usergroup_only()),
        call(Method::UsergroupModify, V1_0).object_params(
            FieldSchema::new()
                .required("usergroup", usergroup_name())
                .optional("description", description())
                .at_least_one(),
        ),
        call(Method::UsergroupList, V1_0),
        call(Method::UsergroupGetProperties, V1_0).object_params(usergroup_only()),
        call(Method::UsergroupListMembers, V1_0).object_params(usergroup_only()),
        call(Method::UsergroupAddMember, V1_0).object_params(membership()),
        call(Method::UsergroupRemoveMember, V1_0).object_params(membership()),
        notification(Method::UsergroupNotify, V1_0).object_params(
            FieldSchema::new()
                .required("usergroup", usergroup_name())
                .optional("description", description())
                .optional("deleted", FieldRule::boolean())
                .at_least_one(),
        ),
    ]
}

fn project_methods() -> Vec<MethodDescriptor> {
    vec![
        call(Method::ProjectCreate, V1_0).object_params(project_create_schema()),
        call(Method::ProjectDelete, V1_0).object_params(project_only()),
        call(Method::ProjectModify, V1_0).object_params(project_modify_schema()),
        call(Method::ProjectList, V1_0),
        call(Method::ProjectGetProperties, V1_0).object_params(project_only()),
        call(Method::ProjectOpen, V1_0).object_params(project_only()),
        call(Method::ProjectClose, V1_0),
        notification(Method::ProjectNotify, V1_0).object_params(
            FieldSchema::new()
                .required("project", project_name())
                .optional("description", description())
                .optional("deleted", FieldRule::boolean())
                .at_least_one(),
        ),
    ]
}

/// The four permission methods of one principal kind.
fn permission_methods(
    principal: &'static str,
    principal_rule: fn() -> FieldRule,
    [set, get, remove, list]: [Method; 4],
) -> Vec<MethodDescriptor> {
    let target = || {
        FieldSchema::new()
            .required(principal, principal_rule())
            .required("path", node_path())
    };
    vec![
        call(set, V1_0).object_params(target().required("access", access())),
        call(get, V1_0).object_params(target()),
        call(remove, V1_0).object_params(target()),
        call(list, V1_0).object_params(FieldSchema::new().required(principal, principal_rule())),
    ]
}

pub(super) fn layer() -> Vec<MethodDescriptor> {
    let mut methods = session_methods();
    methods.extend(data_methods());
    methods.extend(node_methods());
    methods.extend(user_methods());
    methods.extend(usergroup_methods());
    methods.extend(project_methods());
    methods.extend(permission_methods(
        "user",
        user_name,
        [
            Method::PermissionUserSet,
            Method::PermissionUserGet,
            Method::PermissionUserRemove,
            Method::PermissionUserList,
        ],
    ));
    methods.extend(permission_methods(
        "usergroup",
        usergroup_name,
        [
            Method::PermissionUsergroupSet,
            Method::PermissionUsergroupGet,
            Method::PermissionUsergroupRemove,
            Method::PermissionUsergroupList,
        ],
    ));
    methods
}
