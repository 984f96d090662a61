//! Typed parameter records.
//!
//! Each record covers every version of its method: fields introduced in later
//! layers are optional here, and the schema of the negotiated version decides
//! whether a peer may send them. Records are only decoded from params that
//! already passed validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! literal_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Wire literals, in declaration order.
            pub const NAMES: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

literal_enum! {
    /// Permission level on a node.
    Access { None => "none", Read => "read", Write => "write", Admin => "admin" }
}

literal_enum! {
    /// Quality of a point value.
    Quality { Good => "good", Bad => "bad", Uncertain => "uncertain" }
}

literal_enum! {
    NodeType { Folder => "folder", Point => "point" }
}

literal_enum! {
    /// Value type of a point node.
    DataType {
        Bool => "bool",
        Int => "int",
        Uint => "uint",
        Float => "float",
        String => "string",
        Json => "json",
    }
}

literal_enum! {
    NodeEvent { Created => "created", Modified => "modified", Deleted => "deleted" }
}

literal_enum! {
    AlarmState { Raised => "raised", Cleared => "cleared", Acknowledged => "acknowledged" }
}

literal_enum! {
    SessionEvent { Opened => "opened", Closed => "closed" }
}

/// Params of methods that take none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoParams {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginParams {
    pub user: String,
    pub password: String,
    /// Keep-alive interval in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Client identification, v3.0 and later.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelParams {
    /// Transaction id of the request to cancel.
    pub tid: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathParams {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadItem {
    pub path: String,
    /// Oldest acceptable cached value in milliseconds, v3.2 and later.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u64>,
}

/// A point value as written by clients or pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointValue {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeItem {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadband: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_change: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryParams {
    pub path: String,
    pub from: u64,
    pub to: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseParams {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCreateParams {
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeModifyParams {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRenameParams {
    pub path: String,
    /// New last path segment.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEventParams {
    pub path: String,
    pub event: NodeEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadataParams {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSearchParams {
    pub path: String,
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Source and destination of a copy or move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTransferParams {
    pub path: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserParams {
    pub user: String,
}

/// Account fields for `user.create` and `user.modify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccountParams {
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Expiry date as `yyyy-MM-dd`, v3.1 and later.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordParams {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserNotifyParams {
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsergroupParams {
    pub usergroup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsergroupDefinitionParams {
    pub usergroup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipParams {
    pub usergroup: String,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkMembershipParams {
    pub usergroup: String,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsergroupNotifyParams {
    pub usergroup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectParams {
    pub project: String,
}

/// Project fields for `project.create` and `project.modify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDefinitionParams {
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectImportParams {
    pub project: String,
    /// Exported project archive.
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCloneParams {
    pub project: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectNotifyParams {
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

/// Permission of one user, shared by the `permission.user.*` methods.
///
/// `path` is absent only for `list`, `access` only for `set`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPermissionParams {
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
}

/// Permission of one usergroup, shared by the `permission.usergroup.*` methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsergroupPermissionParams {
    pub usergroup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    pub sid: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEventParams {
    pub sid: u16,
    pub event: SessionEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReadParams {
    /// First day, `yyyy-MM-dd`.
    pub from: String,
    /// Last day, `yyyy-MM-dd`.
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlarmListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmAckParams {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmEventParams {
    pub id: u32,
    pub path: String,
    pub state: AlarmState,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn literal_enums_use_wire_names() {
        assert_eq!(serde_json::to_value(Access::Admin).unwrap(), json!("admin"));
        assert_eq!(
            serde_json::from_value::<DataType>(json!("uint")).unwrap(),
            DataType::Uint
        );
        assert_eq!(Quality::NAMES, ["good", "bad", "uncertain"]);
        assert_eq!(NodeEvent::Deleted.to_string(), "deleted");
    }

    #[test]
    fn records_use_camel_case() {
        let params: ChangePasswordParams =
            serde_json::from_value(json!({"oldPassword": "a", "newPassword": "b"})).unwrap();
        assert_eq!(params.old_password, "a");

        let create = NodeCreateParams {
            path: "/plant/temp".into(),
            node_type: NodeType::Point,
            data_type: Some(DataType::Float),
            description: None,
        };
        assert_eq!(
            serde_json::to_value(&create).unwrap(),
            json!({"path": "/plant/temp", "type": "point", "dataType": "float"})
        );
    }

    #[test]
    fn later_fields_are_optional() {
        let login: LoginParams =
            serde_json::from_value(json!({"user": "op", "password": "pw"})).unwrap();
        assert_eq!(login.client, None);

        let item: SubscribeItem =
            serde_json::from_value(json!({"path": "/a", "onChange": true})).unwrap();
        assert_eq!(item.on_change, Some(true));
    }

    #[test]
    fn no_params_is_an_empty_object() {
        assert_eq!(serde_json::to_value(NoParams::default()).unwrap(), json!({}));
        assert!(serde_json::from_value::<NoParams>(json!({"extra": 1})).is_ok());
    }
}
