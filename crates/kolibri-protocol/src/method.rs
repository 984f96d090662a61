//! The closed set of Kolibri methods.
//!
//! One table drives the wire names, the [`Method`] enum and the typed
//! [`MethodParams`] sum, so a method cannot exist in one without the others.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::params::*;

/// A method name that is not part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown method: {0}")]
pub struct UnknownMethodName(pub String);

macro_rules! methods {
    ($($variant:ident => $wire:literal, $params:ty;)+) => {
        /// Every Kolibri method, one variant per wire name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Method {
            $($variant,)+
        }

        impl Method {
            /// Every method, in catalog order.
            pub const ALL: &'static [Method] = &[$(Method::$variant,)+];

            /// The dotted wire name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Method::$variant => $wire,)+
                }
            }
        }

        impl FromStr for Method {
            type Err = UnknownMethodName;

            fn from_str(name: &str) -> Result<Self, Self::Err> {
                match name {
                    $($wire => Ok(Method::$variant),)+
                    _ => Err(UnknownMethodName(name.to_string())),
                }
            }
        }

        /// Decoded parameters, one variant per method.
        #[derive(Debug, Clone, PartialEq)]
        pub enum MethodParams {
            $($variant($params),)+
        }

        impl MethodParams {
            pub fn method(&self) -> Method {
                match self {
                    $(MethodParams::$variant(_) => Method::$variant,)+
                }
            }

            /// Decode the params of `method`. Absent params decode as `{}`.
            pub fn decode(method: Method, params: Option<Value>) -> serde_json::Result<Self> {
                let params = params.unwrap_or_else(|| Value::Object(Map::new()));
                Ok(match method {
                    $(Method::$variant => MethodParams::$variant(serde_json::from_value(params)?),)+
                })
            }

            /// Encode back to the wire shape.
            pub fn encode(&self) -> serde_json::Result<Value> {
                match self {
                    $(MethodParams::$variant(params) => serde_json::to_value(params),)+
                }
            }
        }
    };
}

methods! {
    Login => "kolibri.login", LoginParams;
    Logout => "kolibri.logout", NoParams;
    Ping => "kolibri.ping", NoParams;
    ServerInfo => "kolibri.server.info", NoParams;
    Close => "kolibri.close", NoParams;
    Cancel => "kolibri.cancel", CancelParams;

    Read => "kolibri.read", Vec<ReadItem>;
    Write => "kolibri.write", Vec<PointValue>;
    Subscribe => "kolibri.subscribe", Vec<SubscribeItem>;
    Unsubscribe => "kolibri.unsubscribe", Vec<PathParams>;
    DataNotify => "kolibri.data.notify", Vec<PointValue>;
    HistoryRead => "kolibri.history.read", HistoryParams;
    HistoryDelete => "kolibri.history.delete", HistoryParams;

    NodeBrowse => "kolibri.node.browse", BrowseParams;
    NodeGetProperties => "kolibri.node.getProperties", PathParams;
    NodeCreate => "kolibri.node.create", NodeCreateParams;
    NodeDelete => "kolibri.node.delete", PathParams;
    NodeModify => "kolibri.node.modify", NodeModifyParams;
    NodeRename => "kolibri.node.rename", NodeRenameParams;
    NodeNotify => "kolibri.node.notify", NodeEventParams;
    NodeSetMetadata => "kolibri.node.setMetadata", NodeMetadataParams;
    NodeGetMetadata => "kolibri.node.getMetadata", PathParams;
    NodeSearch => "kolibri.node.search", NodeSearchParams;
    NodeCopy => "kolibri.node.copy", NodeTransferParams;
    NodeMove => "kolibri.node.move", NodeTransferParams;

    UserCreate => "kolibri.user.create", UserAccountParams;
    UserDelete => "kolibri.user.delete", UserParams;
    UserModify => "kolibri.user.modify", UserAccountParams;
    UserList => "kolibri.user.list", NoParams;
    UserGetProperties => "kolibri.user.getProperties", UserParams;
    UserChangePassword => "kolibri.user.changePassword", ChangePasswordParams;
    UserNotify => "kolibri.user.notify", UserNotifyParams;
    UserListGroups => "kolibri.user.listGroups", UserParams;
    UserUnlock => "kolibri.user.unlock", UserParams;

    UsergroupCreate => "kolibri.usergroup.create", UsergroupDefinitionParams;
    UsergroupDelete => "kolibri.usergroup.delete", UsergroupParams;
    UsergroupModify => "kolibri.usergroup.modify", UsergroupDefinitionParams;
    UsergroupList => "kolibri.usergroup.list", NoParams;
    UsergroupGetProperties => "kolibri.usergroup.getProperties", UsergroupParams;
    UsergroupListMembers => "kolibri.usergroup.listMembers", UsergroupParams;
    UsergroupAddMember => "kolibri.usergroup.addMember", MembershipParams;
    UsergroupRemoveMember => "kolibri.usergroup.removeMember", MembershipParams;
    UsergroupAddMembers => "kolibri.usergroup.addMembers", BulkMembershipParams;
    UsergroupRemoveMembers => "kolibri.usergroup.removeMembers", BulkMembershipParams;
    UsergroupNotify => "kolibri.usergroup.notify", UsergroupNotifyParams;

    ProjectCreate => "kolibri.project.create", ProjectDefinitionParams;
    ProjectDelete => "kolibri.project.delete", ProjectParams;
    ProjectModify => "kolibri.project.modify", ProjectDefinitionParams;
    ProjectList => "kolibri.project.list", NoParams;
    ProjectGetProperties => "kolibri.project.getProperties", ProjectParams;
    ProjectOpen => "kolibri.project.open", ProjectParams;
    ProjectClose => "kolibri.project.close", NoParams;
    ProjectNotify => "kolibri.project.notify", ProjectNotifyParams;
    ProjectExport => "kolibri.project.export", ProjectParams;
    ProjectImport => "kolibri.project.import", ProjectImportParams;
    ProjectClone => "kolibri.project.clone", ProjectCloneParams;

    PermissionUserSet => "kolibri.permission.user.set", UserPermissionParams;
    PermissionUserGet => "kolibri.permission.user.get", UserPermissionParams;
    PermissionUserRemove => "kolibri.permission.user.remove", UserPermissionParams;
    PermissionUserList => "kolibri.permission.user.list", UserPermissionParams;
    PermissionUsergroupSet => "kolibri.permission.usergroup.set", UsergroupPermissionParams;
    PermissionUsergroupGet => "kolibri.permission.usergroup.get", UsergroupPermissionParams;
    PermissionUsergroupRemove => "kolibri.permission.usergroup.remove", UsergroupPermissionParams;
    PermissionUsergroupList => "kolibri.permission.usergroup.list", UsergroupPermissionParams;

    SessionList => "kolibri.session.list", NoParams;
    SessionKill => "kolibri.session.kill", SessionParams;
    SessionNotify => "kolibri.session.notify", SessionEventParams;

    AuditRead => "kolibri.audit.read", AuditReadParams;
    LicenseInfo => "kolibri.license.info", NoParams;

    AlarmList => "kolibri.alarm.list", AlarmListParams;
    AlarmAcknowledge => "kolibri.alarm.acknowledge", AlarmAckParams;
    AlarmNotify => "kolibri.alarm.notify", AlarmEventParams;
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
