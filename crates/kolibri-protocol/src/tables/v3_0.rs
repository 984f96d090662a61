//! Project versioning, export and import.

use kolibri_schema::library::{node_path, project_name, user_name};
use kolibri_schema::{FieldRule, FieldSchema, MethodDescriptor};

use super::rules::semver;
use super::{call, v1_0};
use crate::method::Method;
use crate::version::V3_0;

fn with_version_bounds(schema: FieldSchema) -> FieldSchema {
    schema
        .optional("minVersion", semver())
        .optional("maxVersion", semver())
}

pub(super) fn layer() -> Vec<MethodDescriptor> {
    vec![
        call(Method::ProjectCreate, V3_0)
            .object_params(with_version_bounds(v1_0::project_create_schema())),
        call(Method::ProjectModify, V3_0)
            .object_params(with_version_bounds(v1_0::project_modify_schema())),
        call(Method::ProjectExport, V3_0)
            .object_params(FieldSchema::new().required("project", project_name())),
        call(Method::ProjectImport, V3_0).object_params(
            FieldSchema::new()
                .required("project", project_name())
                .required("data", FieldRule::bounded_string(1, usize::MAX))
                .optional("overwrite", FieldRule::boolean()),
        ),
        call(Method::Login, V3_0).object_params(
            v1_0::login_schema().optional("client", FieldRule::bounded_string(1, 64)),
        ),
        call(Method::UserListGroups, V3_0)
            .object_params(FieldSchema::new().required("user", user_name())),
        call(Method::NodeCopy, V3_0).object_params(
            FieldSchema::new()
                .required("path", node_path())
                .required("target", node_path()),
        ),
    ]
}
