//! Account expiry and auditing.

use kolibri_schema::library::{canonical_date, user_name};
use kolibri_schema::{FieldSchema, MethodDescriptor};

use super::rules::limit;
use super::{call, v1_0};
use crate::method::Method;
use crate::version::V3_1;

pub(super) fn layer() -> Vec<MethodDescriptor> {
    vec![
        call(Method::UserCreate, V3_1)
            .object_params(v1_0::user_create_schema().optional("expires", canonical_date())),
        call(Method::UserModify, V3_1)
            .object_params(v1_0::user_modify_schema().optional("expires", canonical_date())),
        call(Method::UserUnlock, V3_1)
            .object_params(FieldSchema::new().required("user", user_name())),
        call(Method::AuditRead, V3_1).object_params(
            FieldSchema::new()
                .required("from", canonical_date())
                .required("to", canonical_date())
                .optional("user", user_name())
                .optional("limit", limit()),
        ),
        call(Method::LicenseInfo, V3_1),
    ]
}
