//! The built-in method catalog, one module per version layer.

use std::sync::LazyLock;

use kolibri_schema::{MethodDescriptor, ProtocolVersion, Result, VersionedRegistry};

use crate::method::Method;
use crate::version::{V1_0, V2_1, V3_0, V3_1, V3_2, V3_3};

mod rules;
mod v1_0;
mod v2_1;
mod v3_0;
mod v3_1;
mod v3_2;
mod v3_3;

static CATALOG: LazyLock<VersionedRegistry> = LazyLock::new(|| {
    build_catalog()
        .unwrap_or_else(|err| panic!("BUG: built-in method catalog is inconsistent: {err}"))
});

fn call(method: Method, since: ProtocolVersion) -> MethodDescriptor {
    MethodDescriptor::call(method.as_str(), since)
}

fn notification(method: Method, since: ProtocolVersion) -> MethodDescriptor {
    MethodDescriptor::notification(method.as_str(), since)
}

/// Build a fresh copy of the catalog.
pub fn build_catalog() -> Result<VersionedRegistry> {
    VersionedRegistry::from_layers([
        (V1_0, v1_0::layer()),
        (V2_1, v2_1::layer()),
        (V3_0, v3_0::layer()),
        (V3_1, v3_1::layer()),
        (V3_2, v3_2::layer()),
        (V3_3, v3_3::layer()),
    ])
}

/// The process-wide catalog, built on first use and never mutated.
pub fn catalog() -> &'static VersionedRegistry {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use kolibri_schema::MethodKind;

    use super::*;
    use crate::version::{KNOWN_VERSIONS, LATEST};

    #[test]
    fn catalog_builds() {
        let registry = build_catalog().unwrap();
        assert_eq!(registry.versions(), KNOWN_VERSIONS);
        assert_eq!(registry.layer(V1_0).len(), 51);
    }

    #[test]
    fn every_method_is_registered() {
        let effective: Vec<&str> = catalog().effective(LATEST).iter().map(|d| d.name).collect();
        assert_eq!(effective.len(), Method::ALL.len());
        for method in Method::ALL {
            assert!(
                effective.contains(&method.as_str()),
                "{method} missing from the catalog"
            );
        }
    }

    #[test]
    fn overrides_replace_earlier_shapes() {
        let registry = catalog();
        let browse = |version| {
            registry
                .resolve(version, Method::NodeBrowse.as_str())
                .and_then(|d| d.param_schema())
                .is_some_and(|schema| schema.field("detailed").is_some())
        };
        assert!(!browse(V1_0));
        assert!(browse(V2_1));
        assert!(browse(V3_3));

        let read = registry.resolve(V3_3, Method::Read.as_str()).unwrap();
        assert_eq!(read.since, V3_2);
        assert!(read.result.is_some());

        let modify = registry.resolve(V3_1, Method::UserModify.as_str()).unwrap();
        let schema = modify.param_schema().unwrap();
        assert!(schema.field("expires").is_some());
        assert!(schema.set_rule().is_some());
    }

    #[test]
    fn later_methods_are_hidden_from_older_peers() {
        let registry = catalog();
        assert!(!registry.contains(V3_2, Method::NodeMove.as_str()));
        assert!(registry.contains(V3_3, Method::NodeMove.as_str()));
        assert!(!registry.contains(V1_0, Method::SessionKill.as_str()));
    }

    #[test]
    fn notifications_are_marked() {
        let registry = catalog();
        for method in [
            Method::Close,
            Method::DataNotify,
            Method::NodeNotify,
            Method::UserNotify,
            Method::AlarmNotify,
            Method::SessionNotify,
        ] {
            let descriptor = registry.resolve(LATEST, method.as_str()).unwrap();
            assert_eq!(descriptor.kind, MethodKind::Notification, "{method}");
        }
        let cancel = registry.resolve(LATEST, Method::Cancel.as_str()).unwrap();
        assert_eq!(cancel.kind, MethodKind::Call);
    }
}
