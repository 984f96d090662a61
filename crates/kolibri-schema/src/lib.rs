//! Field rules, parameter validation and a versioned method registry.
//!
//! Schemas are declarative tables of field rules, built once at startup and
//! interpreted by a single generic validator. The registry maps a
//! (protocol version, method name) pair to the method's parameter and result
//! schemas, falling through to older version layers for methods that a newer
//! layer does not redefine.

pub mod config;
pub mod error;
pub mod library;
pub mod registry;
pub mod rule;
pub mod schema;
pub mod validator;
pub mod version;

pub use config::ValidatorConfig;
pub use error::{Result, SchemaError};
pub use registry::{MethodDescriptor, MethodKind, VersionedRegistry};
pub use rule::{FieldRule, Kind};
pub use schema::{FieldSchema, FieldSpec, Presence, SetRule};
pub use validator::{validate, ValidationResult, Validator, Violation};
pub use version::ProtocolVersion;
