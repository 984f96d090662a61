use crate::version::ProtocolVersion;

/// Errors raised while building schemas and the method registry.
///
/// These are configuration errors: they surface at startup, never while a
/// message is being validated.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The same method was registered twice in one version layer.
    #[error("method {method} registered twice at {version}")]
    DuplicateMethod {
        version: ProtocolVersion,
        method: String,
    },

    /// A descriptor was registered in a layer other than the one it declares.
    #[error("method {method} declares since {since} but was registered at {version}")]
    VersionMismatch {
        version: ProtocolVersion,
        method: String,
        since: ProtocolVersion,
    },

    /// A protocol version string could not be parsed.
    #[error("invalid protocol version: {0}")]
    InvalidVersion(String),

    /// A field pattern could not be compiled.
    #[error("invalid field pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
