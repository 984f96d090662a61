use kolibri_envelope::{build_error, Envelope, EnvelopeError, RpcError};
use kolibri_schema::{ProtocolVersion, SchemaError, Violation};
use serde_json::json;

/// Why an inbound message was rejected, or an outgoing one refused.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Not a Kolibri envelope, or one that could not be decoded.
    #[error("malformed message: {0}")]
    Malformed(#[from] EnvelopeError),

    /// The method is not available at the negotiated version.
    #[error("unknown method {method} at {version}")]
    UnknownMethod {
        id: Option<u64>,
        server: Option<String>,
        method: String,
        version: ProtocolVersion,
    },

    /// The params violate the method's schema.
    #[error("invalid params for {method}: {}", summarize(.violations))]
    InvalidParams {
        id: Option<u64>,
        server: Option<String>,
        method: String,
        violations: Vec<Violation>,
    },

    /// An outgoing result violates the method's result schema.
    #[error("invalid result for {method}: {}", summarize(.violations))]
    InvalidResult {
        method: String,
        violations: Vec<Violation>,
    },

    #[error(transparent)]
    Registry(#[from] SchemaError),
}

fn summarize(violations: &[Violation]) -> String {
    match violations {
        [] => "no violations".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

impl ProtocolError {
    /// Violations carried by the error, if any.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ProtocolError::InvalidParams { violations, .. }
            | ProtocolError::InvalidResult { violations, .. } => violations,
            _ => &[],
        }
    }

    /// The JSON-RPC error code reported to the peer.
    pub fn code(&self) -> Option<i64> {
        match self {
            ProtocolError::UnknownMethod { .. } => Some(kolibri_envelope::METHOD_NOT_FOUND),
            ProtocolError::InvalidParams { .. } => Some(kolibri_envelope::INVALID_PARAMS),
            _ => None,
        }
    }

    /// The error response owed to the peer.
    ///
    /// Only rejected requests get one: it carries the request id and routing
    /// tag. Malformed messages and notifications are dropped without a reply.
    pub fn to_response(&self) -> Option<Envelope> {
        match self {
            ProtocolError::UnknownMethod {
                id: Some(id),
                server,
                method,
                ..
            } => Some(build_error(
                Some(*id),
                RpcError::method_not_found(method),
                server.as_deref(),
            )),
            ProtocolError::InvalidParams {
                id: Some(id),
                server,
                method,
                violations,
            } => {
                let error = RpcError::invalid_params(format!("invalid params for {method}"))
                    .with_data(json!({ "violations": violations }));
                Some(build_error(Some(*id), error, server.as_deref()))
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
