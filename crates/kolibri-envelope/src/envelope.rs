use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::classify::diagnose;
use crate::error::{EnvelopeError, Result};
use crate::kind::MessageKind;

/// The only accepted value of the `jsonrpc` key.
pub const JSONRPC_VERSION: &str = "2.0";

pub(crate) const KEY_JSONRPC: &str = "jsonrpc";
pub(crate) const KEY_ID: &str = "id";
pub(crate) const KEY_METHOD: &str = "method";
pub(crate) const KEY_PARAMS: &str = "params";
pub(crate) const KEY_RESULT: &str = "result";
pub(crate) const KEY_ERROR: &str = "error";
pub(crate) const KEY_SERVER: &str = "_server";

/// Invalid JSON was received.
pub const PARSE_ERROR: i64 = -32700;
/// The JSON sent is not a valid request object.
pub const INVALID_REQUEST: i64 = -32600;
/// The method does not exist at the negotiated protocol version.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i64 = -32602;
/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i64 = -32603;

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code.
    pub code: i64,
    /// Short error description.
    pub message: String,
    /// Additional error data.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<Value>,
}

impl RpcError {
    /// Create an error without data.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach error data.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Method-not-found error naming the method.
    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("method not found: {method}"))
    }

    /// Invalid-params error.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    /// Invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(INVALID_REQUEST, message)
    }

    /// Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }
}

/// One JSON-RPC message, optionally carrying the broker routing tag.
///
/// Optional fields that are absent are never serialized. `result` and
/// `params` keep an explicit `null` as `Some(Value::Null)`, so a successful
/// response always carries its `result` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Protocol tag, always [`JSONRPC_VERSION`].
    pub jsonrpc: String,
    /// Dotted method name (requests and notifications).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Correlation id (requests and their responses).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Method parameters: an object or an array of objects.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub params: Option<Value>,
    /// Successful result.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    /// Error response payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    /// Routing tag identifying the originating backend.
    #[serde(rename = "_server", default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl Envelope {
    /// An envelope with only the protocol tag set.
    pub(crate) fn empty() -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: None,
            id: None,
            params: None,
            result: None,
            error: None,
            server: None,
        }
    }

    /// Classify and decode a parsed JSON value.
    ///
    /// Values that classify as [`MessageKind::Invalid`] are rejected with
    /// [`EnvelopeError::Malformed`]. Requests must carry a non-null id.
    pub fn from_value(value: Value) -> Result<Self> {
        let kind = diagnose(&value).map_err(EnvelopeError::Malformed)?;
        let envelope: Envelope = serde_json::from_value(value).map_err(EnvelopeError::Decode)?;
        if kind.expects_response() && envelope.id.is_none() {
            return Err(EnvelopeError::Malformed("request id is null"));
        }
        if kind.is_routed() && envelope.server.is_none() {
            return Err(EnvelopeError::Malformed("routing tag is null"));
        }
        Ok(envelope)
    }

    /// Parse raw bytes, then classify and decode.
    pub fn from_slice(payload: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(payload).map_err(EnvelopeError::InvalidJson)?;
        Self::from_value(value)
    }

    /// The kind of a decoded envelope.
    ///
    /// Agrees with [`crate::classify`] on the envelope's own serialization.
    pub fn kind(&self) -> MessageKind {
        let base = if self.method.is_some() {
            if self.result.is_some() || self.error.is_some() {
                return MessageKind::Invalid;
            }
            if self.id.is_some() {
                MessageKind::Request
            } else {
                MessageKind::Notification
            }
        } else if self.result.is_some() {
            if self.error.is_some() {
                return MessageKind::Invalid;
            }
            MessageKind::Result
        } else if self.error.is_some() {
            MessageKind::Error
        } else {
            return MessageKind::Invalid;
        };

        if self.server.is_some() {
            base.routed()
        } else {
            base
        }
    }

    /// Returns true if the envelope carries a routing tag.
    pub fn is_routed(&self) -> bool {
        self.server.is_some()
    }

    /// Serialize into a JSON value.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Serialize into JSON bytes.
    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Keeps an explicit JSON `null` distinguishable from an absent key.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
