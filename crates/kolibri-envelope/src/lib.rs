//! JSON-RPC 2.0 envelopes for the Kolibri protocol.
//!
//! Every Kolibri message travels in a JSON-RPC envelope:
//! - `jsonrpc` is always the literal `"2.0"`
//! - `id` correlates a request with its response (absent on notifications)
//! - `_server` routes broker-internal traffic back to the originating backend
//!
//! Classification is total: any JSON value maps to exactly one [`MessageKind`],
//! with unrecognized shapes landing on [`MessageKind::Invalid`].

pub mod builder;
pub mod classify;
pub mod envelope;
pub mod error;
pub mod kind;

pub use builder::{build_error, build_notification, build_request, build_result};
pub use classify::{classify, diagnose};
pub use envelope::{
    Envelope, RpcError, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR,
};
pub use error::{EnvelopeError, Result};
pub use kind::MessageKind;
