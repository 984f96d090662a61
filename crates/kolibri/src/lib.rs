//! Kolibri JSON-RPC protocol layer.
//!
//! Kolibri speaks JSON-RPC 2.0 between clients, a broker and backend servers.
//! This crate bundles the pieces a broker needs to vet traffic before
//! forwarding it.
//!
//! # Crate Structure
//!
//! - [`envelope`] classifies and builds envelopes, including the `_server`
//!   routing tag
//! - [`schema`] holds field rules, the generic validator and the versioned
//!   method registry
//! - [`protocol`] holds the built-in method catalog and the inbound pipeline
//!
//! ```
//! use kolibri::{Protocol, V3_3};
//! use serde_json::json;
//!
//! let protocol = Protocol::new(V3_3);
//! let message = json!({
//!     "jsonrpc": "2.0",
//!     "method": "kolibri.cancel",
//!     "id": 1,
//!     "params": {"tid": 70000}
//! });
//! let err = protocol.inspect(&message).unwrap_err();
//! assert_eq!(err.violations()[0].path, "params.tid");
//! ```

/// Re-export envelope types.
pub mod envelope {
    pub use kolibri_envelope::*;
}

/// Re-export schema types.
pub mod schema {
    pub use kolibri_schema::*;
}

/// Re-export catalog and pipeline types.
pub mod protocol {
    pub use kolibri_protocol::*;
}

pub use kolibri_envelope::{classify, Envelope, MessageKind, RpcError};
pub use kolibri_protocol::{
    negotiate, Inbound, Method, MethodParams, Protocol, ProtocolError, KNOWN_VERSIONS, LATEST,
    V1_0, V2_1, V3_0, V3_1, V3_2, V3_3,
};
pub use kolibri_schema::{ProtocolVersion, ValidatorConfig, Violation};
