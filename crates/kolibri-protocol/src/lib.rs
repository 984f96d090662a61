//! Kolibri method catalog and inbound validation.
//!
//! [`Protocol`] is the entry point: it classifies an envelope, resolves its
//! method at the negotiated version, validates the params and decodes them
//! into [`MethodParams`].

pub mod error;
pub mod method;
pub mod params;
pub mod protocol;
pub mod tables;
pub mod version;

pub use error::{ProtocolError, Result};
pub use method::{Method, MethodParams, UnknownMethodName};
pub use protocol::{Call, Inbound, Protocol};
pub use tables::{build_catalog, catalog};
pub use version::{negotiate, KNOWN_VERSIONS, LATEST, V1_0, V2_1, V3_0, V3_1, V3_2, V3_3};
