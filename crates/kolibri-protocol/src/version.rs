//! Protocol version layers of the Kolibri catalog.

pub use kolibri_schema::ProtocolVersion;

pub const V1_0: ProtocolVersion = ProtocolVersion::new(1, 0);
pub const V2_1: ProtocolVersion = ProtocolVersion::new(2, 1);
pub const V3_0: ProtocolVersion = ProtocolVersion::new(3, 0);
pub const V3_1: ProtocolVersion = ProtocolVersion::new(3, 1);
pub const V3_2: ProtocolVersion = ProtocolVersion::new(3, 2);
pub const V3_3: ProtocolVersion = ProtocolVersion::new(3, 3);

/// Every layer of the catalog, ascending.
pub const KNOWN_VERSIONS: [ProtocolVersion; 6] = [V1_0, V2_1, V3_0, V3_1, V3_2, V3_3];

/// The newest layer.
pub const LATEST: ProtocolVersion = V3_3;

/// Pick the newest known layer not newer than what the peer asked for.
///
/// Returns `None` when the request predates every layer.
pub fn negotiate(requested: ProtocolVersion) -> Option<ProtocolVersion> {
    KNOWN_VERSIONS
        .iter()
        .rev()
        .copied()
        .find(|known| *known <= requested)
}
