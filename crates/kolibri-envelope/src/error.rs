/// Errors that can occur while turning JSON into a typed envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The value does not classify as any Kolibri message kind.
    #[error("malformed envelope: {0}")]
    Malformed(&'static str),

    /// The envelope classified but its fields could not be decoded.
    #[error("envelope fields could not be decoded: {0}")]
    Decode(serde_json::Error),

    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EnvelopeError>;
