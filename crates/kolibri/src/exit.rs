use std::fmt;
use std::io;

use kolibri_protocol::ProtocolError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
/// Input was read but rejected: malformed, unknown method or invalid params.
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

/// Exit code for a message the pipeline rejected.
pub fn protocol_exit_code(err: &ProtocolError) -> i32 {
    match err {
        ProtocolError::Registry(_) => INTERNAL,
        _ => DATA_INVALID,
    }
}

#[cfg(test)]
mod tests {
    use kolibri_envelope::EnvelopeError;
    use kolibri_schema::SchemaError;

    use super::*;

    #[test]
    fn io_errors_map_to_exit_codes() {
        let denied = io_error("read", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(denied.code, PERMISSION_DENIED);
        assert!(denied.message.starts_with("read: "));
        let missing = io_error("read", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(missing.code, FAILURE);
    }

    #[test]
    fn rejected_messages_are_data_invalid() {
        let malformed = ProtocolError::from(EnvelopeError::Malformed("jsonrpc tag is missing"));
        assert_eq!(protocol_exit_code(&malformed), DATA_INVALID);
        let registry = ProtocolError::from(SchemaError::InvalidVersion("x".into()));
        assert_eq!(protocol_exit_code(&registry), INTERNAL);
    }
}
