//! Outgoing envelopes.
//!
//! Builders always stamp `jsonrpc: "2.0"` and leave absent optional fields
//! out of the serialized form.

use serde_json::Value;

use crate::envelope::{Envelope, RpcError};

/// Build a request that expects a response correlated by `id`.
pub fn build_request(
    method: impl Into<String>,
    id: u64,
    params: Option<Value>,
    server: Option<&str>,
) -> Envelope {
    Envelope {
        method: Some(method.into()),
        id: Some(id),
        params,
        server: server.map(str::to_string),
        ..Envelope::empty()
    }
}

/// Build a notification (a method call without an id).
pub fn build_notification(
    method: impl Into<String>,
    params: Option<Value>,
    server: Option<&str>,
) -> Envelope {
    Envelope {
        method: Some(method.into()),
        params,
        server: server.map(str::to_string),
        ..Envelope::empty()
    }
}

/// Build a successful response.
///
/// An absent result becomes an explicit `null`: success responses always
/// carry a `result` key.
pub fn build_result(id: u64, result: Option<Value>, server: Option<&str>) -> Envelope {
    Envelope {
        id: Some(id),
        result: Some(result.unwrap_or(Value::Null)),
        server: server.map(str::to_string),
        ..Envelope::empty()
    }
}

/// Build an error response.
///
/// `id` is `None` only when the failing request's id could not be recovered.
pub fn build_error(id: Option<u64>, error: RpcError, server: Option<&str>) -> Envelope {
    Envelope {
        id,
        error: Some(error),
        server: server.map(str::to_string),
        ..Envelope::empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::classify::classify;
    use crate::envelope::METHOD_NOT_FOUND;
    use crate::kind::MessageKind;

    #[test]
    fn request_classifies_as_request() {
        let envelope = build_request("kolibri.read", 5, Some(json!([{"path": "/a"}])), None);
        let value = envelope.to_value().unwrap();
        assert_eq!(classify(&value), MessageKind::Request);
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "method": "kolibri.read", "id": 5, "params": [{"path": "/a"}]})
        );
    }

    #[test]
    fn routed_request_classifies_as_routed() {
        let envelope = build_request("kolibri.ping", 1, None, Some("backend-2"));
        let value = envelope.to_value().unwrap();
        assert_eq!(classify(&value), MessageKind::RequestRouted);
        assert_eq!(value["_server"], "backend-2");
        assert!(value.get("params").is_none());
    }

    #[test]
    fn notification_has_no_id() {
        let value = build_notification("kolibri.close", None, None)
            .to_value()
            .unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "method": "kolibri.close"}));
        assert_eq!(classify(&value), MessageKind::Notification);
    }

    #[test]
    fn absent_result_becomes_null() {
        let value = build_result(9, None, None).to_value().unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": 9, "result": null}));
        assert_eq!(classify(&value), MessageKind::Result);
    }

    #[test]
    fn error_response_round_trips_kind() {
        let envelope = build_error(
            Some(3),
            RpcError::method_not_found("kolibri.nope"),
            Some("backend-1"),
        );
        assert_eq!(envelope.kind(), MessageKind::ErrorRouted);

        let value = envelope.to_value().unwrap();
        assert_eq!(value["error"]["code"], METHOD_NOT_FOUND);
        assert!(value["error"].get("data").is_none());
        assert_eq!(classify(&value), MessageKind::ErrorRouted);
    }

    #[test]
    fn error_without_id_omits_key() {
        let value = build_error(None, RpcError::invalid_request("bad"), None)
            .to_value()
            .unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(classify(&value), MessageKind::Error);
    }
}
