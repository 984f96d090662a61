use serde_json::{Map, Value};
use tracing::trace;

use crate::envelope::{
    JSONRPC_VERSION, KEY_ERROR, KEY_ID, KEY_JSONRPC, KEY_METHOD, KEY_PARAMS, KEY_RESULT,
    KEY_SERVER,
};
use crate::kind::MessageKind;

/// Classify an arbitrary JSON value into a message kind.
///
/// Never fails: shapes that are not Kolibri envelopes map to
/// [`MessageKind::Invalid`]. Presence checks are own-property checks, so a
/// field explicitly set to `null` counts as present.
pub fn classify(value: &Value) -> MessageKind {
    diagnose(value).unwrap_or(MessageKind::Invalid)
}

/// Classify a value, explaining why it is invalid when it is.
///
/// The checks run in a fixed order; the first failing check decides the
/// reason. `Ok` never carries [`MessageKind::Invalid`].
pub fn diagnose(value: &Value) -> Result<MessageKind, &'static str> {
    let kind = diagnose_object(value);
    match kind {
        Ok(kind) => trace!(%kind, "classified envelope"),
        Err(reason) => trace!(reason, "envelope is invalid"),
    }
    kind
}

fn diagnose_object(value: &Value) -> Result<MessageKind, &'static str> {
    let Value::Object(map) = value else {
        return Err("envelope is not a JSON object");
    };

    match map.get(KEY_JSONRPC) {
        Some(Value::String(tag)) if tag == JSONRPC_VERSION => {}
        Some(_) => return Err("jsonrpc tag is not \"2.0\""),
        None => return Err("jsonrpc tag is missing"),
    }

    let routed = map.contains_key(KEY_SERVER);
    let with_routing = |kind: MessageKind| if routed { kind.routed() } else { kind };

    if map.contains_key(KEY_METHOD) {
        if map.contains_key(KEY_RESULT) || map.contains_key(KEY_ERROR) {
            return Err("method is combined with result or error");
        }
        if let Some(params) = map.get(KEY_PARAMS) {
            if !params.is_object() && !params.is_array() {
                return Err("params is neither an object nor an array");
            }
        }
        let kind = if map.contains_key(KEY_ID) {
            MessageKind::Request
        } else {
            MessageKind::Notification
        };
        return Ok(with_routing(kind));
    }

    if map.contains_key(KEY_RESULT) {
        if map.contains_key(KEY_ERROR) {
            return Err("result is combined with error");
        }
        return Ok(with_routing(MessageKind::Result));
    }

    if let Some(error) = map.get(KEY_ERROR) {
        if !is_error_object(error) {
            return Err("error is not an object with code and message");
        }
        return Ok(with_routing(MessageKind::Error));
    }

    Err("envelope has no method, result or error")
}

fn is_error_object(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|error: &Map<String, Value>| {
            error.contains_key("code") && error.contains_key("message")
        })
}
