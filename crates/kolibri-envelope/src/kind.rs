//! Message kinds.
//!
//! Four base roles (request, notification, result, error), each with a routed
//! twin used on the broker-internal path, plus `Invalid` for anything else.

use std::fmt;

/// The role of one envelope on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Method call that expects a correlated response.
    Request,
    /// Method call without an `id`; no response is sent.
    Notification,
    /// Successful response.
    Result,
    /// Error response.
    Error,
    /// Request carrying the `_server` routing tag.
    RequestRouted,
    /// Notification carrying the `_server` routing tag.
    NotificationRouted,
    /// Result carrying the `_server` routing tag.
    ResultRouted,
    /// Error carrying the `_server` routing tag.
    ErrorRouted,
    /// Not a recognizable Kolibri envelope.
    Invalid,
}

impl MessageKind {
    /// Every kind, base roles first.
    pub const ALL: [MessageKind; 9] = [
        MessageKind::Request,
        MessageKind::Notification,
        MessageKind::Result,
        MessageKind::Error,
        MessageKind::RequestRouted,
        MessageKind::NotificationRouted,
        MessageKind::ResultRouted,
        MessageKind::ErrorRouted,
        MessageKind::Invalid,
    ];

    /// Returns a human-readable name for the kind.
    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Request => "request",
            MessageKind::Notification => "notification",
            MessageKind::Result => "result",
            MessageKind::Error => "error",
            MessageKind::RequestRouted => "request-routed",
            MessageKind::NotificationRouted => "notification-routed",
            MessageKind::ResultRouted => "result-routed",
            MessageKind::ErrorRouted => "error-routed",
            MessageKind::Invalid => "invalid",
        }
    }

    /// Returns true if the envelope carries a routing tag.
    pub fn is_routed(self) -> bool {
        matches!(
            self,
            MessageKind::RequestRouted
                | MessageKind::NotificationRouted
                | MessageKind::ResultRouted
                | MessageKind::ErrorRouted
        )
    }

    /// Returns true if the envelope names a method (request or notification).
    pub fn is_call(self) -> bool {
        matches!(
            self.unrouted(),
            MessageKind::Request | MessageKind::Notification
        )
    }

    /// Returns true if the envelope answers an earlier request.
    pub fn is_response(self) -> bool {
        matches!(self.unrouted(), MessageKind::Result | MessageKind::Error)
    }

    /// Returns true if a correlated response is owed for this envelope.
    pub fn expects_response(self) -> bool {
        self.unrouted() == MessageKind::Request
    }

    /// The routed twin of a base kind. Routed kinds and `Invalid` map to themselves.
    pub fn routed(self) -> Self {
        match self {
            MessageKind::Request => MessageKind::RequestRouted,
            MessageKind::Notification => MessageKind::NotificationRouted,
            MessageKind::Result => MessageKind::ResultRouted,
            MessageKind::Error => MessageKind::ErrorRouted,
            other => other,
        }
    }

    /// The base kind of a routed kind. Base kinds and `Invalid` map to themselves.
    pub fn unrouted(self) -> Self {
        match self {
            MessageKind::RequestRouted => MessageKind::Request,
            MessageKind::NotificationRouted => MessageKind::Notification,
            MessageKind::ResultRouted => MessageKind::Result,
            MessageKind::ErrorRouted => MessageKind::Error,
            other => other,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routed_and_unrouted_are_inverse_on_base_kinds() {
        for kind in [
            MessageKind::Request,
            MessageKind::Notification,
            MessageKind::Result,
            MessageKind::Error,
        ] {
            assert!(!kind.is_routed());
            assert!(kind.routed().is_routed());
            assert_eq!(kind.routed().unrouted(), kind);
        }
        assert_eq!(MessageKind::Invalid.routed(), MessageKind::Invalid);
        assert_eq!(MessageKind::Invalid.unrouted(), MessageKind::Invalid);
    }

    #[test]
    fn role_predicates() {
        assert!(MessageKind::RequestRouted.is_call());
        assert!(MessageKind::NotificationRouted.is_call());
        assert!(!MessageKind::Result.is_call());
        assert!(MessageKind::ErrorRouted.is_response());
        assert!(MessageKind::Request.expects_response());
        assert!(!MessageKind::Notification.expects_response());
        assert!(!MessageKind::Invalid.is_call());
        assert!(!MessageKind::Invalid.is_response());
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = MessageKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MessageKind::ALL.len());
        assert_eq!(MessageKind::ResultRouted.to_string(), "result-routed");
    }
}
