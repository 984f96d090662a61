//! Inbound pipeline: classify, resolve, validate, then decode.

use kolibri_envelope::{
    build_error, build_notification, build_request, build_result, Envelope, EnvelopeError,
    MessageKind, RpcError,
};
use kolibri_schema::{
    FieldRule, MethodDescriptor, ProtocolVersion, ValidationResult, Validator, ValidatorConfig,
    VersionedRegistry, Violation,
};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::error::{ProtocolError, Result};
use crate::method::{Method, MethodParams};
use crate::tables::catalog;

/// A validated method call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub params: MethodParams,
}

/// An accepted inbound message.
#[derive(Debug, Clone)]
pub struct Inbound {
    pub kind: MessageKind,
    pub envelope: Envelope,
    /// Set for requests and notifications.
    pub call: Option<Call>,
}

impl Inbound {
    pub fn id(&self) -> Option<u64> {
        self.envelope.id
    }

    /// Routing tag of the originating backend.
    pub fn server(&self) -> Option<&str> {
        self.envelope.server.as_deref()
    }

    pub fn method(&self) -> Option<Method> {
        self.call.as_ref().map(|call| call.method)
    }

    /// Returns true if a correlated response is owed.
    pub fn expects_response(&self) -> bool {
        self.kind.expects_response()
    }
}

/// Validates traffic for one negotiated protocol version.
///
/// Holds no per-message state; one instance can serve any number of
/// connections at the same version.
#[derive(Debug, Clone)]
pub struct Protocol {
    version: ProtocolVersion,
    validator: Validator,
    registry: &'static VersionedRegistry,
}

impl Protocol {
    pub fn new(version: ProtocolVersion) -> Self {
        Self::with_config(version, ValidatorConfig::default())
    }

    pub fn with_config(version: ProtocolVersion, config: ValidatorConfig) -> Self {
        Self {
            version,
            validator: Validator::new(config),
            registry: catalog(),
        }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn config(&self) -> &ValidatorConfig {
        self.validator.config()
    }

    pub fn registry(&self) -> &'static VersionedRegistry {
        self.registry
    }

    /// Shape of `method` at the negotiated version.
    pub fn resolve(&self, method: &str) -> Option<&'static MethodDescriptor> {
        self.registry.resolve(self.version, method)
    }

    /// Parse raw bytes and inspect the message.
    pub fn inspect_slice(&self, payload: &[u8]) -> Result<Inbound> {
        let value: Value = serde_json::from_slice(payload).map_err(EnvelopeError::InvalidJson)?;
        self.inspect(&value)
    }

    /// Classify a message and, for method calls, validate and decode its params.
    ///
    /// Responses are accepted as soon as they classify; their results are
    /// checked separately by [`Protocol::check_result`] on the sending side.
    pub fn inspect(&self, message: &Value) -> Result<Inbound> {
        let envelope = Envelope::from_value(message.clone()).map_err(|err| {
            warn!(error = %err, "rejected malformed message");
            err
        })?;
        let kind = envelope.kind();
        trace!(%kind, id = ?envelope.id, "classified message");

        let call = if kind.is_call() {
            Some(self.admit(&envelope)?)
        } else {
            None
        };

        Ok(Inbound {
            kind,
            envelope,
            call,
        })
    }

    fn admit(&self, envelope: &Envelope) -> Result<Call> {
        let name = envelope.method.as_deref().unwrap_or_default();
        let unknown = || ProtocolError::UnknownMethod {
            id: envelope.id,
            server: envelope.server.clone(),
            method: name.to_string(),
            version: self.version,
        };

        let Some(descriptor) = self.resolve(name) else {
            warn!(method = name, version = %self.version, "rejected unknown method");
            return Err(unknown());
        };
        let method: Method = name.parse().map_err(|_| unknown())?;

        let mut params = envelope.params.clone().filter(|params| !params.is_null());
        let invalid = |violations: Vec<Violation>| ProtocolError::InvalidParams {
            id: envelope.id,
            server: envelope.server.clone(),
            method: name.to_string(),
            violations,
        };

        if let Err(violations) = self.check_params(descriptor, params.as_mut()) {
            warn!(
                method = name,
                violations = violations.len(),
                first = %violations[0],
                "rejected invalid params"
            );
            return Err(invalid(violations));
        }

        let typed = descriptor.params.as_ref().and(params);
        let params = MethodParams::decode(method, typed).map_err(|err| {
            warn!(method = name, error = %err, "validated params failed to decode");
            invalid(vec![Violation::new("params", "decode", err.to_string())])
        })?;

        debug!(method = name, since = %descriptor.since, "accepted call");
        Ok(Call { method, params })
    }

    /// Validate params and normalize them for typed decoding.
    fn check_params(
        &self,
        descriptor: &MethodDescriptor,
        params: Option<&mut Value>,
    ) -> ValidationResult {
        match (&descriptor.params, params) {
            (None, None) => Ok(()),
            (None, Some(_)) if self.config().strict_mode => Err(vec![Violation::new(
                "params",
                "noParams",
                format!("{} takes no parameters", descriptor.name),
            )]),
            (None, Some(_)) => Ok(()),
            (Some(FieldRule::Nested(schema)), None) => {
                self.validator
                    .validate_schema(&Value::Object(Map::new()), schema, "params")
            }
            (Some(_), None) => Err(vec![Violation::new(
                "params",
                "required",
                "params are required",
            )]),
            (Some(rule), Some(value)) => self.validator.normalize(value, rule, "params"),
        }
    }

    /// Check an outgoing result against the method's result schema.
    ///
    /// Methods without a result schema accept anything.
    pub fn check_result(&self, method: Method, result: &Value) -> Result<()> {
        let descriptor = self
            .resolve(method.as_str())
            .ok_or_else(|| ProtocolError::UnknownMethod {
                id: None,
                server: None,
                method: method.as_str().to_string(),
                version: self.version,
            })?;
        let Some(rule) = descriptor.result.as_ref() else {
            return Ok(());
        };
        if !self.config().validate_results {
            return Ok(());
        }
        self.validator
            .validate(result, rule, "result")
            .map_err(|violations| ProtocolError::InvalidResult {
                method: method.as_str().to_string(),
                violations,
            })
    }

    /// Build the success response for an inbound request.
    ///
    /// Returns `Ok(None)` when nothing is owed (notifications, responses).
    /// The result is checked against the method's result schema first.
    pub fn reply(&self, inbound: &Inbound, result: Option<Value>) -> Result<Option<Envelope>> {
        let Some(id) = owed_id(inbound) else {
            return Ok(None);
        };
        if let (Some(call), Some(result)) = (&inbound.call, &result) {
            self.check_result(call.method, result)?;
        }
        Ok(Some(build_result(id, result, inbound.server())))
    }

    /// Build the error response for an inbound request.
    pub fn reply_error(&self, inbound: &Inbound, error: RpcError) -> Option<Envelope> {
        owed_id(inbound).map(|id| build_error(Some(id), error, inbound.server()))
    }

    /// Build a request from typed params, validated against this version.
    pub fn request(
        &self,
        id: u64,
        params: &MethodParams,
        server: Option<&str>,
    ) -> Result<Envelope> {
        let (method, params) = self.outgoing(params, Some(id), server)?;
        Ok(build_request(method.as_str(), id, params, server))
    }

    /// Build a notification from typed params, validated against this version.
    pub fn notify(&self, params: &MethodParams, server: Option<&str>) -> Result<Envelope> {
        let (method, params) = self.outgoing(params, None, server)?;
        Ok(build_notification(method.as_str(), params, server))
    }

    fn outgoing(
        &self,
        params: &MethodParams,
        id: Option<u64>,
        server: Option<&str>,
    ) -> Result<(Method, Option<Value>)> {
        let method = params.method();
        let descriptor = self
            .resolve(method.as_str())
            .ok_or_else(|| ProtocolError::UnknownMethod {
                id,
                server: server.map(str::to_string),
                method: method.as_str().to_string(),
                version: self.version,
            })?;
        if descriptor.params.is_none() {
            return Ok((method, None));
        }

        let mut encoded = params.encode().map_err(EnvelopeError::Decode)?;
        self.check_params(descriptor, Some(&mut encoded))
            .map_err(|violations| ProtocolError::InvalidParams {
                id,
                server: server.map(str::to_string),
                method: method.as_str().to_string(),
                violations,
            })?;
        Ok((method, Some(encoded)))
    }
}

fn owed_id(inbound: &Inbound) -> Option<u64> {
    inbound.id().filter(|_| inbound.expects_response())
}
