use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::rule::FieldRule;
use crate::schema::FieldSchema;
use crate::version::ProtocolVersion;

/// Whether a method is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Sent with an id; the peer replies with a result or error.
    Call,
    /// Fire-and-forget or server push; never answered.
    Notification,
}

/// Parameter and result shape of one method as of one version layer.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub name: &'static str,
    /// The layer this shape was introduced in.
    pub since: ProtocolVersion,
    pub kind: MethodKind,
    /// `None` for methods that take no parameters.
    pub params: Option<FieldRule>,
    /// `None` when the result is not checked.
    pub result: Option<FieldRule>,
}

impl MethodDescriptor {
    pub fn call(name: &'static str, since: ProtocolVersion) -> Self {
        Self::with_kind(name, since, MethodKind::Call)
    }

    pub fn notification(name: &'static str, since: ProtocolVersion) -> Self {
        Self::with_kind(name, since, MethodKind::Notification)
    }

    fn with_kind(name: &'static str, since: ProtocolVersion, kind: MethodKind) -> Self {
        Self {
            name,
            since,
            kind,
            params: None,
            result: None,
        }
    }

    /// Params are an object matching `schema`.
    pub fn object_params(mut self, schema: FieldSchema) -> Self {
        self.params = Some(FieldRule::nested(schema));
        self
    }

    /// Params are a non-empty array of objects matching `item`.
    pub fn list_params(mut self, item: FieldSchema) -> Self {
        self.params = Some(FieldRule::non_empty_array(FieldRule::nested(item)));
        self
    }

    pub fn params(mut self, rule: FieldRule) -> Self {
        self.params = Some(rule);
        self
    }

    pub fn result(mut self, rule: FieldRule) -> Self {
        self.result = Some(rule);
        self
    }

    /// The object schema of the params, or of each params array element.
    pub fn param_schema(&self) -> Option<&FieldSchema> {
        self.params.as_ref().and_then(FieldRule::schema)
    }

    pub fn result_schema(&self) -> Option<&FieldSchema> {
        self.result.as_ref().and_then(FieldRule::schema)
    }
}

/// Method descriptors organized in version layers.
///
/// Each layer only holds the methods introduced or reshaped at that version.
/// Resolution walks layers newest-first from the requested version, so a
/// method keeps its most recent shape and inherits older ones untouched.
#[derive(Debug, Clone, Default)]
pub struct VersionedRegistry {
    layers: BTreeMap<ProtocolVersion, HashMap<&'static str, MethodDescriptor>>,
}

impl VersionedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from whole layers.
    pub fn from_layers(
        layers: impl IntoIterator<Item = (ProtocolVersion, Vec<MethodDescriptor>)>,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for (version, descriptors) in layers {
            registry.register_layer(version, descriptors)?;
        }
        Ok(registry)
    }

    /// Register every descriptor of one layer.
    pub fn register_layer(
        &mut self,
        version: ProtocolVersion,
        descriptors: impl IntoIterator<Item = MethodDescriptor>,
    ) -> Result<()> {
        self.layers.entry(version).or_default();
        let mut count = 0usize;
        for descriptor in descriptors {
            self.register(version, descriptor)?;
            count += 1;
        }
        debug!(%version, methods = count, "registered version layer");
        Ok(())
    }

    /// Register one descriptor at `version`.
    ///
    /// Fails on a second registration of the same name in the same layer, or
    /// when the descriptor declares a different `since` version.
    pub fn register(
        &mut self,
        version: ProtocolVersion,
        descriptor: MethodDescriptor,
    ) -> Result<()> {
        if descriptor.since != version {
            return Err(SchemaError::VersionMismatch {
                version,
                method: descriptor.name.to_string(),
                since: descriptor.since,
            });
        }

        let layer = self.layers.entry(version).or_default();
        if layer.contains_key(descriptor.name) {
            return Err(SchemaError::DuplicateMethod {
                version,
                method: descriptor.name.to_string(),
            });
        }
        layer.insert(descriptor.name, descriptor);
        Ok(())
    }

    /// Resolve the shape of `method` as seen by a peer at `version`.
    pub fn resolve(&self, version: ProtocolVersion, method: &str) -> Option<&MethodDescriptor> {
        self.layers
            .range(..=version)
            .rev()
            .find_map(|(_, layer)| layer.get(method))
    }

    /// Check whether `method` is available at `version`.
    pub fn contains(&self, version: ProtocolVersion, method: &str) -> bool {
        self.resolve(version, method).is_some()
    }

    /// Registered layer versions, ascending.
    pub fn versions(&self) -> Vec<ProtocolVersion> {
        self.layers.keys().copied().collect()
    }

    /// Descriptors introduced or reshaped at exactly `version`, by name.
    pub fn layer(&self, version: ProtocolVersion) -> Vec<&MethodDescriptor> {
        let mut descriptors: Vec<&MethodDescriptor> = self
            .layers
            .get(&version)
            .map(|layer| layer.values().collect())
            .unwrap_or_default();
        descriptors.sort_unstable_by_key(|d| d.name);
        descriptors
    }

    /// Every method visible at `version` with its winning descriptor, by name.
    pub fn effective(&self, version: ProtocolVersion) -> Vec<&MethodDescriptor> {
        let mut visible: BTreeMap<&'static str, &MethodDescriptor> = BTreeMap::new();
        for (_, layer) in self.layers.range(..=version) {
            for (name, descriptor) in layer {
                visible.insert(*name, descriptor);
            }
        }
        visible.into_values().collect()
    }

    /// Total number of descriptors across all layers.
    pub fn len(&self) -> usize {
        self.layers.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
