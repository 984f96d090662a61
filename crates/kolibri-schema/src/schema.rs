use crate::rule::FieldRule;

/// Whether a field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Present and not `null`.
    Required,
    /// May be absent or `null`; checked only when it carries a value.
    Optional,
}

/// A rule over the object as a whole rather than one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetRule {
    /// Partial update: at least one optional field must carry a value.
    AtLeastOneOptional,
}

/// One declared field of an object schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: FieldRule,
    pub presence: Presence,
}

impl FieldSpec {
    /// Returns true for required fields.
    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

/// Ordered set of named field rules plus an optional object-level rule.
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
    set_rule: Option<SetRule>,
}

impl FieldSchema {
    /// An empty schema that accepts any object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field that must be present and non-null.
    pub fn required(mut self, name: &'static str, rule: FieldRule) -> Self {
        self.push(name, rule, Presence::Required);
        self
    }

    /// Declare a field that may be absent.
    pub fn optional(mut self, name: &'static str, rule: FieldRule) -> Self {
        self.push(name, rule, Presence::Optional);
        self
    }

    /// Require at least one optional field to carry a value.
    pub fn at_least_one(mut self) -> Self {
        self.set_rule = Some(SetRule::AtLeastOneOptional);
        self
    }

    /// Redeclaring a name replaces the earlier declaration in place.
    fn push(&mut self, name: &'static str, rule: FieldRule, presence: Presence) {
        let spec = FieldSpec {
            name,
            rule,
            presence,
        };
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The object-level rule, if any.
    pub fn set_rule(&self) -> Option<SetRule> {
        self.set_rule
    }

    /// Names of the optional fields, in declaration order.
    pub fn optional_names(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| !f.is_required())
            .map(|f| f.name)
            .collect()
    }

    /// Returns true if no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
