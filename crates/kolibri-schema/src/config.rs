/// Controls parameter validation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// When true, object fields not declared in a schema are violations, and
    /// params sent to a method that declares none are rejected.
    pub strict_mode: bool,
    /// Maximum number of violations reported for one value.
    pub max_violations: usize,
    /// When true, every present field of a partial-update object must
    /// validate. When false, one valid optional field accepts the object.
    pub conjunctive_partial_updates: bool,
    /// When true, outgoing results are checked against result schemas.
    pub validate_results: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            max_violations: 64,
            conjunctive_partial_updates: false,
            validate_results: true,
        }
    }
}
