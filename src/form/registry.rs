use indexmap::IndexMap;
use serde_json::Value;

/// Result of running one validator against one field value. Failure is an
/// ordinary value here, never a panic or a propagated error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(String),
}

impl ValidationOutcome {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// A caller-supplied validation rule for a single field. Expected to be pure
/// and fast; asynchronous checks must be resolved before validation runs.
pub type Validator = Box<dyn Fn(&Value) -> ValidationOutcome>;

/// Field-name to validator mapping. A field absent from the registry is
/// always considered valid.
#[derive(Default)]
pub struct ValidationRegistry {
    rules: IndexMap<String, Validator>,
}

impl ValidationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the rule for `name`.
    pub fn rule(
        mut self,
        name: impl Into<String>,
        validator: impl Fn(&Value) -> ValidationOutcome + 'static,
    ) -> Self {
        self.rules.insert(name.into(), Box::new(validator));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Validator> {
        self.rules.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
