use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::field::FieldSpec;

/// Field-name to value mapping. Iteration order is the field declaration
/// order established at construction.
pub type Values = IndexMap<String, Value>;

/// Field-name to error-message mapping. Absence of an entry means the field
/// has no error. Keys are always a subset of the value keys.
pub type Errors = IndexMap<String, String>;

/// The mutable heart of a form session: current values and current errors.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: Values,
    errors: Errors,
}

impl FormState {
    /// Seeds values from the declared fields, in declaration order.
    pub fn seeded(fields: &[FieldSpec]) -> Self {
        let values = fields
            .iter()
            .map(|field| (field.name.clone(), field.initial.clone()))
            .collect();
        Self {
            values,
            errors: Errors::new(),
        }
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Replaces one value. Callers are responsible for only naming fields
    /// that exist; the key set never grows here.
    pub(crate) fn set_value(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
        }
    }

    /// Commits the result of a whole validation pass in one step.
    pub(crate) fn replace_errors(&mut self, errors: Errors) {
        self.errors = errors;
    }

    /// An owned copy of the current state. Later mutations of the engine
    /// never show through a snapshot taken earlier.
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            values: self.values.clone(),
            errors: self.errors.clone(),
        }
    }
}

/// Read-only copy of `{values, errors}` handed to observers and renderers.
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub values: Values,
    pub errors: Errors,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded_state() -> FormState {
        FormState::seeded(&[
            FieldSpec::text("age", "Age").with_initial("20"),
            FieldSpec::text("email", "Email").with_initial("x"),
        ])
    }

    #[test]
    fn seeding_preserves_declaration_order() {
        let state = seeded_state();
        let names: Vec<&str> = state.values().keys().map(String::as_str).collect();
        assert_eq!(names, ["age", "email"]);
    }

    #[test]
    fn set_value_never_grows_the_field_set() {
        let mut state = seeded_state();
        state.set_value("nickname", json!("ghost"));
        assert_eq!(state.values().len(), 2);
        assert!(state.value("nickname").is_none());
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let mut state = seeded_state();
        let before = state.snapshot();
        state.set_value("age", json!("21"));
        assert_eq!(before.values["age"], json!("20"));
        assert_eq!(state.value("age"), Some(&json!("21")));
    }

    #[test]
    fn replace_errors_commits_the_whole_map() {
        let mut state = seeded_state();
        let mut errors = Errors::new();
        errors.insert("age".to_string(), "too young".to_string());
        state.replace_errors(errors);
        assert_eq!(state.error("age"), Some("too young"));
        let next = Errors::new();
        state.replace_errors(next);
        assert_eq!(state.error_count(), 0);
    }
}
