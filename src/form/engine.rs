use serde_json::Value;

use super::{
    error::UnknownFieldError,
    field::FieldSpec,
    registry::{ValidationOutcome, ValidationRegistry},
    state::{Errors, FormSnapshot, FormState, Values},
};

type Observer = Box<dyn FnMut(&Values)>;

/// What `submit` decided. A rejection leaves the failure details in the
/// engine's error map; the submit observer is only invoked on acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected { issues: usize },
}

/// Owns one form session's values and errors, and decides whether a
/// submission may proceed.
///
/// The field set is fixed at construction; every operation runs
/// synchronously inside the calling event handler. Rendering, event capture
/// and submit wiring live with the collaborator that drives this engine.
pub struct FormEngine {
    fields: Vec<FieldSpec>,
    state: FormState,
    validations: ValidationRegistry,
    on_submit: Option<Observer>,
    on_change: Option<Observer>,
}

impl FormEngine {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        let state = FormState::seeded(&fields);
        Self {
            fields,
            state,
            validations: ValidationRegistry::new(),
            on_submit: None,
            on_change: None,
        }
    }

    pub fn with_validations(mut self, validations: ValidationRegistry) -> Self {
        self.validations = validations;
        self
    }

    /// Observer invoked exactly once per accepted submission, with the
    /// filtered value set.
    pub fn on_submit(mut self, observer: impl FnMut(&Values) + 'static) -> Self {
        self.on_submit = Some(Box::new(observer));
        self
    }

    /// Observer invoked after every committed change, with the value set
    /// resulting from that commit. Optional; default is no-op.
    pub fn on_change(mut self, observer: impl FnMut(&Values) + 'static) -> Self {
        self.on_change = Some(Box::new(observer));
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn values(&self) -> &Values {
        self.state.values()
    }

    pub fn errors(&self) -> &Errors {
        self.state.errors()
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.state.error(name)
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.state.snapshot()
    }

    /// Replaces the value for `name`, leaving every other field untouched,
    /// then notifies the change observer with the post-merge value set.
    pub fn commit_change(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), UnknownFieldError> {
        self.ensure_known(name)?;
        self.state.set_value(name, value.into());
        if let Some(observer) = self.on_change.as_mut() {
            observer(self.state.values());
        }
        Ok(())
    }

    /// Merges a boolean value, bypassing validation entirely. Errors stay
    /// as they are and no observer fires. For toggle-style fields.
    pub fn set_field(&mut self, name: &str, value: bool) -> Result<(), UnknownFieldError> {
        self.ensure_known(name)?;
        self.state.set_value(name, Value::Bool(value));
        Ok(())
    }

    /// Runs every field's validator and commits a complete new error map in
    /// one step. Returns `true` iff no field failed.
    ///
    /// Outcomes are folded across the whole pass before anything is
    /// committed, so clearing one field's stale error can never drop an
    /// error recorded for another field in the same pass.
    pub fn validate(&mut self) -> bool {
        let mut next = Errors::new();
        for field in &self.fields {
            let Some(validator) = self.validations.get(&field.name) else {
                continue;
            };
            let Some(value) = self.state.value(&field.name) else {
                continue;
            };
            if let ValidationOutcome::Invalid(message) = validator(value) {
                next.insert(field.name.clone(), message);
            }
        }
        let passed = next.is_empty();
        self.state.replace_errors(next);
        passed
    }

    /// `validate` with the result discarded; the field-blur entry point.
    pub fn revalidate(&mut self) {
        let _ = self.validate();
    }

    /// Validates, and on success hands the submit observer a copy of the
    /// values with empty-string fields omitted entirely. Optional text
    /// fields thus arrive as "absent" rather than "present but empty".
    pub fn submit(&mut self) -> SubmitOutcome {
        if !self.validate() {
            return SubmitOutcome::Rejected {
                issues: self.state.error_count(),
            };
        }
        let mut filtered = Values::new();
        for (name, value) in self.state.values() {
            if let Value::String(text) = value {
                if text.is_empty() {
                    continue;
                }
            }
            filtered.insert(name.clone(), value.clone());
        }
        if let Some(observer) = self.on_submit.as_mut() {
            observer(&filtered);
        }
        SubmitOutcome::Accepted
    }

    fn ensure_known(&self, name: &str) -> Result<(), UnknownFieldError> {
        if self.state.value(name).is_some() {
            Ok(())
        } else {
            Err(UnknownFieldError::new(name))
        }
    }
}
