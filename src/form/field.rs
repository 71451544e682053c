use serde_json::Value;

/// What kind of input widget a field binds to. The engine itself only cares
/// about values; kinds exist for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Bool,
}

/// One named, independently validated slot in the form's value set.
///
/// The field set is declared up front, in order, and is fixed for the
/// lifetime of the engine built from it.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub initial: Value,
}

impl FieldSpec {
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Text,
            initial: Value::String(String::new()),
        }
    }

    pub fn secret(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Secret,
            initial: Value::String(String::new()),
        }
    }

    pub fn bool(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Bool,
            initial: Value::Bool(false),
        }
    }

    pub fn with_initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = value.into();
        self
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}
