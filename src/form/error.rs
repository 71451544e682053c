#[derive(Debug, Clone)]
pub struct UnknownFieldError {
    pub name: String,
}

impl UnknownFieldError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for UnknownFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown field: {}", self.name)
    }
}

impl std::error::Error for UnknownFieldError {}
