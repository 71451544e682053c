mod engine;
mod error;
mod field;
mod registry;
mod state;
pub mod validators;

pub use engine::{FormEngine, SubmitOutcome};
pub use error::UnknownFieldError;
pub use field::{FieldKind, FieldSpec};
pub use registry::{ValidationOutcome, ValidationRegistry, Validator};
pub use state::{Errors, FormSnapshot, FormState, Values};
