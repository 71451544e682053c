#![deny(rust_2018_idioms)]

mod form;
#[cfg(feature = "tui")]
mod runtime;
#[cfg(feature = "tui")]
mod ui;

pub use form::validators;
pub use form::{
    Errors, FieldKind, FieldSpec, FormEngine, FormSnapshot, SubmitOutcome, UnknownFieldError,
    ValidationOutcome, ValidationRegistry, Validator, Values,
};
#[cfg(feature = "tui")]
pub use runtime::{FormUi, UiOptions};

pub mod prelude {
    pub use super::{
        FieldKind, FieldSpec, FormEngine, SubmitOutcome, ValidationOutcome, ValidationRegistry,
        Values, validators,
    };
    #[cfg(feature = "tui")]
    pub use super::{FormUi, UiOptions};
}
