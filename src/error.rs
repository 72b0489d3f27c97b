use thiserror::Error;

/// Raised while building a [`ControlSystem`](crate::ControlSystem). A system
/// that fails validation is never returned.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("invalid universe [{min}, {max}] with step {step}")]
    InvalidUniverse { min: f64, max: f64, step: f64 },
    #[error("triangular membership requires a <= b <= c, got ({a}, {b}, {c})")]
    InvalidMembership { a: f64, b: f64, c: f64 },
    #[error("label '{label}' declared twice on variable '{variable}'")]
    DuplicateLabel { variable: String, label: String },
    #[error("variable '{name}' declared twice")]
    DuplicateVariable { name: String },
    #[error("variable '{name}' declared as both input and output")]
    InputOutputConflict { name: String },
    #[error("variable '{name}' has no labels")]
    EmptyVariable { name: String },
    #[error("rule references undeclared variable '{name}'")]
    UnknownVariable { name: String },
    #[error("variable '{variable}' has no label '{label}'")]
    UnknownLabel { variable: String, label: String },
    #[error("variable '{name}' used where an {expected} variable is required")]
    WrongRole { name: String, expected: &'static str },
}

/// Raised by a single evaluation. The system itself is left untouched.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("no value supplied for input variable '{variable}'")]
    MissingInput { variable: String },
    #[error("input '{variable}' is not a finite number: {value}")]
    NonFiniteInput { variable: String, value: f64 },
    #[error("variable '{variable}' has no label '{label}'")]
    UnknownTerm { variable: String, label: String },
    #[error("no variable named '{name}' in this system")]
    UnknownVariable { name: String },
}
