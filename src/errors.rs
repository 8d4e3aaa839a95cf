use thiserror::Error; // Import the `Error` derive macro from the `thiserror` crate

// Everything that can stop a formula from producing a value
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    // Syntax error raised by the expression engine while parsing
    #[error("parse error: {0}")]
    Parse(String),

    // Engine-level failure while evaluating an already parsed expression
    #[error("runtime error: {0}")]
    Runtime(String),

    // Title and name lists were zipped with different lengths
    #[error("invalid argument: {titles} field titles but {names} field names")]
    ArityMismatch { titles: usize, names: usize },

    // A delimiter would split labels written in the label script
    #[error("invalid argument: delimiter {0:?} belongs to the label script")]
    DelimiterConflict(char),

    // The engine could not produce a value for the normalized expression
    #[error("invalid argument: [{expression}] could not be evaluated: {reason}")]
    EvaluationFailed { expression: String, reason: String },

    // Division or remainder with a zero divisor
    #[error("invalid argument: [{expression}] divides by zero")]
    DivisionByZero { expression: String },
}

impl EvalError {
    /// True for failures caused by the caller's input rather than the engine.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, EvalError::Parse(_) | EvalError::Runtime(_))
    }
}

// Type alias for results that use `EvalError` as the error type
pub type Result<T> = std::result::Result<T, EvalError>;
