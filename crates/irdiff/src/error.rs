//! Error types.

use thiserror::Error;

/// Comparison and rewriting errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A requested function is missing from a module.
    #[error("function `{name}` not found in module `{module}`")]
    FunctionNotFound { name: String, module: String },
    /// A call passes fewer arguments than the callee body uses.
    #[error("argument {index} out of range while inlining `{callee}`")]
    ArgumentOutOfRange { index: u32, callee: String },
    /// A function body violates a structural invariant.
    #[error("malformed body in `{function}`: {reason}")]
    Malformed { function: String, reason: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
