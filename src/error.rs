//! Error types for the simulation core
//!
//! Nothing in here is fatal: callers get a `Result` and the engine keeps
//! its previous state when an operation is rejected.

use thiserror::Error;

/// Errors raised by the vector helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VectorError {
    /// A zero-magnitude vector (or zero divisor component) was used as a divisor.
    #[error("division by zero")]
    DivisionByZero,
}

/// Errors raised when a configuration (or config patch) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A field holds a value the simulation cannot run with.
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Human readable constraint that was violated.
        reason: &'static str,
    },
    /// The configuration could not be parsed from JSON.
    #[error("malformed configuration: {0}")]
    Malformed(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfig { field, reason }
    }

    /// Offending field name, if the error names one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig { field, .. } => Some(field),
            Self::Malformed(_) => None,
        }
    }
}
