// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed invocation parameter (amount, port or queue name)
    #[error("Parameter error: {0}")]
    Parameter(String),

    /// Queue attribute missing or not a number
    #[error("Attribute error: {0}")]
    Attribute(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
