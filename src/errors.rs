use thiserror::Error;

use crate::selector::ValidationOutcome;

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("No elements found for selector: {selector}")]
    NoElementsFound { selector: String },

    #[error("Selector matches {matches} elements: {selector}")]
    AmbiguousMatch { selector: String, matches: usize },

    #[error("Selector resolves to a different element: {selector}")]
    TargetMismatch { selector: String },

    #[error(
        "No good selector found after {attempts} attempts (chain: [{chain}], last selector: {last_selector:?}, last outcome: {last_outcome:?})"
    )]
    Exhausted {
        chain: String,
        last_selector: Option<String>,
        last_outcome: Option<ValidationOutcome>,
        attempts: usize,
    },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SelectorError>;

impl SelectorError {
    /// True for the failures the resolution loop recovers from by retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SelectorError::NoElementsFound { .. }
                | SelectorError::AmbiguousMatch { .. }
                | SelectorError::TargetMismatch { .. }
        )
    }
}
