use thiserror::Error;

use crate::ids::RosterId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid run key: '{0}'")]
    InvalidRunKey(String),
    #[error("free-text name '{0}' is already matched")]
    DuplicateName(String),
    #[error("roster id {0} is already claimed by another match")]
    DuplicateRosterId(RosterId),
    #[error("confidence table does not cover the same names as the mapping")]
    MismatchedConfidence,
}

pub type Result<T> = std::result::Result<T, ModelError>;
