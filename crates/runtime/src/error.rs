use crate::model::ModelError;
use thiserror::Error;

/// Errors from an agent run.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("agent stopped after {0} model turns without a final answer")]
    RecursionLimit(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
