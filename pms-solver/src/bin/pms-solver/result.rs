use std::fmt::Display;

use pms_solver::core::parsers::dimacs::MalformedInputError;
use thiserror::Error;

pub(crate) type PmsResult<T> = Result<T, PmsError>;

#[derive(Error, Debug)]
pub(crate) enum PmsError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The file {0} is not supported.")]
    InvalidInstanceFile(String),
    #[error("The instance was malformed, more details: {0}")]
    MalformedInput(#[from] MalformedInputError),
}

impl PmsError {
    pub(crate) fn invalid_instance(path: impl Display) -> Self {
        Self::InvalidInstanceFile(format!("{path}"))
    }
}
