use thiserror::Error;

use crate::requirement::Op;

/// Error type for version and requirement parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid semantic version \"{input}\": {reason}")]
    InvalidSemver { input: String, reason: String },
    #[error("Invalid timestamp \"{0}\", expected YYYYMMDDThhmmssZ")]
    InvalidTimestamp(String),
    #[error("Invalid package name \"{0}\"")]
    InvalidName(String),
    #[error("Invalid requirement \"{0}\"")]
    InvalidRequirement(String),
    #[error("Operator {0} requires a version")]
    MissingVersion(Op),
    #[error("Unknown operator \"{0}\"")]
    UnknownOperator(String),
    #[error("Unknown relationship method \"{0}\"")]
    UnknownMethod(String),
}
