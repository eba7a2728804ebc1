use thiserror::Error;

use pim_version::VersionError;

#[derive(Error, Debug)]
pub enum PimError {
    // Version/requirement parse errors
    #[error(transparent)]
    Version(#[from] VersionError),

    // Pool configuration errors
    #[error("Pool requires an installed image repository")]
    NoImage,

    #[error("Pool requires at least one repository besides the installed image")]
    NoRepos,

    // Solver errors
    #[error("No solution for requested jobs: {jobs}")]
    Unsatisfiable { jobs: String },

    #[error("SAT engine failed: {0}")]
    Sat(String),

    #[error("Solution refers to unknown solvable: {0}")]
    UnknownSolvable(String),

    // Config errors
    #[error("Unknown policy: {0}")]
    UnknownPolicy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // JSON/IO errors
    #[error("Failed to parse repository manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PimError>;
