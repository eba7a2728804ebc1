use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VersionError;

/// How a package relates to the capability a requirement names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// The package needs the capability to be installed
    #[default]
    Depends,
    /// The package offers the capability under an alternate name
    Provides,
    /// The package cannot be installed alongside the capability
    Conflicts,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Depends => "depends",
            Method::Provides => "provides",
            Method::Conflicts => "conflicts",
        }
    }
}

impl FromStr for Method {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "depends" => Ok(Method::Depends),
            "provides" => Ok(Method::Provides),
            "conflicts" => Ok(Method::Conflicts),
            _ => Err(VersionError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
