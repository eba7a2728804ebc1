use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VersionError;
use crate::version::Version;

/// Version comparison operator of a requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Op {
    /// Any version
    #[default]
    Any,
    /// Greater than or equal (>=)
    Gte,
    /// Less than or equal (<=)
    Lte,
    /// Same semantic version, any timestamp (==)
    Eq,
    /// Same semantic version and timestamp (===)
    Exq,
}

impl Op {
    /// All operators
    pub const ALL: [Op; 5] = [Op::Any, Op::Gte, Op::Lte, Op::Eq, Op::Exq];

    /// Serialized name: `ANY`, `GTE`, `LTE`, `EQ` or `EXQ`
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Any => "ANY",
            Op::Gte => "GTE",
            Op::Lte => "LTE",
            Op::Eq => "EQ",
            Op::Exq => "EXQ",
        }
    }

    /// Serialized integer form
    pub fn as_int(&self) -> i8 {
        match self {
            Op::Any => 3,
            Op::Gte => 1,
            Op::Lte => -1,
            Op::Eq => 0,
            Op::Exq => 2,
        }
    }

    pub fn from_int(value: i8) -> Result<Self, VersionError> {
        match value {
            3 => Ok(Op::Any),
            1 => Ok(Op::Gte),
            -1 => Ok(Op::Lte),
            0 => Ok(Op::Eq),
            2 => Ok(Op::Exq),
            _ => Err(VersionError::UnknownOperator(value.to_string())),
        }
    }

    /// Symbol used when rendering a requirement for humans
    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Any | Op::Eq => "==",
            Op::Gte => ">=",
            Op::Lte => "<=",
            Op::Exq => "===",
        }
    }

    /// Whether this operator needs a version to compare against
    pub fn needs_version(&self) -> bool {
        !matches!(self, Op::Any)
    }

    /// Check `candidate` against `wanted` under this operator.
    ///
    /// `Any` always matches; every other operator fails without a wanted
    /// version.
    pub fn matches(&self, candidate: &Version, wanted: Option<&Version>) -> bool {
        match (self, wanted) {
            (Op::Any, _) => true,
            (_, None) => false,
            (Op::Gte, Some(w)) => candidate.gte(w),
            (Op::Lte, Some(w)) => candidate.lte(w),
            (Op::Eq, Some(w)) => candidate.eq_approx(w),
            (Op::Exq, Some(w)) => candidate.exq(w),
        }
    }
}

impl FromStr for Op {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ANY" => Ok(Op::Any),
            "GTE" => Ok(Op::Gte),
            "LTE" => Ok(Op::Lte),
            "EQ" => Ok(Op::Eq),
            "EXQ" => Ok(Op::Exq),
            _ => Err(VersionError::UnknownOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
