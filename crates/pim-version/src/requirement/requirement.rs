use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Method, Op};
use crate::error::VersionError;
use crate::parser::{is_valid_name, split_identifier};
use crate::version::Version;

/// A named capability reference.
///
/// Built fluently, e.g. `Requirement::new("bacon").conflicts().lte(v)`, or
/// parsed from the short forms `name`, `name@semver` and
/// `name@semver:timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRequirement")]
pub struct Requirement {
    name: String,
    method: Method,
    op: Op,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<Version>,
}

#[derive(Deserialize)]
struct RawRequirement {
    name: String,
    #[serde(default)]
    method: Method,
    #[serde(default)]
    op: Op,
    #[serde(default)]
    version: Option<Version>,
}

impl TryFrom<RawRequirement> for Requirement {
    type Error = VersionError;

    fn try_from(raw: RawRequirement) -> Result<Self, Self::Error> {
        if !is_valid_name(&raw.name) {
            return Err(VersionError::InvalidName(raw.name));
        }
        Requirement::new(raw.name)
            .with_method(raw.method)
            .with_op(raw.op, raw.version)
    }
}

impl Requirement {
    /// A `depends` requirement on any version of `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: Method::Depends,
            op: Op::Any,
            version: None,
        }
    }

    /// Parse the short form used on command lines.
    ///
    /// - `name` depends on any version
    /// - `name@1.0.0` depends on that semantic version, any timestamp
    /// - `name@1.0.0:20200101T000000Z` depends on exactly that build
    pub fn parse_simple(input: &str) -> Result<Self, VersionError> {
        let (name, version) = split_identifier(input)?;
        let requirement = Requirement::new(name);

        match version {
            None => Ok(requirement),
            Some(raw) => {
                let version = Version::parse(raw)?;
                if raw.contains(':') {
                    Ok(requirement.exact(version))
                } else {
                    Ok(requirement.equal(version))
                }
            }
        }
    }

    pub fn depends(mut self) -> Self {
        self.method = Method::Depends;
        self
    }

    pub fn provides(mut self) -> Self {
        self.method = Method::Provides;
        self
    }

    pub fn conflicts(mut self) -> Self {
        self.method = Method::Conflicts;
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn any(mut self) -> Self {
        self.op = Op::Any;
        self.version = None;
        self
    }

    pub fn gte(self, version: Version) -> Self {
        self.versioned(Op::Gte, version)
    }

    pub fn lte(self, version: Version) -> Self {
        self.versioned(Op::Lte, version)
    }

    pub fn equal(self, version: Version) -> Self {
        self.versioned(Op::Eq, version)
    }

    pub fn exact(self, version: Version) -> Self {
        self.versioned(Op::Exq, version)
    }

    /// Set the operator from deserialized or dynamic input.
    ///
    /// Fails if the operator needs a version and none is given. A version
    /// passed with `Any` is dropped.
    pub fn with_op(self, op: Op, version: Option<Version>) -> Result<Self, VersionError> {
        match (op, version) {
            (Op::Any, _) => Ok(self.any()),
            (op, Some(version)) => Ok(self.versioned(op, version)),
            (op, None) => Err(VersionError::MissingVersion(op)),
        }
    }

    fn versioned(mut self, op: Op, version: Version) -> Self {
        self.op = op;
        self.version = Some(version);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Check a version against this requirement's operator
    pub fn matches_version(&self, version: &Version) -> bool {
        self.op.matches(version, self.version.as_ref())
    }

    /// Check a name and version against this requirement
    pub fn matches(&self, name: &str, version: &Version) -> bool {
        self.name == name && self.matches_version(version)
    }
}

impl FromStr for Requirement {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Requirement::parse_simple(s)
    }
}

/// Human readable constraint, for diagnostics only
impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.op, &self.version) {
            (Op::Any, _) | (_, None) => write!(f, "{} == *", self.name),
            (Op::Exq, Some(v)) => write!(f, "{} === {}", self.name, v),
            (op, Some(v)) => write!(f, "{} {} {}", self.name, op.symbol(), v.short()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_simple_any() {
        let req = Requirement::parse_simple("pkg").unwrap();
        assert_eq!(req.name(), "pkg");
        assert_eq!(req.method(), Method::Depends);
        assert_eq!(req.op(), Op::Any);
        assert!(req.version().is_none());
    }

    #[test]
    fn test_parse_simple_eq() {
        let req = Requirement::parse_simple("pkg@1.0.0").unwrap();
        assert_eq!(req.method(), Method::Depends);
        assert_eq!(req.op(), Op::Eq);
        assert_eq!(req.version().map(|v| v.short()), Some("1.0.0".to_string()));
    }

    #[test]
    fn test_parse_simple_exq() {
        let req = Requirement::parse_simple("pkg@1.0.0:20200101T000000Z").unwrap();
        assert_eq!(req.method(), Method::Depends);
        assert_eq!(req.op(), Op::Exq);
        assert_eq!(
            req.version().map(|v| v.to_string()),
            Some("1.0.0:20200101T000000Z".to_string())
        );
    }

    #[test]
    fn test_parse_simple_fails() {
        assert!(matches!(
            Requirement::parse_simple("pkg@1.x"),
            Err(VersionError::InvalidSemver { .. })
        ));
        assert!(matches!(
            Requirement::parse_simple("pkg@1.0.0:noon"),
            Err(VersionError::InvalidTimestamp(_))
        ));
        assert!(Requirement::parse_simple("").is_err());
        assert!("pkg@@1.0.0".parse::<Requirement>().is_err());
    }

    #[test]
    fn test_fluent_builder() {
        let req = Requirement::new("bacon").conflicts().gte(v("1.0.0"));
        assert_eq!(req.method(), Method::Conflicts);
        assert_eq!(req.op(), Op::Gte);

        let req = req.depends().any();
        assert_eq!(req.method(), Method::Depends);
        assert_eq!(req.op(), Op::Any);
        assert!(req.version().is_none());
    }

    #[test]
    fn test_with_op_requires_version() {
        assert_eq!(
            Requirement::new("x").with_op(Op::Gte, None),
            Err(VersionError::MissingVersion(Op::Gte))
        );
        assert!(Requirement::new("x").with_op(Op::Any, None).is_ok());

        let req = Requirement::new("x").with_op(Op::Any, Some(v("1.0.0"))).unwrap();
        assert!(req.version().is_none());
    }

    #[test]
    fn test_matches() {
        let req = Requirement::new("fruit").gte(v("1.1.0"));
        assert!(req.matches("fruit", &v("1.1.0")));
        assert!(req.matches("fruit", &v("2.0.0")));
        assert!(!req.matches("fruit", &v("1.0.0")));
        assert!(!req.matches("apple", &v("2.0.0")));

        let req = Requirement::new("fruit").exact(v("1.0.0:20200101T000000Z"));
        assert!(req.matches("fruit", &v("1.0.0:20200101T000000Z")));
        assert!(!req.matches("fruit", &v("1.0.0:20200102T000000Z")));
    }

    #[test]
    fn test_display() {
        assert_eq!(Requirement::new("a").to_string(), "a == *");
        assert_eq!(Requirement::new("a").gte(v("1.0.0:20200101T000000Z")).to_string(), "a >= 1.0.0");
        assert_eq!(Requirement::new("a").lte(v("1.0.0")).to_string(), "a <= 1.0.0");
        assert_eq!(Requirement::new("a").equal(v("1.0.0")).to_string(), "a == 1.0.0");
        assert_eq!(
            Requirement::new("a").exact(v("1.0.0:20200101T000000Z")).to_string(),
            "a === 1.0.0:20200101T000000Z"
        );
    }

    #[test]
    fn test_serde() {
        let req = Requirement::new("bacon").provides().equal(v("0.1.1"));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["method"], "provides");
        assert_eq!(json["op"], "EQ");
        assert_eq!(json["version"], "0.1.1:00010101T000000Z");

        let back: Requirement = serde_json::from_value(json).unwrap();
        assert_eq!(back, req);

        let bare: Requirement = serde_json::from_str(r#"{"name": "bacon"}"#).unwrap();
        assert_eq!(bare, Requirement::new("bacon"));

        assert!(serde_json::from_str::<Requirement>(r#"{"name": "bacon", "op": "GTE"}"#).is_err());
        assert!(serde_json::from_str::<Requirement>(r#"{"name": "-bacon"}"#).is_err());
    }
}
