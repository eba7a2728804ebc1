//! Package versions: a semantic version plus an optional build timestamp

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VersionError;

/// Layout of the timestamp component, e.g. `20200101T000000Z`
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Rendering of an absent timestamp
pub const ZERO_TIMESTAMP: &str = "00010101T000000Z";

/// Result of comparing two versions.
///
/// `Equal` means the semantic versions match but the timestamps could not be
/// told apart as identical; `Exact` means both components match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Less,
    Equal,
    Greater,
    Exact,
}

impl Comparison {
    /// Integer form: -1, 0, 1, or 2 for an exact match
    pub fn as_int(&self) -> i8 {
        match self {
            Comparison::Less => -1,
            Comparison::Equal => 0,
            Comparison::Greater => 1,
            Comparison::Exact => 2,
        }
    }
}

/// A comparable package version.
///
/// The canonical string form is `<semver>:<YYYYMMDDThhmmssZ>`; the timestamp
/// segment may be omitted when parsing.
#[derive(Debug, Clone)]
pub struct Version {
    semver: semver::Version,
    timestamp: Option<DateTime<Utc>>,
}

impl Version {
    /// Create a version from its parts
    pub fn new(semver: semver::Version, timestamp: Option<DateTime<Utc>>) -> Self {
        Self { semver, timestamp }
    }

    /// Parse `<semver>` or `<semver>:<timestamp>`
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let input = input.trim();
        let (semver_part, timestamp_part) = match input.split_once(':') {
            Some((s, t)) => (s, Some(t)),
            None => (input, None),
        };

        let semver = semver::Version::parse(semver_part).map_err(|e| VersionError::InvalidSemver {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        let timestamp = match timestamp_part {
            None => None,
            Some(t) if t == ZERO_TIMESTAMP => None,
            Some(t) => {
                let naive = NaiveDateTime::parse_from_str(t, TIMESTAMP_FORMAT)
                    .map_err(|_| VersionError::InvalidTimestamp(t.to_string()))?;
                Some(Utc.from_utc_datetime(&naive))
            }
        };

        Ok(Self { semver, timestamp })
    }

    pub fn semver(&self) -> &semver::Version {
        &self.semver
    }

    pub fn timestamp(&self) -> Option<&DateTime<Utc>> {
        self.timestamp.as_ref()
    }

    /// Semantic version only, without the timestamp
    pub fn short(&self) -> String {
        self.semver.to_string()
    }

    /// Compare against another version.
    ///
    /// Semantic versions are compared by precedence (build metadata ignored).
    /// When they match, identical timestamps yield [`Comparison::Exact`] and
    /// differing timestamps yield [`Comparison::Equal`].
    pub fn compare(&self, other: &Version) -> Comparison {
        match precedence(&self.semver, &other.semver) {
            Ordering::Less => Comparison::Less,
            Ordering::Greater => Comparison::Greater,
            Ordering::Equal if self.timestamp == other.timestamp => Comparison::Exact,
            Ordering::Equal => Comparison::Equal,
        }
    }

    /// Semantic versions match, timestamps may differ
    pub fn eq_approx(&self, other: &Version) -> bool {
        matches!(self.compare(other), Comparison::Equal | Comparison::Exact)
    }

    /// Semantic versions and timestamps both match
    pub fn exq(&self, other: &Version) -> bool {
        self.compare(other) == Comparison::Exact
    }

    pub fn neq(&self, other: &Version) -> bool {
        !self.eq_approx(other)
    }

    pub fn gt(&self, other: &Version) -> bool {
        self.compare(other) == Comparison::Greater
    }

    pub fn gte(&self, other: &Version) -> bool {
        self.gt(other) || self.eq_approx(other)
    }

    pub fn lt(&self, other: &Version) -> bool {
        self.compare(other) == Comparison::Less
    }

    pub fn lte(&self, other: &Version) -> bool {
        self.lt(other) || self.eq_approx(other)
    }
}

fn precedence(a: &semver::Version, b: &semver::Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

/// Total order used for sorting: precedence first, then timestamp, with an
/// absent timestamp sorting before any present one.
impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        precedence(&self.semver, &other.semver).then_with(|| self.timestamp.cmp(&other.timestamp))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.semver.major.hash(state);
        self.semver.minor.hash(state);
        self.semver.patch.hash(state);
        self.semver.pre.as_str().hash(state);
        self.timestamp.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.timestamp {
            Some(ts) => write!(f, "{}:{}", self.semver, ts.format(TIMESTAMP_FORMAT)),
            None => write!(f, "{}:{}", self.semver, ZERO_TIMESTAMP),
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Version::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse() {
        let version = v("1.2.3:20200101T120000Z");
        assert_eq!(version.short(), "1.2.3");
        assert_eq!(
            version.timestamp().map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
            Some("20200101T120000Z".to_string())
        );

        let bare = v("1.2.3");
        assert!(bare.timestamp().is_none());

        let prerelease = v("2.0.0-beta.1+build.7");
        assert_eq!(prerelease.short(), "2.0.0-beta.1+build.7");
    }

    #[test]
    fn test_parse_zero_timestamp() {
        let version = v("1.0.0:00010101T000000Z");
        assert!(version.timestamp().is_none());
        assert!(version.exq(&v("1.0.0")));
    }

    #[test]
    fn test_parse_fails() {
        assert!(matches!(Version::parse(""), Err(VersionError::InvalidSemver { .. })));
        assert!(matches!(Version::parse("1.0"), Err(VersionError::InvalidSemver { .. })));
        assert!(matches!(Version::parse("one.two.three"), Err(VersionError::InvalidSemver { .. })));
        assert!(matches!(
            Version::parse("1.0.0:yesterday"),
            Err(VersionError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            Version::parse("1.0.0:20201301T000000Z"),
            Err(VersionError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_display_always_has_timestamp() {
        assert_eq!(v("1.0.0").to_string(), "1.0.0:00010101T000000Z");
        assert_eq!(v("1.0.0:20210304T050607Z").to_string(), "1.0.0:20210304T050607Z");
        assert_eq!(v("1.0.0:20210304T050607Z").short(), "1.0.0");
    }

    #[test]
    fn test_compare() {
        assert_eq!(v("1.0.0").compare(&v("2.0.0")), Comparison::Less);
        assert_eq!(v("2.0.0").compare(&v("1.0.0")), Comparison::Greater);
        assert_eq!(v("1.0.0").compare(&v("1.0.0")), Comparison::Exact);
        assert_eq!(
            v("1.0.0:20200101T000000Z").compare(&v("1.0.0:20210101T000000Z")),
            Comparison::Equal
        );
        assert_eq!(v("1.0.0-alpha").compare(&v("1.0.0")), Comparison::Less);
        assert_eq!(v("1.0.0+build.1").compare(&v("1.0.0+build.2")), Comparison::Exact);

        assert_eq!(Comparison::Less.as_int(), -1);
        assert_eq!(Comparison::Equal.as_int(), 0);
        assert_eq!(Comparison::Greater.as_int(), 1);
        assert_eq!(Comparison::Exact.as_int(), 2);
    }

    #[test]
    fn test_exact_implies_equal() {
        let a = v("1.0.0:20200101T000000Z");
        let b = v("1.0.0:20200101T000000Z");
        let c = v("1.0.0:20200202T000000Z");

        assert!(a.exq(&b));
        assert!(a.eq_approx(&b));

        assert!(a.eq_approx(&c));
        assert!(!a.exq(&c));
        assert!(!a.neq(&c));
    }

    #[test]
    fn test_predicates() {
        let low = v("1.0.0");
        let high = v("1.1.0");

        assert!(high.gt(&low));
        assert!(high.gte(&low));
        assert!(high.gte(&high));
        assert!(low.lt(&high));
        assert!(low.lte(&high));
        assert!(low.lte(&low));
        assert!(low.neq(&high));
        assert!(!low.gt(&low));
    }

    #[test]
    fn test_trichotomy() {
        let versions = [
            v("0.1.0"),
            v("1.0.0-rc.1"),
            v("1.0.0"),
            v("1.0.0:20200101T000000Z"),
            v("1.0.0:20220101T000000Z"),
            v("1.2.0"),
        ];

        for a in &versions {
            for b in &versions {
                let holds = [a.lt(b), a.eq_approx(b), a.gt(b)];
                assert_eq!(holds.iter().filter(|h| **h).count(), 1, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_sort_order_uses_timestamp() {
        let mut versions = vec![
            v("1.0.0:20220101T000000Z"),
            v("2.0.0"),
            v("1.0.0"),
            v("1.0.0:20200101T000000Z"),
        ];
        versions.sort();

        let rendered: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "1.0.0:00010101T000000Z",
                "1.0.0:20200101T000000Z",
                "1.0.0:20220101T000000Z",
                "2.0.0:00010101T000000Z",
            ]
        );
    }

    #[test]
    fn test_serde_as_string() {
        let version = v("1.2.3:20200101T000000Z");
        let json = serde_json::to_string(&version).unwrap();
        assert_eq!(json, "\"1.2.3:20200101T000000Z\"");

        let back: Version = serde_json::from_str(&json).unwrap();
        assert!(back.exq(&version));

        assert!(serde_json::from_str::<Version>("\"nope\"").is_err());
    }
}
