//! Grammar for package names and `name@version` identifiers

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::VersionError;

lazy_static! {
    static ref NAME_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._+-]*$").unwrap();

    // name, then an optional `@version` where version may carry a `:timestamp`
    static ref IDENTIFIER_RE: Regex =
        Regex::new(r"^(?P<name>[^@\s]+)(?:@(?P<version>[^@\s]+))?$").unwrap();
}

/// Check whether a package name is well formed
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Split `name` or `name@version` into its parts.
///
/// The version part is returned verbatim; it is up to the caller to parse it.
pub fn split_identifier(input: &str) -> Result<(&str, Option<&str>), VersionError> {
    let caps = IDENTIFIER_RE
        .captures(input.trim())
        .ok_or_else(|| VersionError::InvalidRequirement(input.to_string()))?;

    let name = caps
        .name("name")
        .map(|m| m.as_str())
        .ok_or_else(|| VersionError::InvalidRequirement(input.to_string()))?;
    if !is_valid_name(name) {
        return Err(VersionError::InvalidName(name.to_string()));
    }

    Ok((name, caps.name("version").map(|m| m.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("bacon"));
        assert!(is_valid_name("lib-ssl1.1"));
        assert!(is_valid_name("g++"));
        assert!(is_valid_name("python3_tools"));

        assert!(!is_valid_name(""));
        assert!(!is_valid_name("-leading-dash"));
        assert!(!is_valid_name("has space"));
        assert!(!is_valid_name("at@sign"));
    }

    #[test]
    fn test_split_identifier() {
        assert_eq!(split_identifier("nacho").unwrap(), ("nacho", None));
        assert_eq!(split_identifier("nacho@1.0.0").unwrap(), ("nacho", Some("1.0.0")));
        assert_eq!(
            split_identifier("nacho@1.0.0:20200101T000000Z").unwrap(),
            ("nacho", Some("1.0.0:20200101T000000Z"))
        );
        assert_eq!(split_identifier("  nacho  ").unwrap(), ("nacho", None));
    }

    #[test]
    fn test_split_identifier_fails() {
        assert!(split_identifier("").is_err());
        assert!(split_identifier("a@b@c").is_err());
        assert!(split_identifier("nacho@").is_err());
        assert_eq!(
            split_identifier("-bad@1.0.0"),
            Err(VersionError::InvalidName("-bad".to_string()))
        );
    }
}
