//! Version and requirement model for the pim package resolver
//!
//! A [`Version`] is a semantic version paired with an optional build timestamp.
//! A [`Requirement`] names a capability, how a package relates to it
//! (depends, provides, conflicts) and which versions match.

mod error;
mod parser;
pub mod requirement;
mod version;

pub use error::VersionError;
pub use parser::{is_valid_name, split_identifier};
pub use requirement::{Method, Op, Requirement};
pub use version::{Comparison, Version, TIMESTAMP_FORMAT, ZERO_TIMESTAMP};
