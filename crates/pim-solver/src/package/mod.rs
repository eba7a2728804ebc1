// Package model for the resolver
//
// The engine works against the `Solvable` capability set; `Package` is the
// implementation backed by a parsed package manifest.

mod package;
mod solvable;

pub use package::Package;
pub use solvable::{compare_solvables, Solvable, SolvableRef, INSTALLED_PRIORITY};
