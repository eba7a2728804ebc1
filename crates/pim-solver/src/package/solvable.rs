use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use pim_version::{Method, Requirement, Version};

/// Priority reserved for members of the installed image
pub const INSTALLED_PRIORITY: i32 = -1;

/// Shared handle to a solvable held by repos and the pool
pub type SolvableRef = Arc<dyn Solvable>;

/// Anything the resolver can decide to install, remove, or leave alone.
///
/// `priority` and `location` describe where the solvable came from. They are
/// stamped by the pool when it indexes its repos, which is why setting them
/// only needs a shared reference.
pub trait Solvable: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &Version;

    fn requirements(&self) -> &[Requirement];

    fn arch(&self) -> &str;

    fn os(&self) -> &str;

    fn file_name(&self) -> String;

    fn channels(&self) -> &[String];

    /// Index of the originating repo in the pool
    fn location(&self) -> usize;

    /// Priority of the originating repo, or [`INSTALLED_PRIORITY`]
    fn priority(&self) -> i32;

    /// Record the originating repo
    fn set_origin(&self, priority: i32, location: usize);

    /// `name@version`, the identity used for solver variables
    fn id(&self) -> String {
        format!("{}@{}", self.name(), self.version())
    }

    fn is_installed(&self) -> bool {
        self.priority() == INSTALLED_PRIORITY
    }

    /// Same name
    fn same_package(&self, other: &dyn Solvable) -> bool {
        self.name() == other.name()
    }

    /// Same name and exact version
    fn same_version(&self, other: &dyn Solvable) -> bool {
        self.same_package(other) && self.version().exq(other.version())
    }

    /// Check whether this solvable fulfils `requirement`, either under its
    /// own name or under a name it provides.
    ///
    /// A provided name without a version is checked against the solvable's
    /// own version.
    fn satisfies(&self, requirement: &Requirement) -> bool {
        if requirement.matches(self.name(), self.version()) {
            return true;
        }

        self.requirements()
            .iter()
            .filter(|r| r.method() == Method::Provides && r.name() == requirement.name())
            .any(|provided| {
                let version = provided.version().unwrap_or_else(|| self.version());
                requirement.matches_version(version)
            })
    }
}

/// Global ordering of solvables.
///
/// Name ascending, then priority ascending (so installed members come first),
/// then version descending (newest first).
pub fn compare_solvables(a: &dyn Solvable, b: &dyn Solvable) -> Ordering {
    a.name()
        .cmp(b.name())
        .then_with(|| a.priority().cmp(&b.priority()))
        .then_with(|| b.version().cmp(a.version()))
}
