use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::package::SolvableRef;

/// What to do with a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Install,
    Remove,
    /// Already installed and kept as is
    Noop,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Install => "install",
            OperationKind::Remove => "remove",
            OperationKind::Noop => "noop",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single decision in a solution
#[derive(Debug, Clone)]
pub struct Operation {
    pub kind: OperationKind,
    pub package: SolvableRef,
}

impl Operation {
    pub fn install(package: SolvableRef) -> Self {
        Self { kind: OperationKind::Install, package }
    }

    pub fn remove(package: SolvableRef) -> Self {
        Self { kind: OperationKind::Remove, package }
    }

    pub fn noop(package: SolvableRef) -> Self {
        Self { kind: OperationKind::Noop, package }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.package.id())
    }
}

/// One fully decided plan, built from one satisfying assignment.
///
/// Operations keep the order they were added in; `names` lists every package
/// that is installed or kept.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    operations: Vec<Operation>,
    names: Vec<String>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation
    pub fn push(&mut self, operation: Operation) {
        if operation.kind != OperationKind::Remove {
            self.names.push(operation.package.name().to_string());
        }
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Names of packages present once the solution is applied
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The package kept or installed under `name`, if any
    pub fn get(&self, name: &str) -> Option<&SolvableRef> {
        self.operations
            .iter()
            .filter(|op| op.kind != OperationKind::Remove)
            .map(|op| &op.package)
            .find(|p| p.name() == name)
    }

    pub fn installs(&self) -> impl Iterator<Item = &SolvableRef> {
        self.of_kind(OperationKind::Install)
    }

    pub fn removals(&self) -> impl Iterator<Item = &SolvableRef> {
        self.of_kind(OperationKind::Remove)
    }

    fn of_kind(&self, kind: OperationKind) -> impl Iterator<Item = &SolvableRef> {
        self.operations
            .iter()
            .filter(move |op| op.kind == kind)
            .map(|op| &op.package)
    }

    /// Number of install and remove operations
    pub fn changes(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| op.kind != OperationKind::Noop)
            .count()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.operations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

/// Ranking of solutions, best first.
///
/// Solutions are compared name by name over the sorted union of what they
/// keep; the first name kept at different versions decides in favour of the
/// newer one, and a name a solution does not keep counts as older than any
/// version. Remaining ties go to fewer changes, then to the rendered
/// operations, so the order is total.
pub fn compare_solutions(a: &Solution, b: &Solution) -> Ordering {
    let names: BTreeSet<&str> = a
        .names()
        .iter()
        .chain(b.names())
        .map(String::as_str)
        .collect();

    for name in names {
        let ours = a.get(name).map(|p| p.version());
        let theirs = b.get(name).map(|p| p.version());
        match theirs.cmp(&ours) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }

    a.changes()
        .cmp(&b.changes())
        .then_with(|| a.to_string().cmp(&b.to_string()))
}
