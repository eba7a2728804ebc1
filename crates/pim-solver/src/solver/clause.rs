use std::collections::HashSet;
use std::fmt;

use super::sat::Literal;

/// Why a clause was generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    /// A job forcing a package in or out
    Job,
    /// If a package is installed, one of its providers must be
    Requires,
    /// Two providers of the same dependency cannot both be installed
    SameName,
    /// A package conflicts with another
    Conflict,
}

/// A disjunction of literals.
///
/// # Examples
///
/// - `[a]` - a must be installed
/// - `[-a]` - a must not be installed
/// - `[-a, b, c]` - if a is installed, then b or c must be installed
/// - `[-a, -b]` - a and b cannot both be installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    literals: Vec<Literal>,
    kind: ClauseKind,
    /// What produced the clause, for diagnostics
    source: Option<String>,
}

impl Clause {
    pub fn new(literals: Vec<Literal>, kind: ClauseKind) -> Self {
        Self {
            literals,
            kind,
            source: None,
        }
    }

    /// Force a single literal
    pub fn job(literal: Literal) -> Self {
        Self::new(vec![literal], ClauseKind::Job)
    }

    /// `source` implies one of `targets`; repeated targets are dropped
    pub fn requires(source: &str, targets: &[String]) -> Self {
        let mut literals = vec![Literal::negative(source)];
        for target in targets {
            let literal = Literal::positive(target.as_str());
            if !literals.contains(&literal) {
                literals.push(literal);
            }
        }
        Self::new(literals, ClauseKind::Requires)
    }

    /// At most one of two providers
    pub fn same_name(a: &str, b: &str) -> Self {
        Self::new(vec![Literal::negative(a), Literal::negative(b)], ClauseKind::SameName)
    }

    /// `a` and `b` cannot both be installed
    pub fn conflict(a: &str, b: &str) -> Self {
        Self::new(vec![Literal::negative(a), Literal::negative(b)], ClauseKind::Conflict)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn kind(&self) -> ClauseKind {
        self.kind
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Literals in sorted order, for order-independent comparison
    fn key(&self) -> Vec<Literal> {
        let mut sorted = self.literals.clone();
        sorted.sort();
        sorted
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let literals: Vec<String> = self.literals.iter().map(Literal::to_string).collect();
        write!(f, "({})", literals.join(" | "))?;
        if let Some(source) = &self.source {
            write!(f, " [{}]", source)?;
        }
        Ok(())
    }
}

/// Clauses in insertion order, without duplicates
#[derive(Debug, Clone, Default)]
pub struct ClauseSet {
    clauses: Vec<Clause>,
    seen: HashSet<Vec<Literal>>,
}

impl ClauseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause unless one with the same literals is present.
    ///
    /// Returns whether the clause was added.
    pub fn add(&mut self, clause: Clause) -> bool {
        if !self.seen.insert(clause.key()) {
            return false;
        }
        self.clauses.push(clause);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Count clauses of one kind
    pub fn count(&self, kind: ClauseKind) -> usize {
        self.clauses.iter().filter(|c| c.kind() == kind).count()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
