use std::fmt;

use super::solution::Solution;
use crate::config::PolicyKind;
use crate::error::Result;
use crate::package::{compare_solvables, SolvableRef};

/// Strategy for the choices the solver cannot make on its own.
///
/// Returning `None` from a selection means no decision is possible; it is not
/// an error.
pub trait Policy: fmt::Debug {
    /// Name used to select the policy from configuration
    fn name(&self) -> &'static str;

    /// Reduce the providers offered as alternatives in a dependency clause.
    ///
    /// Candidates arrive in pool index order.
    fn prune_provides(&self, candidates: Vec<SolvableRef>) -> Vec<SolvableRef>;

    /// Pick the single candidate for a bare requirement
    fn select_request(&self, candidates: Vec<SolvableRef>) -> Option<SolvableRef>;

    /// Pick one of the ranked solutions, best first
    fn select_solution(&self, solutions: Vec<Solution>) -> Option<Solution>;
}

/// Prefer the highest priority tier and the newest versions.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdatedPolicy;

impl Policy for UpdatedPolicy {
    fn name(&self) -> &'static str {
        "updated"
    }

    /// Keep only the leading run of candidates sharing the first one's priority
    fn prune_provides(&self, candidates: Vec<SolvableRef>) -> Vec<SolvableRef> {
        let Some(tier) = candidates.first().map(|c| c.priority()) else {
            return candidates;
        };

        candidates
            .into_iter()
            .take_while(|c| c.priority() == tier)
            .collect()
    }

    fn select_request(&self, mut candidates: Vec<SolvableRef>) -> Option<SolvableRef> {
        candidates.sort_by(|a, b| compare_solvables(a.as_ref(), b.as_ref()));
        candidates.into_iter().next()
    }

    fn select_solution(&self, solutions: Vec<Solution>) -> Option<Solution> {
        solutions.into_iter().next()
    }
}

/// Prefer what is already installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstalledPolicy;

impl Policy for InstalledPolicy {
    fn name(&self) -> &'static str {
        "installed"
    }

    fn prune_provides(&self, candidates: Vec<SolvableRef>) -> Vec<SolvableRef> {
        candidates
    }

    fn select_request(&self, mut candidates: Vec<SolvableRef>) -> Option<SolvableRef> {
        if let Some(installed) = candidates.iter().find(|c| c.is_installed()) {
            return Some(installed.clone());
        }
        candidates.sort_by(|a, b| compare_solvables(a.as_ref(), b.as_ref()));
        candidates.into_iter().next()
    }

    /// The solution removing the fewest packages; ties keep ranking order
    fn select_solution(&self, solutions: Vec<Solution>) -> Option<Solution> {
        let mut best: Option<(usize, Solution)> = None;
        for solution in solutions {
            let removals = solution.removals().count();
            match &best {
                Some((fewest, _)) if *fewest <= removals => {}
                _ => best = Some((removals, solution)),
            }
        }
        best.map(|(_, solution)| solution)
    }
}

/// Select a policy by its configuration name
pub fn from_name(name: &str) -> Result<Box<dyn Policy>> {
    Ok(name.parse::<PolicyKind>()?.build())
}
