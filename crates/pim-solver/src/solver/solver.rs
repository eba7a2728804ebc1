use std::collections::HashSet;
use std::time::Instant;

use pim_version::{Method, Requirement};

use super::clause::{Clause, ClauseKind, ClauseSet};
use super::policy::Policy;
use super::pool::Pool;
use super::request::{JobKind, Request};
use super::sat::{Assignment, Literal, SatEngine, VarisatEngine};
use super::solution::{compare_solutions, Operation, Solution};
use crate::config::{SolverConfig, DEFAULT_MAX_SOLUTIONS};
use crate::error::{PimError, Result};
use crate::package::SolvableRef;

/// Turns a request into an install/remove plan.
///
/// Resolution runs in three phases: the request is compiled into clauses,
/// the SAT engine enumerates minimal satisfying assignments, and these are
/// turned into solutions, ranked, and handed to the policy. Neither the pool
/// nor its repos are modified.
pub struct Solver<'a> {
    /// Package pool
    pool: &'a Pool,
    /// Selection policy
    policy: &'a dyn Policy,
    /// Upper bound on enumerated assignments
    max_solutions: usize,
}

impl<'a> Solver<'a> {
    /// Create a new solver
    pub fn new(pool: &'a Pool, policy: &'a dyn Policy) -> Self {
        Self {
            pool,
            policy,
            max_solutions: DEFAULT_MAX_SOLUTIONS,
        }
    }

    /// Create a solver using the limits from `config`.
    ///
    /// The policy is passed separately so the caller owns it; build it with
    /// [`crate::PolicyKind::build`].
    pub fn with_config(pool: &'a Pool, policy: &'a dyn Policy, config: &SolverConfig) -> Self {
        Self::new(pool, policy).with_max_solutions(config.max_solutions)
    }

    /// Limit how many satisfying assignments are enumerated
    pub fn with_max_solutions(mut self, max_solutions: usize) -> Self {
        self.max_solutions = max_solutions.max(1);
        self
    }

    /// Resolve `request` with the default `varisat` engine.
    ///
    /// Returns `Ok(None)` when the policy declines to choose a solution.
    pub fn solve(&self, request: &Request) -> Result<Option<Solution>> {
        let mut engine = VarisatEngine::new(self.max_solutions);
        self.solve_with(request, &mut engine)
    }

    /// Resolve `request` using the given engine
    pub fn solve_with(&self, request: &Request, engine: &mut dyn SatEngine) -> Result<Option<Solution>> {
        log::debug!("Generating clauses for {} jobs", request.len());
        let start = Instant::now();
        let clauses = self.compile(request)?;
        log::info!("Generated {} clauses in {:?}", clauses.len(), start.elapsed());

        // Installed packages prefer to stay, everything else prefers to stay out
        let mut seen = HashSet::new();
        for clause in clauses.iter() {
            engine.add_clause(clause.literals());
            for literal in clause.literals() {
                if seen.insert(literal.name()) && self.is_installed_id(literal.name())? {
                    engine.prefer(&Literal::positive(literal.name()));
                }
            }
        }

        log::debug!("Resolving dependencies through SAT");
        let sat_start = Instant::now();
        let outcome = engine.satisfiable()?;
        if !outcome.satisfiable {
            log::debug!("SAT solving failed in {:?}", sat_start.elapsed());
            return Err(PimError::Unsatisfiable {
                jobs: request.to_string(),
            });
        }
        log::info!(
            "Found {} satisfying assignments in {:.3} seconds",
            outcome.assignments.len(),
            sat_start.elapsed().as_secs_f64()
        );

        let mut solutions = outcome
            .assignments
            .iter()
            .map(|assignment| self.build_solution(assignment))
            .collect::<Result<Vec<_>>>()?;
        solutions.sort_by(compare_solutions);
        log::info!("Ranked {} solutions", solutions.len());

        let selected = self.policy.select_solution(solutions);
        if selected.is_none() {
            log::warn!("Policy {} selected no solution", self.policy.name());
        }
        Ok(selected)
    }

    /// Compile `request` and render the clauses as DIMACS CNF
    pub fn cnf(&self, request: &Request) -> Result<String> {
        let clauses = self.compile(request)?;
        let mut engine = VarisatEngine::new(self.max_solutions);
        for clause in clauses.iter() {
            engine.add_clause(clause.literals());
        }
        Ok(engine.to_cnf())
    }

    /// Compile `request` into clauses
    pub fn compile(&self, request: &Request) -> Result<ClauseSet> {
        let mut compiler = ClauseCompiler::new(self.pool, self.policy);

        for job in request.jobs() {
            let Some(requirement) = job.requirement() else {
                log::warn!("Job '{}' produces no clauses", job);
                continue;
            };

            match job.kind() {
                JobKind::Install => compiler.install(requirement),
                JobKind::Remove => compiler.remove(requirement),
                JobKind::Update | JobKind::Upgrade => {
                    log::warn!("Job '{}' produces no clauses", job);
                }
            }
        }

        log::debug!(
            "Compiled {} job, {} requires, {} same-name and {} conflict clauses",
            compiler.clauses.count(ClauseKind::Job),
            compiler.clauses.count(ClauseKind::Requires),
            compiler.clauses.count(ClauseKind::SameName),
            compiler.clauses.count(ClauseKind::Conflict),
        );
        Ok(compiler.clauses)
    }

    /// Check whether the solver variable `id` names an installed package
    fn is_installed_id(&self, id: &str) -> Result<bool> {
        let requirement = Requirement::parse_simple(id)?;
        Ok(self
            .pool
            .what_provides(&requirement)
            .iter()
            .any(|s| s.id() == id && s.is_installed()))
    }

    /// Turn one assignment into a solution.
    ///
    /// Each variable is a solvable id; it is mapped back to a pool member
    /// through the policy. True variables install or keep their package,
    /// false ones remove it if it is installed.
    fn build_solution(&self, assignment: &Assignment) -> Result<Solution> {
        let mut solution = Solution::new();

        for (id, &value) in assignment {
            let requirement = Requirement::parse_simple(id)?;
            let candidates: Vec<SolvableRef> = self
                .pool
                .what_provides(&requirement)
                .into_iter()
                .filter(|s| s.id() == *id)
                .collect();
            let package = self
                .policy
                .select_request(candidates)
                .ok_or_else(|| PimError::UnknownSolvable(id.clone()))?;

            match (value, package.is_installed()) {
                (true, false) => solution.push(Operation::install(package)),
                (true, true) => solution.push(Operation::noop(package)),
                (false, true) => solution.push(Operation::remove(package)),
                (false, false) => {}
            }
        }

        Ok(solution)
    }
}

/// Walks the dependency graph from the jobs and accumulates clauses.
///
/// Each solvable is expanded at most once, which keeps dependency cycles of
/// any length finite.
struct ClauseCompiler<'p> {
    pool: &'p Pool,
    policy: &'p dyn Policy,
    clauses: ClauseSet,
    expanded: HashSet<String>,
    removed: HashSet<String>,
}

impl<'p> ClauseCompiler<'p> {
    fn new(pool: &'p Pool, policy: &'p dyn Policy) -> Self {
        Self {
            pool,
            policy,
            clauses: ClauseSet::new(),
            expanded: HashSet::new(),
            removed: HashSet::new(),
        }
    }

    fn install(&mut self, requirement: &Requirement) {
        let candidates = self.pool.what_provides(requirement);
        let Some(target) = self.policy.select_request(candidates) else {
            log::warn!("Nothing provides {}, skipping install", requirement);
            return;
        };

        log::debug!("Install {} resolved to {}", requirement, target.id());
        self.clauses
            .add(Clause::job(Literal::positive(target.id())).with_source(format!("install {}", requirement)));
        self.add_requirement_clauses(&target);
    }

    fn remove(&mut self, requirement: &Requirement) {
        let Some(target) = self.pool.installed(requirement) else {
            log::warn!("{} is not installed, skipping remove", requirement);
            return;
        };

        log::debug!("Remove {} resolved to {}", requirement, target.id());
        self.clauses
            .add(Clause::job(Literal::negative(target.id())).with_source(format!("remove {}", requirement)));
        self.add_removal_clauses(&target);
    }

    /// Force every installed dependent of `solvable` out, transitively
    fn add_removal_clauses(&mut self, solvable: &SolvableRef) {
        if !self.removed.insert(solvable.id()) {
            return;
        }

        let dependents = self.pool.what_depends(solvable.name()).to_vec();
        for dependent in dependents {
            if dependent.id() == solvable.id() {
                continue;
            }
            self.clauses.add(
                Clause::job(Literal::negative(dependent.id()))
                    .with_source(format!("{} depends on {}", dependent.id(), solvable.name())),
            );
            self.add_removal_clauses(&dependent);
        }
    }

    fn add_requirement_clauses(&mut self, solvable: &SolvableRef) {
        let id = solvable.id();
        if !self.expanded.insert(id.clone()) {
            return;
        }

        for requirement in solvable.requirements() {
            if requirement.name() == solvable.name() {
                continue;
            }

            match requirement.method() {
                Method::Depends => {
                    let candidates = self.policy.prune_provides(self.pool.what_provides(requirement));
                    let mut targets: Vec<String> = Vec::with_capacity(candidates.len());
                    for candidate in &candidates {
                        let target = candidate.id();
                        if !targets.contains(&target) {
                            targets.push(target);
                        }
                    }

                    if targets.is_empty() {
                        log::debug!("Nothing provides {} for {}", requirement, id);
                    }
                    self.clauses.add(
                        Clause::requires(&id, &targets)
                            .with_source(format!("{} depends on {}", id, requirement)),
                    );

                    for candidate in &candidates {
                        self.add_requirement_clauses(candidate);
                    }

                    for (i, a) in targets.iter().enumerate() {
                        for b in &targets[i + 1..] {
                            self.clauses.add(
                                Clause::same_name(a, b)
                                    .with_source(format!("only one provider of {}", requirement.name())),
                            );
                        }
                    }
                }
                Method::Conflicts => {
                    let candidates = self.policy.prune_provides(self.pool.what_provides(requirement));
                    for candidate in candidates {
                        let other = candidate.id();
                        if other == id {
                            continue;
                        }
                        self.clauses.add(
                            Clause::conflict(&id, &other)
                                .with_source(format!("{} conflicts with {}", id, requirement)),
                        );
                    }
                }
                Method::Provides => {}
            }
        }
    }
}
