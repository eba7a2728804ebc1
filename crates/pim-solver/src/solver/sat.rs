//! Seam to the boolean satisfiability engine

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fmt::Write as _;
use std::ops::Not;

use indexmap::IndexSet;
use varisat::{ExtendFormula, Lit, Solver as VarisatSolver};

use crate::error::{PimError, Result};

/// A named boolean variable or its negation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    name: String,
    positive: bool,
}

impl Literal {
    pub fn positive(name: impl Into<String>) -> Self {
        Self { name: name.into(), positive: true }
    }

    pub fn negative(name: impl Into<String>) -> Self {
        Self { name: name.into(), positive: false }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_positive(&self) -> bool {
        self.positive
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal { name: self.name, positive: !self.positive }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.name)
        } else {
            write!(f, "-{}", self.name)
        }
    }
}

/// Variable name -> value, sorted by name
pub type Assignment = BTreeMap<String, bool>;

/// Outcome of a satisfiability check
#[derive(Debug, Clone, Default)]
pub struct Satisfiability {
    pub satisfiable: bool,
    /// Every minimal satisfying assignment found
    pub assignments: Vec<Assignment>,
}

/// A clause-based SAT engine over named variables
pub trait SatEngine {
    /// Add a disjunction of literals
    fn add_clause(&mut self, literals: &[Literal]);

    /// Declare the value a variable keeps unless the clauses force it
    /// otherwise. Variables without a declared value prefer false.
    fn prefer(&mut self, _literal: &Literal) {}

    /// Decide the clause set and enumerate its satisfying assignments.
    ///
    /// Only minimal assignments are reported: no reported assignment differs
    /// from the preferred values in a superset of the variables another one
    /// differs in.
    fn satisfiable(&mut self) -> Result<Satisfiability>;

    /// The clause set in DIMACS CNF form
    fn to_cnf(&self) -> String;
}

/// [`SatEngine`] backed by `varisat`.
///
/// Each model found is shrunk towards the preferred values, then blocked
/// together with all models deviating in a superset of its variables.
/// Enumeration stops after `max_solutions` minimal models.
#[derive(Debug)]
pub struct VarisatEngine {
    variables: IndexSet<String>,
    clauses: Vec<Vec<isize>>,
    preferred: HashSet<String>,
    max_solutions: usize,
}

impl VarisatEngine {
    pub fn new(max_solutions: usize) -> Self {
        Self {
            variables: IndexSet::new(),
            clauses: Vec::new(),
            preferred: HashSet::new(),
            max_solutions,
        }
    }

    /// DIMACS literal for a named literal, interning the variable
    fn intern(&mut self, literal: &Literal) -> isize {
        let (index, _) = self.variables.insert_full(literal.name().to_string());
        let var = index as isize + 1;
        if literal.is_positive() {
            var
        } else {
            -var
        }
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }
}

impl Default for VarisatEngine {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_SOLUTIONS)
    }
}

/// Literal setting variable `index` to `value`
fn lit(index: usize, value: bool) -> Lit {
    let var = index as isize + 1;
    Lit::from_dimacs(if value { var } else { -var })
}

/// Values of the first `count` variables in the last model
fn read_model(solver: &VarisatSolver, count: usize) -> Option<Vec<bool>> {
    let model = solver.model()?;
    let mut values = vec![false; count];
    for l in model {
        let index = l.to_dimacs().unsigned_abs() - 1;
        if index < count {
            values[index] = l.is_positive();
        }
    }
    Some(values)
}

/// Variables whose value differs from the preferred one
fn deviations(values: &[bool], preferred: &[bool]) -> Vec<usize> {
    (0..values.len()).filter(|&i| values[i] != preferred[i]).collect()
}

fn sat_error(e: impl fmt::Display) -> PimError {
    PimError::Sat(e.to_string())
}

impl SatEngine for VarisatEngine {
    fn add_clause(&mut self, literals: &[Literal]) {
        let clause: Vec<isize> = literals.iter().map(|l| self.intern(l)).collect();
        self.clauses.push(clause);
    }

    fn prefer(&mut self, literal: &Literal) {
        if literal.is_positive() {
            self.preferred.insert(literal.name().to_string());
        } else {
            self.preferred.remove(literal.name());
        }
    }

    fn satisfiable(&mut self) -> Result<Satisfiability> {
        let mut solver = VarisatSolver::new();
        for clause in &self.clauses {
            let lits: Vec<Lit> = clause.iter().map(|&l| Lit::from_dimacs(l)).collect();
            solver.add_clause(&lits);
        }

        let count = self.variables.len();
        let preferred: Vec<bool> = self
            .variables
            .iter()
            .map(|name| self.preferred.contains(name))
            .collect();
        // Guard variables live above the named ones
        let mut next_guard = count;

        let mut result = Satisfiability::default();
        loop {
            solver.assume(&[]);
            if !solver.solve().map_err(sat_error)? {
                break;
            }
            if result.assignments.len() >= self.max_solutions {
                log::warn!(
                    "Stopped enumerating solutions after {} models",
                    self.max_solutions
                );
                break;
            }
            let Some(mut values) = read_model(&solver, count) else {
                break;
            };

            // Undo deviations while the clauses allow it; the variables already
            // at their preferred value stay there
            loop {
                let deviating = deviations(&values, &preferred);
                if deviating.is_empty() {
                    break;
                }

                let guard = lit(next_guard, true);
                next_guard += 1;

                let mut shrink = vec![!guard];
                shrink.extend(deviating.iter().map(|&i| lit(i, preferred[i])));
                solver.add_clause(&shrink);

                let mut assumptions = vec![guard];
                assumptions.extend(
                    (0..count)
                        .filter(|&i| values[i] == preferred[i])
                        .map(|i| lit(i, preferred[i])),
                );
                solver.assume(&assumptions);

                let smaller = if solver.solve().map_err(sat_error)? {
                    read_model(&solver, count)
                } else {
                    None
                };
                solver.add_clause(&[!guard]);

                match smaller {
                    Some(next) => values = next,
                    None => break,
                }
            }

            let assignment: Assignment = self
                .variables
                .iter()
                .cloned()
                .zip(values.iter().copied())
                .collect();
            log::debug!("Model {}: {:?}", result.assignments.len() + 1, assignment);
            result.assignments.push(assignment);

            // Block this model and every model deviating in a superset of it
            let blocking: Vec<Lit> = deviations(&values, &preferred)
                .into_iter()
                .map(|i| lit(i, preferred[i]))
                .collect();
            if blocking.is_empty() {
                break;
            }
            solver.add_clause(&blocking);
        }

        result.satisfiable = !result.assignments.is_empty();
        Ok(result)
    }

    fn to_cnf(&self) -> String {
        let mut out = String::new();
        for (index, name) in self.variables.iter().enumerate() {
            let _ = writeln!(out, "c {} {}", index + 1, name);
        }
        let _ = writeln!(out, "p cnf {} {}", self.variables.len(), self.clauses.len());
        for clause in &self.clauses {
            for lit in clause {
                let _ = write!(out, "{} ", lit);
            }
            let _ = writeln!(out, "0");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(name: &str) -> Literal {
        Literal::positive(name)
    }

    fn neg(name: &str) -> Literal {
        Literal::negative(name)
    }

    #[test]
    fn test_literal() {
        let lit = pos("a");
        assert!(lit.is_positive());
        assert_eq!(lit.to_string(), "a");
        assert_eq!((!lit).to_string(), "-a");
    }

    #[test]
    fn test_unsatisfiable() {
        let mut engine = VarisatEngine::new(16);
        engine.add_clause(&[pos("a")]);
        engine.add_clause(&[neg("a")]);

        let result = engine.satisfiable().unwrap();
        assert!(!result.satisfiable);
        assert!(result.assignments.is_empty());
    }

    #[test]
    fn test_enumerates_all_models() {
        let mut engine = VarisatEngine::new(16);
        engine.add_clause(&[pos("nacho")]);
        engine.add_clause(&[neg("nacho"), pos("fruit1"), pos("fruit2")]);
        engine.add_clause(&[neg("fruit1"), neg("fruit2")]);

        let result = engine.satisfiable().unwrap();
        assert!(result.satisfiable);
        assert_eq!(result.assignments.len(), 2);

        for assignment in &result.assignments {
            assert_eq!(assignment.get("nacho"), Some(&true));
            assert_ne!(assignment.get("fruit1"), assignment.get("fruit2"));
        }
    }

    #[test]
    fn test_enumerates_minimal_models_only() {
        let mut engine = VarisatEngine::new(16);
        engine.add_clause(&[pos("a"), pos("b"), pos("c")]);

        let result = engine.satisfiable().unwrap();
        assert_eq!(result.assignments.len(), 3);
        for assignment in &result.assignments {
            assert_eq!(assignment.values().filter(|v| **v).count(), 1);
        }
    }

    #[test]
    fn test_max_solutions_caps_enumeration() {
        let mut engine = VarisatEngine::new(2);
        engine.add_clause(&[pos("a"), pos("b"), pos("c")]);

        let result = engine.satisfiable().unwrap();
        assert!(result.satisfiable);
        assert_eq!(result.assignments.len(), 2);
    }

    #[test]
    fn test_unforced_variables_do_not_multiply_models() {
        // 2^20 raw models with `z` false, far above the cap
        let mut engine = VarisatEngine::new(4);
        engine.add_clause(&[pos("a")]);
        for i in 0..20 {
            engine.add_clause(&[neg("z"), pos(&format!("x{}", i))]);
        }

        let result = engine.satisfiable().unwrap();
        assert_eq!(result.assignments.len(), 1);

        let only = &result.assignments[0];
        assert_eq!(only.get("a"), Some(&true));
        assert_eq!(only.get("z"), Some(&false));
        assert_eq!(only.values().filter(|v| **v).count(), 1);
    }

    #[test]
    fn test_preferred_values() {
        let mut engine = VarisatEngine::new(16);
        engine.add_clause(&[pos("app")]);
        engine.add_clause(&[neg("app"), pos("old"), pos("new")]);
        engine.add_clause(&[neg("old"), neg("new")]);
        engine.prefer(&pos("old"));

        // Switching to `new` also drops `old`, a superset of keeping it
        let result = engine.satisfiable().unwrap();
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].get("old"), Some(&true));
        assert_eq!(result.assignments[0].get("new"), Some(&false));

        engine.prefer(&neg("old"));
        assert_eq!(engine.satisfiable().unwrap().assignments.len(), 2);
    }

    #[test]
    fn test_forced_deviation_from_preference() {
        let mut engine = VarisatEngine::new(16);
        engine.add_clause(&[neg("kept")]);
        engine.prefer(&pos("kept"));

        let result = engine.satisfiable().unwrap();
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].get("kept"), Some(&false));
    }

    #[test]
    fn test_empty_clause_set_is_satisfiable() {
        let mut engine = VarisatEngine::new(4);
        let result = engine.satisfiable().unwrap();
        assert!(result.satisfiable);
        assert_eq!(result.assignments, vec![Assignment::new()]);
    }

    #[test]
    fn test_to_cnf() {
        let mut engine = VarisatEngine::new(4);
        engine.add_clause(&[pos("a")]);
        engine.add_clause(&[neg("a"), pos("b")]);

        assert_eq!(engine.variable_count(), 2);
        assert_eq!(engine.clause_count(), 2);
        assert_eq!(engine.to_cnf(), "c 1 a\nc 2 b\np cnf 2 2\n1 0\n-1 2 0\n");
    }
}
