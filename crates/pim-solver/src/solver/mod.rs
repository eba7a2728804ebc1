//! Dependency resolution
//!
//! A [`Request`] is compiled against a [`Pool`] into boolean clauses, a
//! [`SatEngine`] enumerates the satisfying assignments, and the [`Policy`]
//! picks one of the resulting [`Solution`]s.

mod clause;
mod policy;
mod pool;
mod request;
mod sat;
mod solution;
mod solver;


pub use clause::{Clause, ClauseKind, ClauseSet};
pub use policy::{from_name, InstalledPolicy, Policy, UpdatedPolicy};
pub use pool::{Pool, PoolBuilder};
pub use request::{Job, JobKind, Request};
pub use sat::{Assignment, Literal, SatEngine, Satisfiability, VarisatEngine};
pub use solution::{compare_solutions, Operation, OperationKind, Solution};
pub use solver::Solver;
