pub mod config;
pub mod error;
pub mod package;
pub mod repository;
pub mod solver;

pub use config::{ConfigLoader, PolicyKind, SolverConfig};
pub use error::{PimError, Result};
pub use package::{Package, Solvable, SolvableRef, INSTALLED_PRIORITY};
pub use repository::Repo;
pub use solver::{
    InstalledPolicy, Job, JobKind, Operation, OperationKind, Policy, Pool, PoolBuilder, Request,
    SatEngine, Solution, Solver, UpdatedPolicy, VarisatEngine,
};
pub use pim_version::{Method, Op, Requirement, Version, VersionError};
