//! Solver configuration
//!
//! Settings are merged from three sources, highest priority first:
//!
//! 1. Environment variables (`PIM_POLICY`, `PIM_MAX_SOLUTIONS`)
//! 2. A JSON configuration file
//! 3. Built-in defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use pim_solver::config::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::new(true)
//!     .build(Some(Path::new("/etc/pim/solver.json")))
//!     .unwrap();
//!
//! let policy = config.policy.build();
//! println!("Resolving with {} (max {} models)", policy.name(), config.max_solutions);
//! ```

mod config;
mod source;

pub use config::{PolicyKind, SolverConfig, DEFAULT_MAX_SOLUTIONS};
pub use source::{ConfigLoader, ConfigSource, RawConfig};
