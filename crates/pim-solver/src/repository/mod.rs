mod repo;

pub use repo::*;
