//! Requirements: named capability references with a relationship and a
//! version operator

mod method;
mod operator;
mod requirement;

pub use method::Method;
pub use operator::Op;
pub use requirement::Requirement;
