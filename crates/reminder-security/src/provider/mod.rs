//! Secret provider backends.

pub mod env;
pub mod remote;
pub mod vault;
