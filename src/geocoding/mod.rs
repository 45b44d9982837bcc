//! City name to coordinate resolution.

pub mod error;
pub mod provider;
pub mod resolver;
