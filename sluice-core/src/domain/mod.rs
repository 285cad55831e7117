//! Core domain types
//!
//! Value objects shared between the client (which sends and receives them)
//! and the CLI (which builds them from flags and prints them).

pub mod pipeline;
pub mod profile;
pub mod runtime;
