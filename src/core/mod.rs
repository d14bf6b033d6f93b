//! Core types shared across the carton solver crate.
//!
//! Currently this is the home of the crate-wide error taxonomy. The split
//! mirrors the rest of the crate: domain modules ([`crate::version`],
//! [`crate::resolver`]) own their behavior, while cross-cutting plumbing
//! lives here.

pub mod error;

pub use error::Error;
