//! Core types shared by every part of the crate.
//!
//! ### [`error`] - Error handling
//! [`ConstructionError`] is the single failure kind returned while producing
//! a logger, and [`LogResult`] is the matching result alias.

pub mod error;

pub use error::{ConstructionError, LogResult};
