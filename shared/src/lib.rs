//! Shared types and models for the Rice Inspection platform
//!
//! This crate contains types shared between the backend, the browser form
//! (via WASM), and other components of the system.

pub mod aggregation;
pub mod models;
pub mod types;
pub mod validation;

pub use aggregation::*;
pub use models::*;
pub use types::*;
pub use validation::*;
