//! HTTP handlers for the Rice Inspection platform

pub mod health;
pub mod history;
pub mod standards;

pub use health::*;
pub use history::*;
pub use standards::*;
