//! Domain models for the Rice Inspection platform

mod grain;
mod inspection;
mod standard;

pub use grain::*;
pub use inspection::*;
pub use standard::*;
