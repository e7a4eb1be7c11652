//! Business logic services for the Rice Inspection platform

pub mod inspection;

pub use inspection::InspectionService;
