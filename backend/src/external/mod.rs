//! External API integrations

pub mod standards;

pub use standards::StandardsClient;
