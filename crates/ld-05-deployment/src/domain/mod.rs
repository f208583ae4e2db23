//! Domain layer for deployment

pub mod errors;
pub mod state;

pub use errors::DeploymentError;
pub use state::{DeploymentState, DeploymentTracker};
