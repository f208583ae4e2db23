//! Application layer for deployment

pub mod poller;

pub use poller::{DeploymentPoller, DeploymentReceipt};
