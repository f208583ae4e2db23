//! # Deployment Subsystem
//!
//! Deploys a program to the address derived from its initialization payload
//! and confirms it by polling.
//!
//! The poll timeout is the only cancellation point: after `timeout /
//! poll_interval` checks without success the deployment fails with
//! [`DeploymentError::DeploymentTimeout`] and the ledger is not queried again.

pub mod application;
pub mod config;
pub mod domain;

pub use application::{DeploymentPoller, DeploymentReceipt};
pub use config::DeploymentConfig;
pub use domain::{DeploymentError, DeploymentState, DeploymentTracker};
