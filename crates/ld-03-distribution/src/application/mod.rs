//! Application layer for distribution

pub mod capture;

pub use capture::{CaptureReport, SnapshotCapture};
