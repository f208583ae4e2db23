//! Ports for batch dispatch

pub mod outbound;

pub use outbound::TransferEncoder;
