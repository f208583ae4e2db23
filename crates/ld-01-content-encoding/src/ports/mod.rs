//! Ports for content encoding

pub mod inbound;

pub use inbound::*;
