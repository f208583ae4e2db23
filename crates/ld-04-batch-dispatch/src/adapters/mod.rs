//! Transfer encoder implementations

pub mod encoders;

pub use encoders::{JettonTransferEncoder, NativeTransferEncoder, MIN_FORWARD_TON_AMOUNT};
