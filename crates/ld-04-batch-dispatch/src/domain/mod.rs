//! Domain layer for batch dispatch

pub mod entities;
pub mod errors;
pub mod jetton;

pub use entities::*;
pub use errors::*;
pub use jetton::{JettonTransfer, JETTON_TRANSFER_OP};
