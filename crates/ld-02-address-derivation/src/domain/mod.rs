//! Domain layer for address derivation

pub mod services;
pub mod state_init;

pub use services::*;
pub use state_init::{StateInit, TickTock};
