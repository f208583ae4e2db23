//! Application layer for batch dispatch

pub mod dispatcher;

pub use dispatcher::{BatchDispatch, BatchDispatcher};
