//! # Address Derivation Subsystem
//!
//! Computes the address a program will occupy from its code and initial
//! state, before anything is submitted.
//!
//! ```text
//! address = (workchain, repr_hash(StateInit { code, data }))
//! ```
//!
//! Callers that attach value to a deployment run [`verify_address`] first;
//! a mismatch means the payload is not the one the operator expects.

pub mod domain;
pub mod errors;

pub use domain::{derive_address, predict, verify_address, DerivedAddress, StateInit, TickTock};
pub use errors::AddressError;
