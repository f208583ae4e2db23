//! # Ledger Distributor Test Suite
//!
//! Cross-crate scenarios run against the in-memory ledger.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── content_to_address.rs   # metadata → init payload → address
//!     ├── distribution_flow.rs    # index → snapshot → table → batches
//!     └── deployment_flow.rs      # deploy, confirm, time out
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ld-tests
//! cargo test -p ld-tests integration::distribution_flow
//! ```

pub mod integration;
