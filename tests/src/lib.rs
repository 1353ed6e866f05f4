//! # Bridge Route Test Suite
//!
//! Unified test crate for flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Route execution against scripted collaborators
//!     ├── flows.rs      # Approval, send, submit and polling end to end
//!     └── allowlist.rs  # Address book loading and destination checks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p bridge-tests
//!
//! # By category
//! cargo test -p bridge-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;
