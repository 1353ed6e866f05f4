//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits that do not need a remote service.

mod allowlist;

pub use allowlist::{AllowlistError, StaticAllowlist};
