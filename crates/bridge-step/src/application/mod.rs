//! # Application Layer
//!
//! Step state machine and the route driver built on top of it.

mod route;
mod step;

pub use route::{RouteExecutor, RouteOutcome};
pub use step::TransactionStep;
