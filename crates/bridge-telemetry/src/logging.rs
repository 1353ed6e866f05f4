//! Structured logging helpers.
//!
//! Every route-step event carries the same correlation fields so log
//! aggregation can stitch the lifecycle of one step together:
//! - `route_id`: active route identifier on the remote service
//! - `user_tx_index`: position of the step inside the route
//! - additional context fields

/// Log a route-step event with the standard correlation fields.
///
/// ```rust,ignore
/// log_step_event!(info, "Status received", route_id, user_tx_index, status = %status);
/// ```
#[macro_export]
macro_rules! log_step_event {
    ($level:ident, $msg:expr, $route_id:expr, $user_tx_index:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            route_id = $route_id,
            user_tx_index = $user_tx_index,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a transaction-related event with the hash attached.
#[macro_export]
macro_rules! log_tx_event {
    ($level:ident, $msg:expr, $tx_hash:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            tx_hash = %$tx_hash,
            $($($field)*,)?
            $msg
        )
    };
}
