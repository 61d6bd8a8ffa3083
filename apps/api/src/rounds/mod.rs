// Interview rounds and per-candidate round results.
// Bulk result changes go through `RoundReconciler`; plain reads and round
// creation go straight to the pool.

pub mod handlers;
pub mod queries;
pub mod reconcile;
pub mod summary;

pub use reconcile::{ReconcileError, RoundReconciler};
