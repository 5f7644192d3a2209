//! Query execution and the results lifecycle.

pub mod controller;
pub mod service;
pub mod sessions;
pub mod sources;

pub use controller::{Lifecycle, Outcome, ResultController, FETCH_ERROR_MESSAGE};
pub use service::{SearchService, NO_RESULTS_TEXT};
pub use sessions::{SessionLease, SessionRegistry, SessionStart};
