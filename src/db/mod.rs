//! In-memory storage layer.

pub mod user_store;

pub use user_store::UserStore;

/// Visits generated for each internal test user.
pub const INTERNAL_USER_HISTORY_LEN: usize = 3;
