//! Editing services and the session that owns the working dataset.

pub mod services;
pub mod session;

pub use session::{BudgetWarning, Session};
