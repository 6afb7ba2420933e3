//! Session records for AdPilot.
//!
//! A session binds a user to a provisioned runner and tracks its readiness
//! status and the capability providers that were successfully installed.
//! Rows live in a JSON-file-backed store under the configured state path.

pub mod lifecycle;
pub mod store;

pub use lifecycle::SessionStatus;
pub use store::{SessionRecord, SessionStore};
