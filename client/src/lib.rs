//! Local-first client state for the Liftbook workout tracker.
//!
//! ARCHITECTURE
//! ============
//! State lives in explicit objects (`state::*`) owned by one `AppContext`.
//! Each object persists itself through the `LocalStore` trait so drafts,
//! theme, session and caches survive restarts. Remote reads and writes go
//! through the `Backend` trait; `net::api::HttpBackend` is the production
//! implementation. Multi-step flows that touch both sides (finishing a
//! workout, deleting the account) live in `workflow`.

pub mod context;
pub mod error;
pub mod net;
pub mod reorder;
pub mod state;
pub mod stats;
pub mod storage;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::AppContext;
pub use error::ClientError;
pub use net::backend::Backend;
pub use storage::{FileStore, LocalStore, MemoryStore};
