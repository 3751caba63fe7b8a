//! Explicit client state objects, each owning its own persistence.

pub mod draft;
pub mod history;
pub mod session;
pub mod stats_cache;
pub mod templates;
pub mod theme;
pub mod timer;
