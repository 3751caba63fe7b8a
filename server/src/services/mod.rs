//! Domain services used by HTTP and websocket routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence so route handlers stay
//! focused on protocol translation and auth plumbing. Every document query is
//! scoped by the owning `user_id`.

pub mod account;
pub mod auth;
pub mod credentials;
pub mod exercise;
pub mod live;
pub mod session;
pub mod storage;
pub mod template;
pub mod workout;
