//! Host capabilities and helpers shared across pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Persistence and navigation are injected capabilities chosen once at
//! startup, so pages and the request client never probe the environment.

pub mod auth;
pub mod navigate;
pub mod storage;
