//! Networking modules for the venture REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `fetch` is the transport seam, `client` layers session headers and 401
//! handling on top, `api` exposes typed endpoints, and `types` defines the
//! wire schema.

pub mod api;
pub mod client;
pub mod error;
pub mod fetch;
pub mod types;
