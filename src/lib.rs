//! Client for the venture portfolio backend.
//!
//! ARCHITECTURE
//! ============
//! `state` holds the session, `net` talks HTTP through an injectable fetch,
//! `pages` turns route requests into view data, and `util` carries the host
//! capabilities (storage, navigation) and the auth guard.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_helpers;
