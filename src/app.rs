//! Application context shared by pages and the host.
//!
//! ARCHITECTURE
//! ============
//! The host decides its capabilities once (persistence backend, navigator,
//! ambient fetch) and hands this context to every loader. Loaders may pass a
//! different fetch per call via [`AppContext::api_with`].

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::api::{Endpoints, VenturesApi};
use crate::net::client::ApiClient;
use crate::net::error::ApiError;
use crate::net::fetch::{Fetch, ReqwestFetch};
use crate::state::auth::AuthStore;
use crate::util::navigate::Navigator;
use crate::util::storage::{FileStore, KeyValueStore};

/// Unauthenticated landing route (the login screen).
pub const ENTRY_ROUTE: &str = "/";

#[derive(Clone)]
pub struct AppContext {
    pub endpoints: Endpoints,
    pub session: Arc<AuthStore>,
    pub navigator: Arc<dyn Navigator>,
    pub fetch: Arc<dyn Fetch>,
}

impl AppContext {
    /// Wire a context from explicit capabilities.
    pub fn new(
        api_base_url: &str,
        storage: Option<Arc<dyn KeyValueStore>>,
        navigator: Arc<dyn Navigator>,
        fetch: Arc<dyn Fetch>,
    ) -> Self {
        Self {
            endpoints: Endpoints::new(api_base_url),
            session: Arc::new(AuthStore::new(storage)),
            navigator,
            fetch,
        }
    }

    /// Interactive context: file-backed token storage and a `reqwest` fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self, ApiError> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.token_file));
        let fetch = Arc::new(ReqwestFetch::new(config.timeouts)?);
        Ok(Self::new(&config.api_base_url, Some(storage), navigator, fetch))
    }

    /// API methods over the ambient fetch.
    #[must_use]
    pub fn api(&self) -> VenturesApi {
        self.api_with(self.fetch.clone())
    }

    /// API methods over a caller-supplied fetch.
    #[must_use]
    pub fn api_with(&self, fetch: Arc<dyn Fetch>) -> VenturesApi {
        let client = ApiClient::new(fetch, self.session.clone(), self.navigator.clone());
        VenturesApi::new(client, self.endpoints.clone())
    }
}
