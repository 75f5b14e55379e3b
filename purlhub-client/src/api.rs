//! Entry point tying configuration, transport and throttle together.

use crate::accounts::AccountStore;
use crate::client::ApiClient;
use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::throttle::Throttle;
use std::sync::Arc;
use tracing::debug;

/// A connected purlHub API root.
///
/// Every store reached from one `Api` shares its HTTP client and throttle.
#[derive(Debug, Clone)]
pub struct Api {
    client: Arc<ApiClient>,
}

impl Api {
    /// Connects with a throttle built from `config.throttle`.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let throttle = Arc::new(Throttle::new(&config.throttle));
        Self::with_throttle(config, throttle)
    }

    /// Connects using an existing throttle, e.g. one shared with other roots.
    pub fn with_throttle(config: ApiConfig, throttle: Arc<Throttle>) -> ApiResult<Self> {
        let client = ApiClient::new(&config, throttle)?;
        debug!("Constructed purlHub client @ {}", client.base_url());
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Connects with credentials read from the environment.
    pub fn from_env() -> ApiResult<Self> {
        Self::new(ApiConfig::from_env()?)
    }

    pub fn accounts(&self) -> AccountStore {
        AccountStore::new(Arc::clone(&self.client))
    }

    /// The shared transport.
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }
}
