use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::{JSearchClient, JobSearchProvider};
use crate::config::Config;
use crate::db::Store;
use crate::services::{QuotaService, ResponseCache, SearchService};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Reused across HTTP-based services to enable connection pooling and
/// avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("Jobarr/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub provider: Arc<dyn JobSearchProvider>,

    pub cache: Arc<ResponseCache>,

    pub quota_service: QuotaService,

    pub search_service: SearchService,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http_client =
            build_shared_http_client(config.jsearch.request_timeout_seconds.into())?;
        let provider = Arc::new(JSearchClient::with_shared_client(
            http_client,
            config.jsearch.clone(),
        )) as Arc<dyn JobSearchProvider>;

        Self::with_provider(config, provider).await
    }

    /// Wires the full state around a caller-supplied search provider. Tests
    /// use this to stand in a stub for the real upstream.
    pub async fn with_provider(
        config: Config,
        provider: Arc<dyn JobSearchProvider>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let cache = Arc::new(ResponseCache::new(&config.cache));
        let quota_service = QuotaService::new(store.clone(), config.quota.clone());
        let search_service = SearchService::new(
            store.clone(),
            provider.clone(),
            cache.clone(),
            quota_service.clone(),
            config.jsearch.page_size,
        );

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            provider,
            cache,
            quota_service,
            search_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
