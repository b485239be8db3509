use std::sync::Arc;

use tokio::sync::watch;

use crate::{api::StorefrontApi, config::AppConfig, error::AppResult};

/// Everything a view needs, built once and cloned into each view.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub api: StorefrontApi,
    pub cart_count: CartCountStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let api = StorefrontApi::new(&config)?;
        let cart_count = CartCountStore::new(api.clone());
        Ok(Self {
            config: Arc::new(config),
            api,
            cart_count,
        })
    }
}

/// Shared cart item count, published to every subscribed view.
#[derive(Debug, Clone)]
pub struct CartCountStore {
    api: StorefrontApi,
    count: Arc<watch::Sender<u64>>,
}

impl CartCountStore {
    pub fn new(api: StorefrontApi) -> Self {
        let (count, _) = watch::channel(0);
        Self {
            api,
            count: Arc::new(count),
        }
    }

    pub fn current(&self) -> u64 {
        *self.count.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.count.subscribe()
    }

    /// Re-reads the count from the backend. A failed read is logged and keeps the last count.
    pub async fn refresh(&self) {
        match self.api.cart_count().await {
            Ok(count) => {
                let previous = self.count.send_replace(count);
                tracing::debug!(previous, count, "cart count refreshed");
            }
            Err(err) => {
                tracing::error!(error = %err, "error fetching cart count");
            }
        }
    }
}
