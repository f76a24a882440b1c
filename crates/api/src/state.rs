use std::sync::Arc;

use social_lens_core::events::bus::EventBus;
use social_lens_core::DatasetHandle;
use social_lens_llm::ChatClient;
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    pool: PgPool,
    config: AppConfig,
    event_bus: EventBus,
    dataset: DatasetHandle,
    llm: Option<ChatClient>,
    /// Serializes uploads so persistence and swap happen in upload order.
    upload_lock: Mutex<()>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: AppConfig,
        event_bus: EventBus,
        dataset: DatasetHandle,
        llm: Option<ChatClient>,
    ) -> Self {
        Self {
            inner: Arc::new(InnerState {
                pool,
                config,
                event_bus,
                dataset,
                llm,
                upload_lock: Mutex::new(()),
            }),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }

    pub fn dataset(&self) -> &DatasetHandle {
        &self.inner.dataset
    }

    pub fn llm(&self) -> Option<&ChatClient> {
        self.inner.llm.as_ref()
    }

    pub fn upload_lock(&self) -> &Mutex<()> {
        &self.inner.upload_lock
    }
}
