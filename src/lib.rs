pub mod cli;
pub mod config;
pub mod engine;
pub mod events;
pub mod storage;
pub mod tasks;

use std::sync::Arc;

use anyhow::Result;

use config::AppConfig;
use events::EventBroadcaster;
use storage::Storage;
use tasks::TaskStore;

/// Shared application state passed to every command handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub storage: Arc<Storage>,
    pub broadcaster: Arc<EventBroadcaster>,
    pub tasks: Arc<TaskStore>,
}

impl AppContext {
    /// Open storage, load the task store, and wire the event fan-out.
    pub async fn init(config: AppConfig) -> Result<Self> {
        let storage = Arc::new(Storage::new(&config.data_dir).await?);
        let broadcaster = Arc::new(EventBroadcaster::new());
        let tasks = Arc::new(TaskStore::open(storage.clone(), broadcaster.clone()).await?);
        Ok(Self {
            config: Arc::new(config),
            storage,
            broadcaster,
            tasks,
        })
    }
}
