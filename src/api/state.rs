//! Shared state for the Web API server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::operations::tasks::TaskStore;
use crate::storage::config::Config;
use crate::storage::{self, quotes, tasks};
use crate::weather::WeatherClient;

/// Handler state: cheap to clone, everything behind `Arc`
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TaskStore>,
    pub weather: Arc<WeatherClient>,
    /// Path of the quote pool, re-read on every request
    pub quotes_path: Arc<PathBuf>,
}

impl AppState {
    /// Open the data files under `data_dir`, seeding them on first run.
    ///
    /// Called at web server startup.
    pub async fn init(data_dir: &Path, config: &Config) -> Result<Self> {
        storage::ensure_data_dir(data_dir)?;

        let quotes_path = quotes::quotes_file_path(data_dir);
        quotes::ensure_quotes_file(&quotes_path)?;

        let store = TaskStore::open(tasks::tasks_file_path(data_dir)).await?;
        tracing::info!(tasks = %store.path().display(), quotes = %quotes_path.display(), "data files ready");

        let weather = WeatherClient::new(&config.weather);
        if !weather.is_live() {
            tracing::info!("no weather API key configured, serving synthetic weather");
        }

        Ok(Self {
            store: Arc::new(store),
            weather: Arc::new(weather),
            quotes_path: Arc::new(quotes_path),
        })
    }
}
