use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: AppConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }
}
