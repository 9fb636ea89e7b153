use std::sync::Arc;

use crate::filters::cache::AutocompleteCache;
use crate::filters::catalog::Catalog;
use crate::models::config::AppConfig;

/// State shared by every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    /// Immutable filter definitions
    pub catalog: Arc<Catalog>,

    /// Autocomplete data pushed by the discovery collaborator
    pub cache: Arc<AutocompleteCache>,

    /// Application configuration
    pub config: AppConfig,
}

impl AppState {
    pub fn new(catalog: Catalog, config: AppConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            cache: Arc::new(AutocompleteCache::new()),
            config,
        }
    }
}
