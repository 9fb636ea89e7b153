use serde::{Deserialize, Serialize};

use crate::filters::options::MAX_OPTIONS;
use crate::models::filter::Match;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the REST API binds to
    pub host: String,

    /// Port for the REST API server
    pub port: u16,

    /// Match mode used when a request does not specify one
    pub default_match: Match,

    /// Cap on autocomplete suggestions returned to the console
    pub max_options: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            default_match: Match::All,
            max_options: MAX_OPTIONS,
        }
    }
}
