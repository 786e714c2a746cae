use std::{fs, path::Path};

use serde::Deserialize;

/// Connector settings handed in by the embedding host.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Mollie API base url, overridable for tests
    pub base_url: String,
    /// user agent sent with every request
    pub user_agent: String,
    /// request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://api.mollie.com".to_string(),
            user_agent: format!("mollieflow/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: 30_000,
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Self {
        let data = fs::read_to_string(path.as_ref()).expect(&format!("failed to load config file {:?}", path.as_ref()));

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Self {
        let config = toml::from_str::<Config>(toml_str).expect("failed to parse the toml str");
        config
    }
}
