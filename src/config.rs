use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_per_source_limit")]
    pub per_source_limit: usize,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_cache_ttl_seconds() -> u64 {
    300
}

fn default_cache_capacity() -> usize {
    512
}

fn default_per_source_limit() -> usize {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            cache_capacity: default_cache_capacity(),
            per_source_limit: default_per_source_limit(),
        }
    }
}

/// Loads configuration from a JSON file; a missing file falls back to the
/// built-in defaults.
pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8000");
        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.cache_capacity, 512);
        assert_eq!(config.per_source_limit, 30);
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"cache_ttl_seconds": 60, "per_source_limit": 10}"#).unwrap();
        assert_eq!(config.cache_ttl_seconds, 60);
        assert_eq!(config.per_source_limit, 10);
        assert_eq!(config.cache_capacity, 512);
    }
}
