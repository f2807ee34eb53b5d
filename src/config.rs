//! Environment-driven configuration, merged with [`figment`] the same way
//! `banner::app::App::new` builds its `Config`.

use serde::Deserialize;

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

/// Default wall-clock search budget in seconds (§4.5 -- 90s).
fn default_search_deadline_secs() -> u64 {
    90
}

/// Default `K` when a request doesn't specify one (§6).
fn default_k() -> usize {
    10
}

/// Hard ceiling on the `K` a caller may request, so a single request can't
/// force an unbounded top-K buffer.
fn default_max_k() -> usize {
    50
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_search_deadline_secs")]
    pub search_deadline_secs: u64,
    #[serde(default = "default_k")]
    pub default_k: usize,
    #[serde(default = "default_max_k")]
    pub max_k: usize,
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: default_log_level(),
            search_deadline_secs: default_search_deadline_secs(),
            default_k: default_k(),
            max_k: default_max_k(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl Config {
    pub fn search_deadline(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.search_deadline_secs)
    }

    pub fn shutdown_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.shutdown_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_values() {
        let config = Config::default();
        assert_eq!(config.default_k, 10);
        assert_eq!(config.search_deadline_secs, 90);
    }
}
