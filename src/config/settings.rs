//! Configuration settings
//!
//! Settings for the request pipeline: service host selection, client
//! identification, network timeouts, dispatch pacing, and logging.

use serde::{Deserialize, Serialize};

// Helper functions for serde defaults
fn default_primary_url() -> String {
    "https://www.nationstates.net".to_string()
}

fn default_mirror_url() -> String {
    "https://fast.nationstates.net".to_string()
}

fn default_script_name() -> String {
    "formgate".to_string()
}

fn default_script_author() -> String {
    "formgate project".to_string()
}

fn default_user_agent() -> String {
    format!("formgate/{}", env!("CARGO_PKG_VERSION"))
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    60
}

fn default_min_interval_ms() -> u64 {
    6000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration settings for the pipeline
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceSettings,
    /// Network configuration
    #[serde(default)]
    pub network: NetworkSettings,
    /// Dispatch pacing configuration
    #[serde(default)]
    pub pacing: PacingSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Remote service and client identification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Primary service host
    #[serde(default = "default_primary_url")]
    pub primary_url: String,
    /// Mirror service host
    #[serde(default = "default_mirror_url")]
    pub mirror_url: String,
    /// Use the mirror host instead of the primary
    #[serde(default)]
    pub use_mirror: bool,
    /// Override both known hosts (used by tests and self-hosted instances)
    #[serde(default)]
    pub custom_url: Option<String>,
    /// Script name sent in the identification string
    #[serde(default = "default_script_name")]
    pub script_name: String,
    /// Script author sent in the identification string
    #[serde(default = "default_script_author")]
    pub script_author: String,
    /// Name of the user on whose behalf requests are made
    #[serde(default)]
    pub user: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            primary_url: default_primary_url(),
            mirror_url: default_mirror_url(),
            use_mirror: false,
            custom_url: None,
            script_name: default_script_name(),
            script_author: default_script_author(),
            user: String::new(),
        }
    }
}

impl ServiceSettings {
    /// The base URL all requests target.
    ///
    /// Selected at construction time, never per call.
    pub fn base_url(&self) -> &str {
        if let Some(custom) = &self.custom_url {
            custom
        } else if self.use_mirror {
            &self.mirror_url
        } else {
            &self.primary_url
        }
    }

    /// Client identification string: name/version/author/current user
    pub fn script_ident(&self) -> String {
        format!(
            "{}/{} (by {}; in use by {})",
            self.script_name,
            crate::utils::VERSION,
            self.script_author,
            self.user
        )
    }
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// User agent header for all requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Full request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Dispatch pacing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingSettings {
    /// Minimum interval between dispatched requests in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

impl Settings {
    /// Validate field values that serde cannot check
    pub fn validate(&self) -> crate::Result<()> {
        url::Url::parse(self.service.base_url())
            .map_err(|e| crate::Error::config("service.base_url".to_string(), e.to_string()))?;
        if self.network.request_timeout == 0 {
            return Err(crate::Error::config(
                "network.request_timeout",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
