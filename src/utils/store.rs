//! On-disk persistence for the session token pair
//!
//! Persists exactly the two token strings as JSON, following the XDG Base
//! Directory Specification. Nothing else belongs in this store. A missing or
//! malformed file degrades to an empty pair so a fresh session can start.

use crate::{Result, session::tokens::SessionTokens};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};

/// File-backed store for the token pair
#[derive(Debug)]
pub struct TokenFile {
    /// Path to the token file
    path: PathBuf,
}

impl TokenFile {
    /// Create a token file handle at the given path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the persisted pair.
    ///
    /// A missing or unreadable file yields an empty pair; a malformed file is
    /// logged and likewise yields an empty pair.
    pub async fn load(&self) -> SessionTokens {
        if !self.path.exists() {
            debug!("Token file does not exist: {:?}", self.path);
            return SessionTokens::default();
        }

        match fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(tokens) => {
                    debug!("Loaded session tokens from {:?}", self.path);
                    tokens
                }
                Err(e) => {
                    warn!("Error parsing token file {:?}: {}", self.path, e);
                    SessionTokens::default()
                }
            },
            Err(e) => {
                warn!("Failed to read token file {:?}: {}", self.path, e);
                SessionTokens::default()
            }
        }
    }

    /// Save the pair, creating parent directories as needed
    pub async fn save(&self, tokens: &SessionTokens) -> Result<()> {
        let content = serde_json::to_string_pretty(tokens)?;

        if let Some(parent) = self.path.parent()
            && let Err(e) = fs::create_dir_all(parent).await
        {
            return Err(crate::Error::token_store(
                "directory_creation".to_string(),
                format!("Directory creation failed: {}", e),
            ));
        }

        match fs::write(&self.path, content).await {
            Ok(_) => {
                debug!("Session tokens saved to {:?}", self.path);
                Ok(())
            }
            Err(e) => Err(crate::Error::token_store(
                "file_write".to_string(),
                format!("Write failed: {}", e),
            )),
        }
    }
}

/// Get the token file path following the XDG Base Directory Specification
pub fn get_token_path() -> anyhow::Result<PathBuf> {
    let cache_dir = if let Ok(xdg_cache) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg_cache).join("formgate")
    } else if let Some(home_dir) = dirs::home_dir() {
        home_dir.join(".cache").join("formgate")
    } else {
        // Fallback to current directory if home is not available
        warn!("Could not determine home directory, using current directory for tokens");
        std::env::current_dir()?.join(".cache")
    };

    Ok(cache_dir.join("tokens.json"))
}
