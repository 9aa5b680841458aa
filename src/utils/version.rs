//! Version information utilities
//!
//! Provides version information for the application; the pipeline embeds it
//! in the client identification string on every request.

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
