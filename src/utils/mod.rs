//! Utility functions and helpers
//!
//! This module contains utility functions used throughout the application.

pub mod store;
pub mod version;

pub use store::{TokenFile, get_token_path};
pub use version::VERSION;
