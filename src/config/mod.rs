//! Configuration management for the pipeline
//!
//! This module handles loading and managing configuration settings.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::Settings;
