//! formgate - Serialized request pipeline for form-token services
//!
//! An automation client core for text-based web services that authenticate
//! via rotating session tokens embedded in HTML forms rather than a
//! structured API. The crate provides the request orchestration layer:
//!
//! - **Request serialization**: at most one mutating request in flight at a
//!   time, with a deliberate fail-fast policy for simultaneous attempts
//! - **Token rotation**: the session token pair is extracted from every page
//!   and re-injected into every request
//! - **Response classification**: success, transport failure, authentication
//!   failure, and bot-challenge failure, derived from body markers
//!
//! Per-action handlers live outside this crate and consume exactly two
//! primitives: [`Pipeline::send_raw`] and [`Pipeline::send_page`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use formgate::{Pipeline, Settings};
//!
//! # async fn example() -> formgate::Result<()> {
//! let mut settings = Settings::default();
//! settings.service.user = "testlandia".to_string();
//!
//! let pipeline = Pipeline::with_immediate_readiness(settings)?;
//! let body = pipeline
//!     .send_page("page=settings", &[("update".to_string(), "1".to_string())])
//!     .await?;
//! assert!(body.contains("Your settings have been updated"));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod types;
pub mod utils;

pub use config::{ConfigLoader, Settings};
pub use error::{Error, Result};
pub use session::{
    Classification, ImmediateReadiness, ManualReadiness, PacedReadiness, Pipeline,
    ReadinessSource, RequestGate, ResponseClassifier, SessionTokenStore, SessionTokens,
};
pub use types::{RawExchange, RequestOptions};
