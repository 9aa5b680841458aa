//! Request orchestration core
//!
//! This module holds the pipeline and its collaborators: the mutual-exclusion
//! gate with its readiness sources, the rotating session token store, and the
//! body-marker response classifier.

pub mod classify;
pub mod gate;
pub mod pipeline;
pub mod tokens;

pub use classify::{Classification, ResponseClassifier};
pub use gate::{
    GateGuard, ImmediateReadiness, ManualReadiness, PacedReadiness, ReadinessSource, RequestGate,
};
pub use pipeline::{Pipeline, is_legacy_path};
pub use tokens::{SessionTokenStore, SessionTokens, extract_tokens};
