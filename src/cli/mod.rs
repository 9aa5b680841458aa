//! Command-line interface
//!
//! Thin caller layer over the pipeline; all orchestration logic lives in
//! [`crate::session`].

pub mod send;

pub use send::{SendArgs, run_send_mode};
