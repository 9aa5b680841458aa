//! Type definitions for the request pipeline
//!
//! This module contains the value types passed across the pipeline boundary.

pub mod request;
pub mod response;

pub use request::{FormFields, RequestOptions, parse_form_fields};
pub use response::RawExchange;
