//! Response classification
//!
//! The service has no structured responses: outcomes are recognized by
//! substring markers in the page body. The marker literals live only here so
//! a compatibility update touches nothing else.
//!
//! Precedence is fixed. Transport failure is checked before any body
//! inspection (a failed status may carry no usable body), and the
//! authentication marker is checked before the challenge marker: some failure
//! pages legitimately contain both triggers in footer boilerplate.

use reqwest::StatusCode;

/// Body marker for a rejected security token
pub const AUTH_REJECTED_MARKER: &str = "Failed security check";

/// Body marker for a bot-verification page
pub const CHALLENGE_MARKER: &str = "you appear to be an automated device";

/// The four-way outcome of one completed exchange.
///
/// Exactly one value per exchange, derived deterministically from the raw
/// result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// 2xx response with neither failure marker present
    Success,
    /// Body carries the authentication-rejection marker
    AuthenticationFailure,
    /// Body carries the bot-challenge marker
    ChallengeRequired,
    /// Non-2xx HTTP status
    TransportFailure,
}

/// Classifier holding the marker substrings.
///
/// Matching is case-sensitive, mirroring the service's own output.
#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    auth_marker: &'static str,
    challenge_marker: &'static str,
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self {
            auth_marker: AUTH_REJECTED_MARKER,
            challenge_marker: CHALLENGE_MARKER,
        }
    }
}

impl ResponseClassifier {
    /// Create a classifier with the production marker strings
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the classification for one completed exchange
    pub fn classify(&self, status: StatusCode, body: &str) -> Classification {
        if !status.is_success() {
            return Classification::TransportFailure;
        }
        if body.contains(self.auth_marker) {
            return Classification::AuthenticationFailure;
        }
        if body.contains(self.challenge_marker) {
            return Classification::ChallengeRequired;
        }
        Classification::Success
    }
}
