//! Request type definitions
//!
//! Per-call options for the raw pipeline primitive. Constructed per call,
//! immutable once built, discarded after the exchange.

/// Ordered form fields for one outgoing request
pub type FormFields = Vec<(String, String)>;

/// Options for one `send_raw` call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Follow HTTP redirects (default true).
    ///
    /// Raw mode disables this to inspect the redirect target URL itself; some
    /// endpoints signal success only via the resulting URL, not body text.
    pub follow_redirects: bool,
    /// Keep the gate held when `send_raw` returns (default false).
    ///
    /// The caller receives the live guard inside the exchange result and
    /// releases it by dropping.
    pub defer_gate_release: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            follow_redirects: true,
            defer_gate_release: false,
        }
    }
}

impl RequestOptions {
    /// Create options with the defaults (redirects on, release on completion)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set redirect following
    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Defer gate release to the caller
    pub fn with_defer_gate_release(mut self, defer: bool) -> Self {
        self.defer_gate_release = defer;
        self
    }
}

/// Parse `key=value` strings into ordered form fields.
///
/// Used by CLI callers; the value may itself contain `=`.
pub fn parse_form_fields(raw: &[String]) -> Result<FormFields, String> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| format!("invalid field '{}', expected key=value", pair))
        })
        .collect()
}
