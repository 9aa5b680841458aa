//! Response type definitions
//!
//! The raw exchange result returned by `send_raw`. The body is always fully
//! consumed before construction, so holding a `RawExchange` never pins a live
//! connection.

use reqwest::StatusCode;
use url::Url;

use crate::session::gate::GateGuard;

/// Result of one raw network exchange.
///
/// When the call deferred gate release, the exchange owns the live guard and
/// the gate stays held until this value is dropped (or the guard is released
/// explicitly). Otherwise the gate was released before `send_raw` returned.
#[derive(Debug)]
pub struct RawExchange {
    status: StatusCode,
    final_url: Url,
    body: String,
    redirect_target: Option<String>,
    guard: Option<GateGuard>,
}

impl RawExchange {
    /// Assemble an exchange result from a consumed response
    pub(crate) fn new(
        status: StatusCode,
        final_url: Url,
        body: String,
        redirect_target: Option<String>,
        guard: Option<GateGuard>,
    ) -> Self {
        Self {
            status,
            final_url,
            body,
            redirect_target,
            guard,
        }
    }

    /// HTTP status of the final response
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// URL of the final response after any redirects.
    ///
    /// With redirect following disabled this is the requested URL; the
    /// target of an unfollowed redirect is exposed separately via
    /// [`RawExchange::redirect_target`].
    pub fn final_url(&self) -> &Url {
        &self.final_url
    }

    /// Target of an unfollowed redirect, taken from the `Location` header.
    ///
    /// `None` when the final response was not a redirect, or when redirect
    /// following was enabled and the client already chased it. May be
    /// relative; resolve against [`RawExchange::final_url`] if needed.
    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect_target.as_deref()
    }

    /// Decoded body text
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Body bytes
    pub fn bytes(&self) -> &[u8] {
        self.body.as_bytes()
    }

    /// Release a deferred gate early; no-op when the gate was already
    /// released on completion.
    pub fn release_gate(&mut self) {
        self.guard.take();
    }

    /// Whether this exchange still holds the gate
    pub fn holds_gate(&self) -> bool {
        self.guard.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let exchange = RawExchange::new(
            StatusCode::OK,
            Url::parse("https://service.test/page=x").unwrap(),
            "body text".to_string(),
            None,
            None,
        );

        assert_eq!(exchange.status(), StatusCode::OK);
        assert_eq!(exchange.final_url().path(), "/page=x");
        assert_eq!(exchange.text(), "body text");
        assert_eq!(exchange.bytes(), b"body text");
        assert_eq!(exchange.redirect_target(), None);
        assert!(!exchange.holds_gate());
    }

    #[test]
    fn test_redirect_target_carried_for_unfollowed_redirect() {
        let exchange = RawExchange::new(
            StatusCode::FOUND,
            Url::parse("https://service.test/page=login").unwrap(),
            String::new(),
            Some("/nation=testlandia".to_string()),
            None,
        );

        assert!(exchange.status().is_redirection());
        assert_eq!(exchange.redirect_target(), Some("/nation=testlandia"));
    }

    #[test]
    fn test_release_gate_without_guard_is_noop() {
        let mut exchange = RawExchange::new(
            StatusCode::OK,
            Url::parse("https://service.test/").unwrap(),
            String::new(),
            None,
            None,
        );
        exchange.release_gate();
        assert!(!exchange.holds_gate());
    }
}
