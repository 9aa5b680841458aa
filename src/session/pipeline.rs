//! Transport pipeline
//!
//! Composes the gate, token store, and classifier into the two primitives
//! per-action handlers consume: [`Pipeline::send_raw`] and
//! [`Pipeline::send_page`].
//!
//! One `send_page` call moves through: gate check (fail fast if held) →
//! readiness wait → request build (query params + form body with tokens
//! injected) → POST with cookies → full body consumption → token update →
//! classification → gate release. The gate is released on every exit path;
//! a guard drop covers the error paths.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, cookie::Jar, redirect::Policy};
use tracing::{debug, warn};
use url::Url;

use crate::{
    Error, Result,
    config::Settings,
    session::{
        classify::{Classification, ResponseClassifier},
        gate::{ReadinessSource, RequestGate},
        tokens::{SessionTokenStore, SessionTokens},
    },
    types::{FormFields, RawExchange, RequestOptions},
};

/// Paths with this suffix are legacy-style endpoints that reject the page
/// decoration directive.
const LEGACY_SUFFIX: &str = ".cgi";

/// Whether a target path is a legacy-style endpoint (suffix-based detection)
pub fn is_legacy_path(path: &str) -> bool {
    path.ends_with(LEGACY_SUFFIX)
}

/// The request orchestration pipeline.
///
/// Owns the only mutable shared state in the core: the gate flag and the
/// token pair. External handler code never writes either directly.
#[derive(Debug)]
pub struct Pipeline {
    /// Configuration settings
    settings: Arc<Settings>,
    /// HTTP client that follows redirects
    redirecting: Client,
    /// HTTP client that does not follow redirects.
    ///
    /// reqwest fixes redirect policy per client, so raw mode gets its own
    /// client; both share one cookie jar.
    direct: Client,
    /// Mutual-exclusion gate with injected readiness source
    gate: Arc<RequestGate>,
    /// Rotating session token pair
    tokens: SessionTokenStore,
    /// Body marker classifier
    classifier: ResponseClassifier,
    /// Last issued userclick timestamp, kept strictly increasing
    userclick: AtomicI64,
}

impl Pipeline {
    /// Create a pipeline with the given settings and readiness source
    pub fn new(settings: Settings, readiness: Arc<dyn ReadinessSource>) -> Result<Self> {
        settings.validate()?;

        let jar = Arc::new(Jar::default());
        let redirecting = Self::client_builder(&settings, &jar).build()?;
        let direct = Self::client_builder(&settings, &jar)
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            settings: Arc::new(settings),
            redirecting,
            direct,
            gate: Arc::new(RequestGate::new(readiness)),
            tokens: SessionTokenStore::default(),
            classifier: ResponseClassifier::new(),
            userclick: AtomicI64::new(Utc::now().timestamp_millis()),
        })
    }

    /// Create a pipeline that never suspends on readiness
    pub fn with_immediate_readiness(settings: Settings) -> Result<Self> {
        Self::new(
            settings,
            Arc::new(crate::session::gate::ImmediateReadiness),
        )
    }

    fn client_builder(settings: &Settings, jar: &Arc<Jar>) -> reqwest::ClientBuilder {
        Client::builder()
            .user_agent(&settings.network.user_agent)
            .connect_timeout(Duration::from_secs(settings.network.connect_timeout))
            .timeout(Duration::from_secs(settings.network.request_timeout))
            .cookie_provider(Arc::clone(jar))
    }

    /// The gate guarding this pipeline
    pub fn gate(&self) -> &Arc<RequestGate> {
        &self.gate
    }

    /// The session token store owned by this pipeline (read-only to callers)
    pub fn token_store(&self) -> &SessionTokenStore {
        &self.tokens
    }

    /// The active settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Perform one raw exchange.
    ///
    /// Acquires the gate (failing fast with [`Error::Concurrency`] when
    /// held), waits for readiness, POSTs the form with the current token pair
    /// injected ahead of caller fields, consumes the body fully, and releases
    /// the gate before returning unless `defer_gate_release` is set. Every
    /// exit path releases the gate; errors release it via guard drop.
    pub async fn send_raw(
        &self,
        path: &str,
        fields: &[(String, String)],
        options: RequestOptions,
    ) -> Result<RawExchange> {
        let guard = self.gate.try_acquire().ok_or(Error::Concurrency)?;
        self.gate.wait_ready().await;

        let url = self.build_url(path)?;
        let tokens = self.tokens.current().await;
        let form = build_form(&tokens, fields);

        let client = if options.follow_redirects {
            &self.redirecting
        } else {
            &self.direct
        };

        debug!(
            %url,
            follow_redirects = options.follow_redirects,
            fields = fields.len(),
            "dispatching request"
        );

        let response = client.post(url).form(&form).send().await?;
        let status = response.status();
        let final_url = response.url().clone();
        let redirect_target = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        // Body fully consumed; the operation's side effects have settled from
        // the caller's perspective, so the gate may open.
        let kept_guard = if options.defer_gate_release {
            Some(guard)
        } else {
            drop(guard);
            None
        };

        Ok(RawExchange::new(
            status,
            final_url,
            body,
            redirect_target,
            kept_guard,
        ))
    }

    /// Perform one page exchange and classify the outcome.
    ///
    /// Redirect following is forced on. The token store is updated from the
    /// response document before the gate is released, so a caller's next
    /// `send_page` observes the fresh pair. Returns the decoded body text on
    /// [`Classification::Success`]; every other classification maps to its
    /// error variant.
    pub async fn send_page(&self, path: &str, fields: &[(String, String)]) -> Result<String> {
        let options = RequestOptions::new()
            .with_follow_redirects(true)
            .with_defer_gate_release(true);
        let mut raw = self.send_raw(path, fields, options).await?;

        let body = raw.text().to_string();
        self.tokens.update_from_page(&body).await;
        let classification = self.classifier.classify(raw.status(), &body);
        raw.release_gate();

        match classification {
            Classification::Success => Ok(body),
            Classification::TransportFailure => {
                let status = raw.status().as_u16();
                warn!(status, "page request failed in transport");
                Err(Error::transport(status))
            }
            Classification::AuthenticationFailure => {
                warn!("service rejected the session token pair");
                Err(Error::Authentication)
            }
            Classification::ChallengeRequired => {
                warn!("service served a bot-verification page");
                Err(Error::Challenge)
            }
        }
    }

    /// Build the target URL with the always-present query parameters
    fn build_url(&self, path: &str) -> Result<Url> {
        let base = Url::parse(self.settings.service.base_url())?;
        let mut url = base.join(path)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("userclick", &self.next_userclick().to_string());
            query.append_pair("script", &self.settings.service.script_ident());
            if !is_legacy_path(path) {
                query.append_pair("template-overall", "none");
            }
        }
        Ok(url)
    }

    /// Next strictly increasing client-side timestamp.
    ///
    /// Seeded from wall-clock milliseconds; two dispatches in the same
    /// millisecond still get distinct increasing values.
    fn next_userclick(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .userclick
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(prev.saturating_add(1).max(now))
            })
            .unwrap_or(now);
        prev.saturating_add(1).max(now)
    }
}

/// Assemble the form body: tokens first, then caller fields.
///
/// Token-first order keeps caller-supplied values from silently overriding
/// stale tokens and pins the wire layout for golden tests.
fn build_form(tokens: &SessionTokens, fields: &[(String, String)]) -> FormFields {
    let mut form = tokens.form_fields();
    form.extend(fields.iter().cloned());
    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_pipeline() -> Pipeline {
        let mut settings = Settings::default();
        settings.service.user = "testlandia".to_string();
        Pipeline::with_immediate_readiness(settings).unwrap()
    }

    #[test]
    fn test_legacy_path_detection() {
        assert!(is_legacy_path("cgi-bin/api.cgi"));
        assert!(!is_legacy_path("page=settings"));
        assert!(!is_legacy_path("cgi-bin/api"));
    }

    #[test]
    fn test_build_url_standard_path() {
        let pipeline = test_pipeline();
        let url = pipeline.build_url("page=settings").unwrap();

        assert_eq!(url.host_str(), Some("www.nationstates.net"));
        assert_eq!(url.path(), "/page=settings");

        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(query[0].0, "userclick");
        assert_eq!(query[1].0, "script");
        assert!(query[1].1.contains("in use by testlandia"));
        assert_eq!(
            query[2],
            ("template-overall".to_string(), "none".to_string())
        );
    }

    #[test]
    fn test_build_url_legacy_path_skips_decoration_directive() {
        let pipeline = test_pipeline();
        let url = pipeline.build_url("cgi-bin/api.cgi").unwrap();

        assert!(!url.query().unwrap().contains("template-overall"));
        assert!(url.query().unwrap().contains("userclick"));
    }

    #[test]
    fn test_userclick_strictly_increasing() {
        let pipeline = test_pipeline();
        let a = pipeline.next_userclick();
        let b = pipeline.next_userclick();
        let c = pipeline.next_userclick();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_form_injects_tokens_ahead_of_caller_fields() {
        let tokens = SessionTokens::new().with_chk("c1").with_localid("l1");
        let fields = vec![
            ("action".to_string(), "move".to_string()),
            ("chk".to_string(), "caller-supplied".to_string()),
        ];

        let form = build_form(&tokens, &fields);
        assert_eq!(
            form,
            vec![
                ("chk".to_string(), "c1".to_string()),
                ("localid".to_string(), "l1".to_string()),
                ("action".to_string(), "move".to_string()),
                ("chk".to_string(), "caller-supplied".to_string()),
            ]
        );
    }

    #[test]
    fn test_form_with_empty_store_carries_only_caller_fields() {
        let form = build_form(
            &SessionTokens::new(),
            &[("a".to_string(), "1".to_string())],
        );
        assert_eq!(form, vec![("a".to_string(), "1".to_string())]);
    }

    #[tokio::test]
    async fn test_concurrency_error_when_gate_held() {
        let pipeline = test_pipeline();
        let _guard = pipeline.gate().try_acquire().unwrap();

        let result = pipeline
            .send_raw("page=settings", &[], RequestOptions::new())
            .await;
        assert!(matches!(result, Err(Error::Concurrency)));

        // The loser never touched the gate
        assert!(pipeline.gate().is_in_flight());
    }
}
