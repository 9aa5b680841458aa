//! Rotating session token storage
//!
//! The service proves session continuity with two rotating values embedded as
//! hidden form inputs on most pages. The store always holds the most recently
//! observed pair; there is no rollback or versioning. Only the pipeline writes
//! it, and only after a page fetch.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

/// Form field name carrying the security check value
pub const CHK_FIELD: &str = "chk";

/// Form field name carrying the session-local identifier
pub const LOCALID_FIELD: &str = "localid";

/// The rotating session token pair.
///
/// Both values are opaque strings scoped to the current authenticated
/// session. Either may be absent when no prior exchange has observed it;
/// absent fields are omitted from the wire rather than sent empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    /// Security check value (`chk`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chk: Option<String>,
    /// Session-local identifier (`localid`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localid: Option<String>,
}

impl SessionTokens {
    /// Create an empty pair
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the security check value
    pub fn with_chk(mut self, chk: impl Into<String>) -> Self {
        self.chk = Some(chk.into());
        self
    }

    /// Set the session-local identifier
    pub fn with_localid(mut self, localid: impl Into<String>) -> Self {
        self.localid = Some(localid.into());
        self
    }

    /// True when neither value has been observed yet
    pub fn is_empty(&self) -> bool {
        self.chk.is_none() && self.localid.is_none()
    }

    /// Render the known values as ordered form fields, omitting absent ones
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(2);
        if let Some(chk) = &self.chk {
            fields.push((CHK_FIELD.to_string(), chk.clone()));
        }
        if let Some(localid) = &self.localid {
            fields.push((LOCALID_FIELD.to_string(), localid.clone()));
        }
        fields
    }
}

/// Extract the token pair from a page body.
///
/// Looks for hidden `<input>` elements named `chk` and `localid`. Pages that
/// carry neither yield an empty pair.
pub fn extract_tokens(body: &str) -> SessionTokens {
    let document = Html::parse_document(body);
    SessionTokens {
        chk: input_value(&document, CHK_FIELD),
        localid: input_value(&document, LOCALID_FIELD),
    }
}

fn input_value(document: &Html, name: &str) -> Option<String> {
    // Static selector over a constant field name cannot fail to parse
    let selector = Selector::parse(&format!(r#"input[name="{}"]"#, name))
        .expect("token input selector is valid CSS");
    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
}

/// Durable holder of the latest token pair.
///
/// Reads are non-blocking snapshots; updates overwrite only the fields a page
/// actually carried, so token-free pages silently keep the previous values.
#[derive(Debug, Default)]
pub struct SessionTokenStore {
    tokens: RwLock<SessionTokens>,
}

impl SessionTokenStore {
    /// Create a store seeded with the given pair
    pub fn new(initial: SessionTokens) -> Self {
        Self {
            tokens: RwLock::new(initial),
        }
    }

    /// Snapshot of the latest known pair
    pub async fn current(&self) -> SessionTokens {
        self.tokens.read().await.clone()
    }

    /// Replace the stored pair wholesale (used when loading persisted state)
    pub async fn replace(&self, tokens: SessionTokens) {
        *self.tokens.write().await = tokens;
    }

    /// Extract fresh tokens from a page body and overwrite the present fields.
    ///
    /// Extraction failure is silent: not every page contains fresh tokens, and
    /// the store simply keeps the previous values.
    pub async fn update_from_page(&self, body: &str) {
        let extracted = extract_tokens(body);
        if extracted.is_empty() {
            debug!("page carried no session tokens, keeping previous values");
            return;
        }

        let mut tokens = self.tokens.write().await;
        if extracted.chk.is_some() {
            tokens.chk = extracted.chk;
        }
        if extracted.localid.is_some() {
            tokens.localid = extracted.localid;
        }
        debug!(
            has_chk = tokens.chk.is_some(),
            has_localid = tokens.localid.is_some(),
            "session tokens updated from page"
        );
    }
}
