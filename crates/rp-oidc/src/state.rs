//! Flow state: the per-flow secrets issued when an authorization request is
//! built, retrieved exactly once when the response comes back.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng as _;
use tokio::sync::Mutex;

use crate::config::OauthClientConfig;
use crate::error::{AuthenticationFailure, FlowResult};
use crate::response::AuthorizationResponse;

/// Secrets bound to one in-flight authorization flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowState {
    /// The anti-forgery `state` value sent on the authorization request.
    pub state: Option<String>,

    /// The `nonce` value sent on the authorization request, to be echoed in
    /// the identity token.
    pub nonce: Option<String>,

    /// The PKCE `code_verifier`, sent with the code exchange when present.
    pub pkce_verifier: Option<String>,
}

impl FlowState {
    /// Creates an empty flow state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: None,
            nonce: None,
            pkce_verifier: None,
        }
    }

    /// Creates a flow state with freshly generated `state` and `nonce` values.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            state: Some(random_token()),
            nonce: Some(random_token()),
            pkce_verifier: None,
        }
    }

    /// Sets the anti-forgery state value.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the nonce value.
    #[must_use]
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Sets the PKCE code verifier.
    #[must_use]
    pub fn with_pkce_verifier(mut self, verifier: impl Into<String>) -> Self {
        self.pkce_verifier = Some(verifier.into());
        self
    }
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a URL-safe random value suitable for `state` or `nonce`.
#[must_use]
pub fn random_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Verifies the returned `state` against the value issued for this flow.
///
/// Comparison is exact and case-sensitive. When the configuration disables
/// state validation the check passes unconditionally.
///
/// # Errors
///
/// Returns [`AuthenticationFailure::StateMissing`] when validation is enabled
/// and either side lacks a state value, and
/// [`AuthenticationFailure::StateMismatch`] when the values differ.
pub fn verify_state(
    config: &OauthClientConfig,
    response: &AuthorizationResponse,
    flow_state: &FlowState,
) -> FlowResult<()> {
    if !config.require_state {
        return Ok(());
    }

    match (flow_state.state.as_deref(), response.state.as_deref()) {
        (Some(expected), Some(returned)) => {
            if expected == returned {
                Ok(())
            } else {
                Err(AuthenticationFailure::StateMismatch)
            }
        }
        _ => Err(AuthenticationFailure::StateMissing),
    }
}

/// Storage for in-flight flow state, keyed by request context.
///
/// `take` retrieves and invalidates in one step so a flow key cannot be
/// replayed against a second authorization response.
#[async_trait]
pub trait FlowStateStore: Send + Sync {
    /// Persists the flow state for a key, replacing any existing entry.
    async fn put(&self, flow_key: &str, flow_state: FlowState);

    /// Removes and returns the flow state for a key.
    async fn take(&self, flow_key: &str) -> Option<FlowState>;
}

/// In-process flow state store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct InMemoryFlowStateStore {
    entries: Mutex<HashMap<String, FlowState>>,
}

impl InMemoryFlowStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlowStateStore for InMemoryFlowStateStore {
    async fn put(&self, flow_key: &str, flow_state: FlowState) {
        self.entries
            .lock()
            .await
            .insert(flow_key.to_string(), flow_state);
    }

    async fn take(&self, flow_key: &str) -> Option<FlowState> {
        self.entries.lock().await.remove(flow_key)
    }
}
