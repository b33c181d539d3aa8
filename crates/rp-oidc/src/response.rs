//! Wire types for the authorization response and token exchange.

use serde::{Deserialize, Serialize};

/// The inbound redirect-back data from the identity provider.
///
/// Created by the controller layer that receives the redirect; owned by one
/// pipeline invocation for its duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResponse {
    /// The authorization code to exchange.
    pub code: String,

    /// The `state` value returned by the provider, if any.
    pub state: Option<String>,

    /// Key identifying the originating request context (session), used to
    /// retrieve the flow state persisted when the flow was initiated.
    pub flow_key: String,
}

impl AuthorizationResponse {
    /// Creates an authorization response without a returned state.
    #[must_use]
    pub fn new(code: impl Into<String>, flow_key: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            state: None,
            flow_key: flow_key.into(),
        }
    }

    /// Sets the returned `state` value.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

/// Raw token endpoint response (RFC 6749 §5.1, OIDC Core §3.1.3.3).
///
/// Immutable; scoped to one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The access token.
    pub access_token: String,

    /// Token type (normally "Bearer").
    pub token_type: String,

    /// Access token lifetime in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    /// Refresh token, if issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Signed identity token, if the `openid` scope was granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    /// Granted scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// OAuth 2.0 error response body returned by the token endpoint (RFC 6749 §5.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderErrorResponse {
    /// Error code.
    pub error: String,

    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    /// URI with more information about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<String>,
}
