//! Relying-party client configuration.

use std::time::Duration;

/// Configuration for one OAuth2/OIDC client registration.
///
/// Read-only for the duration of a flow; construct once per provider and
/// share across invocations.
#[derive(Debug, Clone)]
pub struct OauthClientConfig {
    /// Name identifying the provider in authentication results.
    pub provider_name: String,

    /// OAuth2 `client_id`.
    pub client_id: String,

    /// Client authentication used at the token endpoint.
    pub client_auth: ClientAuth,

    /// The redirect URI used during the authorization request.
    pub redirect_uri: String,

    /// Whether the anti-forgery `state` parameter is validated.
    ///
    /// Disabling this is an explicit opt-out of CSRF protection on the
    /// redirect endpoint, never a silent default.
    pub require_state: bool,

    /// Allowance in seconds for clock differences when checking `exp`/`iat`.
    pub clock_skew_seconds: i64,

    /// Audience the identity token must contain. Defaults to the client id.
    pub required_audience: Option<String>,

    /// Timeout for the token-endpoint exchange.
    pub token_endpoint_timeout: Duration,
}

impl OauthClientConfig {
    /// Default clock-skew allowance in seconds.
    pub const DEFAULT_CLOCK_SKEW_SECONDS: i64 = 60;

    /// Default token-endpoint timeout.
    pub const DEFAULT_TOKEN_ENDPOINT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a configuration for a public client with state validation on.
    #[must_use]
    pub fn new(
        provider_name: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            client_id: client_id.into(),
            client_auth: ClientAuth::None,
            redirect_uri: redirect_uri.into(),
            require_state: true,
            clock_skew_seconds: Self::DEFAULT_CLOCK_SKEW_SECONDS,
            required_audience: None,
            token_endpoint_timeout: Self::DEFAULT_TOKEN_ENDPOINT_TIMEOUT,
        }
    }

    /// Authenticates to the token endpoint with HTTP basic authentication.
    #[must_use]
    pub fn with_client_secret_basic(mut self, secret: impl Into<String>) -> Self {
        self.client_auth = ClientAuth::SecretBasic(secret.into());
        self
    }

    /// Authenticates to the token endpoint with the secret in the form body.
    #[must_use]
    pub fn with_client_secret_post(mut self, secret: impl Into<String>) -> Self {
        self.client_auth = ClientAuth::SecretPost(secret.into());
        self
    }

    /// Sets whether the `state` parameter is validated.
    #[must_use]
    pub const fn with_require_state(mut self, require_state: bool) -> Self {
        self.require_state = require_state;
        self
    }

    /// Sets the clock-skew allowance in seconds.
    #[must_use]
    pub const fn with_clock_skew_seconds(mut self, seconds: i64) -> Self {
        self.clock_skew_seconds = seconds;
        self
    }

    /// Requires a specific audience instead of the client id.
    #[must_use]
    pub fn with_required_audience(mut self, audience: impl Into<String>) -> Self {
        self.required_audience = Some(audience.into());
        self
    }

    /// Sets the token-endpoint timeout.
    #[must_use]
    pub const fn with_token_endpoint_timeout(mut self, timeout: Duration) -> Self {
        self.token_endpoint_timeout = timeout;
        self
    }

    /// Returns the audience the identity token must contain.
    #[must_use]
    pub fn audience(&self) -> &str {
        self.required_audience.as_deref().unwrap_or(&self.client_id)
    }
}

/// Client authentication material for the token endpoint.
#[derive(Clone)]
pub enum ClientAuth {
    /// Public client: no client authentication beyond `client_id`.
    None,

    /// Confidential client, secret sent via HTTP basic authentication.
    SecretBasic(String),

    /// Confidential client, secret sent in the request body.
    SecretPost(String),
}

impl std::fmt::Debug for ClientAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::SecretBasic(_) => f.write_str("SecretBasic([REDACTED])"),
            Self::SecretPost(_) => f.write_str("SecretPost([REDACTED])"),
        }
    }
}
