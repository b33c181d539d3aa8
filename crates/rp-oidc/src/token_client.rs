//! Token endpoint client: exchanges an authorization code for tokens.

use std::time::Duration;

use tracing::debug;

use crate::config::{ClientAuth, OauthClientConfig};
use crate::error::{AuthenticationFailure, FlowResult};
use crate::metadata::ProviderMetadata;
use crate::response::{ProviderErrorResponse, TokenResponse};
use crate::state::FlowState;

/// One code-exchange request, borrowed from the pipeline's working state.
#[derive(Debug)]
pub struct TokenExchangeRequest<'a> {
    /// The authorization code being exchanged.
    pub code: &'a str,

    /// The PKCE `code_verifier` issued for this flow, if any.
    pub pkce_verifier: Option<&'a str>,
}

impl<'a> TokenExchangeRequest<'a> {
    /// Builds an exchange request from the code and this flow's state.
    #[must_use]
    pub fn new(code: &'a str, flow_state: &'a FlowState) -> Self {
        Self {
            code,
            pkce_verifier: flow_state.pkce_verifier.as_deref(),
        }
    }
}

/// HTTP client for the provider's token endpoint.
#[derive(Debug, Clone)]
pub struct TokenEndpointClient {
    http: reqwest::Client,
}

impl TokenEndpointClient {
    /// Creates a client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an internal failure if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(timeout: Duration) -> FlowResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AuthenticationFailure::Internal(err.to_string()))?;
        Ok(Self { http })
    }

    /// Exchanges an authorization code for a token response.
    ///
    /// Performs exactly one POST; no variant of failure is retried here.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationFailure::TokenEndpointUnreachable`] on
    /// transport failure or timeout,
    /// [`AuthenticationFailure::TokenEndpointRejected`] when the provider
    /// answers with a non-success status, and
    /// [`AuthenticationFailure::MalformedTokenResponse`] when a success
    /// response does not parse.
    pub async fn exchange(
        &self,
        config: &OauthClientConfig,
        metadata: &ProviderMetadata,
        request: TokenExchangeRequest<'_>,
    ) -> FlowResult<TokenResponse> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", request.code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ];
        if let Some(verifier) = request.pkce_verifier {
            form.push(("code_verifier", verifier));
        }

        let mut post = self.http.post(&metadata.token_endpoint);
        match &config.client_auth {
            ClientAuth::None => {
                form.push(("client_id", config.client_id.as_str()));
            }
            ClientAuth::SecretBasic(secret) => {
                post = post.basic_auth(&config.client_id, Some(secret));
            }
            ClientAuth::SecretPost(secret) => {
                form.push(("client_id", config.client_id.as_str()));
                form.push(("client_secret", secret.as_str()));
            }
        }

        debug!(
            provider = %config.provider_name,
            endpoint = %metadata.token_endpoint,
            "exchanging authorization code"
        );

        let response = post
            .form(&form)
            .send()
            .await
            .map_err(|err| AuthenticationFailure::TokenEndpointUnreachable(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| AuthenticationFailure::TokenEndpointUnreachable(err.to_string()))?;

        if !status.is_success() {
            return Err(rejection_from_body(status, &body));
        }

        serde_json::from_slice(&body)
            .map_err(|err| AuthenticationFailure::MalformedTokenResponse(err.to_string()))
    }
}

/// Maps a non-success token endpoint answer onto a rejection failure,
/// preserving the provider's error code when the body parses as an OAuth2
/// error response.
fn rejection_from_body(status: reqwest::StatusCode, body: &[u8]) -> AuthenticationFailure {
    match serde_json::from_slice::<ProviderErrorResponse>(body) {
        Ok(provider_error) => AuthenticationFailure::TokenEndpointRejected {
            error: provider_error.error,
            description: provider_error.error_description,
        },
        Err(_) => AuthenticationFailure::TokenEndpointRejected {
            error: format!("http_{}", status.as_u16()),
            description: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_preserves_provider_error_code() {
        let body = br#"{"error":"invalid_grant","error_description":"code expired"}"#;
        let failure = rejection_from_body(reqwest::StatusCode::BAD_REQUEST, body);
        assert_eq!(
            failure,
            AuthenticationFailure::TokenEndpointRejected {
                error: "invalid_grant".to_string(),
                description: Some("code expired".to_string()),
            }
        );
    }

    #[test]
    fn rejection_falls_back_to_status() {
        let failure =
            rejection_from_body(reqwest::StatusCode::INTERNAL_SERVER_ERROR, b"<html>boom</html>");
        assert_eq!(
            failure,
            AuthenticationFailure::TokenEndpointRejected {
                error: "http_500".to_string(),
                description: None,
            }
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_maps_to_transport_failure() {
        let client = TokenEndpointClient::new(Duration::from_millis(500)).unwrap();
        let config = OauthClientConfig::new("idp", "client1", "https://rp.example/callback");
        // Port 1 on loopback, nothing listens there.
        let metadata = ProviderMetadata::new(
            "https://idp.example",
            "http://127.0.0.1:1/token",
            std::sync::Arc::new(rp_jose::StaticKeySet::new()),
        );
        let flow_state = FlowState::new();

        let result = client
            .exchange(&config, &metadata, TokenExchangeRequest::new("code", &flow_state))
            .await;
        assert!(matches!(
            result,
            Err(AuthenticationFailure::TokenEndpointUnreachable(_))
        ));
    }
}
