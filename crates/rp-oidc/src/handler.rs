//! Orchestration of one authorization response.
//!
//! The handler drives the full pipeline: flow-state retrieval and state
//! verification up front, then code exchange, token validation and claims
//! mapping on a spawned task. The spawn means the tail runs to completion
//! even if the caller's future is dropped mid-flow; the provider never sees
//! a half-finished exchange from us.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::OauthClientConfig;
use crate::error::{AuthenticationFailure, FlowResult};
use crate::mapper::{AuthenticatedIdentity, IdentityMapper, SubjectIdentityMapper};
use crate::metadata::ProviderMetadata;
use crate::response::AuthorizationResponse;
use crate::state::{FlowState, FlowStateStore, verify_state};
use crate::token_client::{TokenEndpointClient, TokenExchangeRequest};
use crate::validator::IdTokenValidator;

/// The single terminal outcome of one authorization response.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthenticationOutcome {
    /// The flow completed and produced an authenticated identity.
    Success(AuthenticatedIdentity),

    /// The flow failed; the failure names the first check that did not hold.
    Failure(AuthenticationFailure),
}

impl AuthenticationOutcome {
    /// Checks whether the outcome is a success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the identity on success.
    #[must_use]
    pub const fn identity(&self) -> Option<&AuthenticatedIdentity> {
        match self {
            Self::Success(identity) => Some(identity),
            Self::Failure(_) => None,
        }
    }

    /// Returns the failure on failure.
    #[must_use]
    pub const fn failure(&self) -> Option<&AuthenticationFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

impl From<FlowResult<AuthenticatedIdentity>> for AuthenticationOutcome {
    fn from(result: FlowResult<AuthenticatedIdentity>) -> Self {
        match result {
            Ok(identity) => Self::Success(identity),
            Err(failure) => Self::Failure(failure),
        }
    }
}

/// Handles authorization responses for one client registration.
pub struct AuthorizationResponseHandler {
    config: OauthClientConfig,
    metadata: ProviderMetadata,
    store: Arc<dyn FlowStateStore>,
    token_client: TokenEndpointClient,
    validator: IdTokenValidator,
    mapper: Arc<dyn IdentityMapper>,
}

impl AuthorizationResponseHandler {
    /// Creates a handler with the default subject-centric identity mapper.
    ///
    /// # Errors
    ///
    /// Returns an internal failure if the token endpoint HTTP client cannot
    /// be constructed.
    pub fn new(
        config: OauthClientConfig,
        metadata: ProviderMetadata,
        store: Arc<dyn FlowStateStore>,
    ) -> FlowResult<Self> {
        let token_client = TokenEndpointClient::new(config.token_endpoint_timeout)?;
        let validator = IdTokenValidator::new(config.clone(), metadata.clone());
        Ok(Self {
            config,
            metadata,
            store,
            token_client,
            validator,
            mapper: Arc::new(SubjectIdentityMapper::new()),
        })
    }

    /// Replaces the identity mapper.
    #[must_use]
    pub fn with_mapper(mut self, mapper: Arc<dyn IdentityMapper>) -> Self {
        self.mapper = mapper;
        self
    }

    /// Runs the full pipeline for one authorization response.
    ///
    /// Emits exactly one outcome. State verification happens before any
    /// network traffic; a state failure never reaches the token endpoint.
    pub async fn handle(&self, response: AuthorizationResponse) -> AuthenticationOutcome {
        let outcome = self.run(response).await.into();
        match &outcome {
            AuthenticationOutcome::Success(identity) => {
                info!(
                    provider = %self.config.provider_name,
                    subject = %identity.subject,
                    "authentication succeeded"
                );
            }
            AuthenticationOutcome::Failure(failure) => {
                warn!(
                    provider = %self.config.provider_name,
                    kind = failure.kind(),
                    "authentication failed: {failure}"
                );
            }
        }
        outcome
    }

    async fn run(&self, response: AuthorizationResponse) -> FlowResult<AuthenticatedIdentity> {
        let flow_state = match self.store.take(&response.flow_key).await {
            Some(flow_state) => flow_state,
            None if self.config.require_state => {
                return Err(AuthenticationFailure::StateMissing);
            }
            None => FlowState::new(),
        };

        if self.config.require_state {
            verify_state(&self.config, &response, &flow_state)?;
        } else {
            debug!(
                provider = %self.config.provider_name,
                "state verification disabled by configuration, skipping"
            );
        }

        // Once the code exchange starts it must run to completion: the code
        // is single-use at the provider, so abandoning the exchange midway
        // would burn it without ever learning the result.
        let config = self.config.clone();
        let metadata = self.metadata.clone();
        let token_client = self.token_client.clone();
        let validator = self.validator.clone();
        let mapper = Arc::clone(&self.mapper);

        let tail = tokio::spawn(async move {
            let tokens = token_client
                .exchange(
                    &config,
                    &metadata,
                    TokenExchangeRequest::new(&response.code, &flow_state),
                )
                .await?;

            let id_token = tokens
                .id_token
                .as_deref()
                .ok_or(AuthenticationFailure::NoIdentityTokenPresent)?;

            let claims = validator.validate(id_token, &flow_state)?;
            mapper.map(&config.provider_name, &tokens, &claims).await
        });

        tail.await
            .map_err(|err| AuthenticationFailure::Internal(err.to_string()))?
    }
}

impl std::fmt::Debug for AuthorizationResponseHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationResponseHandler")
            .field("config", &self.config)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
