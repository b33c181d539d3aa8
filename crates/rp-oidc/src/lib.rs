//! OAuth2/OIDC authorization response handling for relying parties.
//!
//! The pipeline takes the redirect-back from an identity provider and turns
//! it into a single [`AuthenticationOutcome`]: anti-forgery state
//! verification, authorization-code exchange at the token endpoint,
//! cryptographic and semantic validation of the identity token, and mapping
//! of the validated claims onto an application identity.
//!
//! Construction order enforces the security order: an [`IdentityClaims`]
//! value can only come out of the validator, so anything downstream of it is
//! working with a token that verified.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod claims;
mod config;
mod error;
mod handler;
mod mapper;
mod metadata;
mod response;
mod state;
mod token_client;
mod validator;

#[cfg(test)]
mod testkeys;

pub use claims::{Audience, IdentityClaims};
pub use config::{ClientAuth, OauthClientConfig};
pub use error::{AuthenticationFailure, FlowResult};
pub use handler::{AuthenticationOutcome, AuthorizationResponseHandler};
pub use mapper::{AuthenticatedIdentity, IdentityMapper, SubjectIdentityMapper};
pub use metadata::ProviderMetadata;
pub use response::{AuthorizationResponse, ProviderErrorResponse, TokenResponse};
pub use state::{
    FlowState, FlowStateStore, InMemoryFlowStateStore, random_token, verify_state,
};
pub use token_client::{TokenEndpointClient, TokenExchangeRequest};
pub use validator::IdTokenValidator;
