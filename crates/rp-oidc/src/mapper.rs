//! Mapping validated claims to an application identity.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::claims::IdentityClaims;
use crate::error::FlowResult;
use crate::response::TokenResponse;

/// The authenticated principal produced by a successful flow.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedIdentity {
    /// Name of the provider the identity came from.
    pub provider: String,

    /// Stable subject identifier at the provider.
    pub subject: String,

    /// Preferred username, when the provider supplies one.
    pub username: Option<String>,

    /// Email address, when present.
    pub email: Option<String>,

    /// Display name, when present.
    pub display_name: Option<String>,

    /// Role names granted to the identity.
    pub roles: Vec<String>,

    /// Remaining non-registered claims, for application-specific use.
    pub attributes: HashMap<String, serde_json::Value>,

    /// The token response the identity came from, for later resource calls.
    pub tokens: TokenResponse,
}

/// Maps validated identity token claims onto an [`AuthenticatedIdentity`].
///
/// Implementations only ever see claims that passed validation; a mapper may
/// still reject an identity on semantic grounds via
/// [`AuthenticationFailure::ClaimsRejected`]. Mapping must be a pure function
/// of its three inputs.
///
/// [`AuthenticationFailure::ClaimsRejected`]: crate::AuthenticationFailure::ClaimsRejected
#[async_trait]
pub trait IdentityMapper: Send + Sync {
    /// Produces the identity for a set of validated claims.
    ///
    /// # Errors
    ///
    /// Returns `ClaimsRejected` when the claims are unacceptable to the
    /// application.
    async fn map(
        &self,
        provider: &str,
        tokens: &TokenResponse,
        claims: &IdentityClaims,
    ) -> FlowResult<AuthenticatedIdentity>;
}

/// Default mapper: subject-centric, never rejects.
///
/// Pulls `preferred_username`, `email` and `name` when present and forwards
/// every other non-registered claim as an attribute. Roles come from a
/// `roles` claim holding an array of strings; other shapes are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectIdentityMapper;

impl SubjectIdentityMapper {
    /// Creates the default mapper.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IdentityMapper for SubjectIdentityMapper {
    async fn map(
        &self,
        provider: &str,
        tokens: &TokenResponse,
        claims: &IdentityClaims,
    ) -> FlowResult<AuthenticatedIdentity> {
        let roles = claims
            .claim("roles")
            .and_then(serde_json::Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(AuthenticatedIdentity {
            provider: provider.to_string(),
            subject: claims.subject().to_string(),
            username: claims.string_claim("preferred_username").map(str::to_string),
            email: claims.string_claim("email").map(str::to_string),
            display_name: claims.string_claim("name").map(str::to_string),
            roles,
            attributes: claims.additional_claims().clone(),
            tokens: tokens.clone(),
        })
    }
}
