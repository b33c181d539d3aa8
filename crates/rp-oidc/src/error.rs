//! Failure taxonomy for the authorization response pipeline.
//!
//! Every stage resolves to a specific failure kind local to its own checks;
//! the orchestrator never widens or collapses kinds. All variants are
//! terminal: nothing in this taxonomy is transiently recoverable, so nothing
//! is retried.

use thiserror::Error;

/// Terminal failure of an authorization response pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationFailure {
    /// The returned `state` differs from the value issued for this flow.
    #[error("state parameter does not match the expected flow state")]
    StateMismatch,

    /// State validation is enabled but a state value is absent on one side.
    #[error("state validation is enabled but no state value is present")]
    StateMissing,

    /// The token endpoint could not be reached (transport failure or timeout).
    #[error("token endpoint unreachable: {0}")]
    TokenEndpointUnreachable(String),

    /// The provider rejected the code exchange with an OAuth2 error response.
    #[error("token endpoint rejected the exchange: {error}")]
    TokenEndpointRejected {
        /// RFC 6749 error code (e.g. `invalid_grant`), or `http_<status>`
        /// when the provider returned no parseable error body.
        error: String,
        /// Human-readable description supplied by the provider, if any.
        description: Option<String>,
    },

    /// The token endpoint returned a success response that does not parse.
    #[error("malformed token response: {0}")]
    MalformedTokenResponse(String),

    /// The token response carries no identity token.
    #[error("token response contains no identity token")]
    NoIdentityTokenPresent,

    /// The identity token is not a well-formed compact JWT.
    #[error("malformed identity token: {0}")]
    MalformedIdentityToken(String),

    /// The identity token signature did not verify against any configured key.
    #[error("identity token signature verification failed: {0}")]
    SignatureInvalid(String),

    /// The `iss` claim differs from the provider's configured issuer.
    #[error("issuer mismatch: expected '{expected}', token carries '{found}'")]
    IssuerMismatch {
        /// The issuer configured for the provider.
        expected: String,
        /// The issuer the token actually carries.
        found: String,
    },

    /// The `aud` claim does not contain the required audience.
    #[error("audience does not contain '{expected}'")]
    AudienceMismatch {
        /// The audience the token was required to contain.
        expected: String,
    },

    /// The identity token is past its expiry, beyond the allowed clock skew.
    #[error("identity token is expired")]
    TokenExpired,

    /// The identity token's issued-at lies in the future, beyond the skew.
    #[error("identity token is not yet valid")]
    TokenNotYetValid,

    /// The `nonce` claim does not match the value issued for this flow.
    #[error("nonce claim does not match the value issued for this flow")]
    NonceMismatch,

    /// A claims mapper determined the identity is not acceptable.
    #[error("claims rejected: {0}")]
    ClaimsRejected(String),

    /// A programming-defect path, distinct from authentication failures.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthenticationFailure {
    /// Returns a stable kind identifier callers can branch on.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StateMismatch => "state_mismatch",
            Self::StateMissing => "state_missing",
            Self::TokenEndpointUnreachable(_) => "token_endpoint_unreachable",
            Self::TokenEndpointRejected { .. } => "token_endpoint_rejected",
            Self::MalformedTokenResponse(_) => "malformed_token_response",
            Self::NoIdentityTokenPresent => "no_identity_token_present",
            Self::MalformedIdentityToken(_) => "malformed_identity_token",
            Self::SignatureInvalid(_) => "signature_invalid",
            Self::IssuerMismatch { .. } => "issuer_mismatch",
            Self::AudienceMismatch { .. } => "audience_mismatch",
            Self::TokenExpired => "token_expired",
            Self::TokenNotYetValid => "token_not_yet_valid",
            Self::NonceMismatch => "nonce_mismatch",
            Self::ClaimsRejected(_) => "claims_rejected",
            Self::Internal(_) => "internal",
        }
    }

    /// Checks whether the failure indicates a defect rather than a rejected
    /// authentication attempt.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

/// Result type for pipeline stages.
pub type FlowResult<T> = Result<T, AuthenticationFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(AuthenticationFailure::StateMismatch.kind(), "state_mismatch");
        assert_eq!(
            AuthenticationFailure::TokenEndpointRejected {
                error: "invalid_grant".to_string(),
                description: None,
            }
            .kind(),
            "token_endpoint_rejected"
        );
        assert_eq!(AuthenticationFailure::TokenExpired.kind(), "token_expired");
    }

    #[test]
    fn internal_is_distinct() {
        assert!(AuthenticationFailure::Internal("bug".to_string()).is_internal());
        assert!(!AuthenticationFailure::NonceMismatch.is_internal());
    }

    #[test]
    fn rejection_display_carries_error_code() {
        let failure = AuthenticationFailure::TokenEndpointRejected {
            error: "invalid_grant".to_string(),
            description: Some("code expired".to_string()),
        };
        assert!(failure.to_string().contains("invalid_grant"));
    }
}
