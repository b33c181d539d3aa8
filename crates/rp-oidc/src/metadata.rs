//! Provider metadata: the endpoints and key material of one identity
//! provider, as resolved from discovery or static configuration.

use std::sync::Arc;

use rp_jose::KeyResolver;

/// Endpoints and verification keys for one identity provider.
///
/// Read-only during a flow. Cloning is cheap; the key resolver is shared.
#[derive(Clone)]
pub struct ProviderMetadata {
    /// The issuer identifier, compared byte-for-byte against `iss`.
    pub issuer: String,

    /// The token endpoint URL used for the code exchange.
    pub token_endpoint: String,

    /// Resolver for identity token verification keys.
    pub keys: Arc<dyn KeyResolver>,
}

impl ProviderMetadata {
    /// Creates provider metadata from an issuer, token endpoint and key set.
    #[must_use]
    pub fn new(
        issuer: impl Into<String>,
        token_endpoint: impl Into<String>,
        keys: Arc<dyn KeyResolver>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            token_endpoint: token_endpoint.into(),
            keys,
        }
    }
}

impl std::fmt::Debug for ProviderMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderMetadata")
            .field("issuer", &self.issuer)
            .field("token_endpoint", &self.token_endpoint)
            .finish_non_exhaustive()
    }
}
