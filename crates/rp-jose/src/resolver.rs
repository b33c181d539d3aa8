//! Verification key resolution.
//!
//! The pipeline selects a verifying key by the key id and algorithm an
//! identity token declares in its header. [`KeyResolver`] is the seam the
//! validator consumes; [`JsonWebKeySet`] implements it for parsed provider
//! key sets, and [`StaticKeySet`] for keys configured from PEM material.

use std::collections::HashMap;

use jsonwebtoken::DecodingKey;

use crate::algorithm::SignatureAlgorithm;
use crate::error::JoseError;
use crate::jwks::JsonWebKeySet;

/// Resolves verification key material for a signed token.
///
/// Implementations must be safe for concurrent read access; the pipeline
/// never mutates key material mid-flow.
pub trait KeyResolver: Send + Sync {
    /// Resolves a verifying key by key id and algorithm.
    ///
    /// When `kid` is absent the resolver may return any key suitable for the
    /// algorithm. Returns `None` when no matching key exists.
    fn resolve(&self, kid: Option<&str>, algorithm: SignatureAlgorithm) -> Option<DecodingKey>;
}

impl KeyResolver for JsonWebKeySet {
    fn resolve(&self, kid: Option<&str>, algorithm: SignatureAlgorithm) -> Option<DecodingKey> {
        let key = match kid {
            Some(kid) => self.find_key(kid).filter(|k| k.is_signing_key())?,
            None => self
                .signing_keys()
                .into_iter()
                .find(|k| k.supports(algorithm))?,
        };

        if !key.supports(algorithm) {
            return None;
        }
        key.verification_key().ok()
    }
}

/// A fixed set of verification keys indexed by key id.
///
/// Useful when a provider's keys are configured directly (PEM files, pinned
/// keys) rather than parsed from a JWKS document.
#[derive(Default)]
pub struct StaticKeySet {
    keys: HashMap<String, (SignatureAlgorithm, DecodingKey)>,
}

impl StaticKeySet {
    /// Creates an empty key set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an RSA public key from PEM-encoded material.
    ///
    /// # Errors
    ///
    /// Returns an error if the PEM does not parse as an RSA public key.
    pub fn with_rsa_pem(
        mut self,
        kid: impl Into<String>,
        algorithm: SignatureAlgorithm,
        public_key_pem: &[u8],
    ) -> Result<Self, JoseError> {
        let key = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|err| JoseError::InvalidKey(err.to_string()))?;
        self.keys.insert(kid.into(), (algorithm, key));
        Ok(self)
    }

    /// Adds an EC public key from PEM-encoded material.
    ///
    /// # Errors
    ///
    /// Returns an error if the PEM does not parse as an EC public key.
    pub fn with_ec_pem(
        mut self,
        kid: impl Into<String>,
        algorithm: SignatureAlgorithm,
        public_key_pem: &[u8],
    ) -> Result<Self, JoseError> {
        let key = DecodingKey::from_ec_pem(public_key_pem)
            .map_err(|err| JoseError::InvalidKey(err.to_string()))?;
        self.keys.insert(kid.into(), (algorithm, key));
        Ok(self)
    }

    /// Returns the number of keys in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Checks if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for StaticKeySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticKeySet")
            .field("kids", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl KeyResolver for StaticKeySet {
    fn resolve(&self, kid: Option<&str>, algorithm: SignatureAlgorithm) -> Option<DecodingKey> {
        match kid {
            Some(kid) => {
                let (key_alg, key) = self.keys.get(kid)?;
                (*key_alg == algorithm).then(|| key.clone())
            }
            None => self
                .keys
                .values()
                .find(|(key_alg, _)| *key_alg == algorithm)
                .map(|(_, key)| key.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwks::JsonWebKey;

    const RFC_N: &str = "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw";
    const RFC_E: &str = "AQAB";

    #[test]
    fn jwks_resolves_by_kid_and_algorithm() {
        let jwks = JsonWebKeySet::with_keys(vec![JsonWebKey::rsa_public(
            "key1",
            SignatureAlgorithm::Rs256,
            RFC_N,
            RFC_E,
        )]);

        assert!(jwks.resolve(Some("key1"), SignatureAlgorithm::Rs256).is_some());
        assert!(jwks.resolve(Some("key1"), SignatureAlgorithm::Rs384).is_none());
        assert!(jwks.resolve(Some("absent"), SignatureAlgorithm::Rs256).is_none());
    }

    #[test]
    fn jwks_resolves_without_kid() {
        let jwks = JsonWebKeySet::with_keys(vec![JsonWebKey::rsa_public(
            "key1",
            SignatureAlgorithm::Rs256,
            RFC_N,
            RFC_E,
        )]);

        assert!(jwks.resolve(None, SignatureAlgorithm::Rs256).is_some());
        assert!(jwks.resolve(None, SignatureAlgorithm::Es256).is_none());
    }

    #[test]
    fn static_set_empty() {
        let keys = StaticKeySet::new();
        assert!(keys.is_empty());
        assert!(keys.resolve(Some("key1"), SignatureAlgorithm::Rs256).is_none());
    }
}
