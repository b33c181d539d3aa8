//! JSON Web Key Set (JWKS) types.
//!
//! Implements the subset of [RFC 7517](https://tools.ietf.org/html/rfc7517)
//! a relying party needs to verify identity token signatures: parsing a
//! provider's published key set and converting a key into verification key
//! material.

use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};

use crate::algorithm::SignatureAlgorithm;
use crate::error::JoseError;

/// JSON Web Key Set, as published at a provider's JWKS endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    /// Array of JSON Web Keys.
    pub keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    /// Creates an empty key set.
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Creates a key set with the given keys.
    #[must_use]
    pub const fn with_keys(keys: Vec<JsonWebKey>) -> Self {
        Self { keys }
    }

    /// Adds a key to the set.
    pub fn add_key(&mut self, key: JsonWebKey) {
        self.keys.push(key);
    }

    /// Finds a key by its ID.
    #[must_use]
    pub fn find_key(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }

    /// Returns the keys usable for signature verification.
    #[must_use]
    pub fn signing_keys(&self) -> Vec<&JsonWebKey> {
        self.keys.iter().filter(|k| k.is_signing_key()).collect()
    }
}

/// JSON Web Key.
///
/// Only the parameters needed to verify signatures are modeled; `oct` keys
/// carry no public parameters and cannot be used for verification here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKey {
    /// Key type (e.g., "RSA", "EC").
    pub kty: KeyType,

    /// Public key use ("sig" for signature, "enc" for encryption).
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,

    /// Algorithm intended for use with the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// Key ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    // === RSA Key Parameters ===
    /// RSA modulus (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA exponent (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,

    // === EC Key Parameters ===
    /// EC curve name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<EcCurve>,

    /// EC x coordinate (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    /// EC y coordinate (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

impl JsonWebKey {
    /// Creates a new RSA public key from base64url-encoded parameters.
    #[must_use]
    pub fn rsa_public(
        kid: impl Into<String>,
        algorithm: SignatureAlgorithm,
        modulus: impl Into<String>,
        exponent: impl Into<String>,
    ) -> Self {
        Self {
            kty: KeyType::Rsa,
            key_use: Some("sig".to_string()),
            alg: Some(algorithm.as_str().to_string()),
            kid: Some(kid.into()),
            n: Some(modulus.into()),
            e: Some(exponent.into()),
            crv: None,
            x: None,
            y: None,
        }
    }

    /// Creates a new EC public key from base64url-encoded coordinates.
    #[must_use]
    pub fn ec_public(
        kid: impl Into<String>,
        algorithm: SignatureAlgorithm,
        curve: EcCurve,
        x: impl Into<String>,
        y: impl Into<String>,
    ) -> Self {
        Self {
            kty: KeyType::Ec,
            key_use: Some("sig".to_string()),
            alg: Some(algorithm.as_str().to_string()),
            kid: Some(kid.into()),
            n: None,
            e: None,
            crv: Some(curve),
            x: Some(x.into()),
            y: Some(y.into()),
        }
    }

    /// Checks if this key is usable for signature verification.
    #[must_use]
    pub fn is_signing_key(&self) -> bool {
        self.key_use.as_deref() == Some("sig") || self.key_use.is_none()
    }

    /// Returns the key ID if present.
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Checks whether the key can verify signatures made with `algorithm`.
    ///
    /// A key with an explicit `alg` parameter only matches that algorithm;
    /// otherwise the key type decides.
    #[must_use]
    pub fn supports(&self, algorithm: SignatureAlgorithm) -> bool {
        if let Some(alg) = self.alg.as_deref() {
            return alg == algorithm.as_str();
        }
        match self.kty {
            KeyType::Rsa => algorithm.is_rsa(),
            KeyType::Ec => algorithm.is_ec(),
            KeyType::Oct | KeyType::Okp => false,
        }
    }

    /// Converts the key into verification key material.
    ///
    /// # Errors
    ///
    /// Returns an error if a required parameter is absent, the parameters do
    /// not decode, or the key type cannot verify asymmetric signatures.
    pub fn verification_key(&self) -> Result<DecodingKey, JoseError> {
        match self.kty {
            KeyType::Rsa => {
                let n = self.n.as_deref().ok_or(JoseError::MissingParameter("n"))?;
                let e = self.e.as_deref().ok_or(JoseError::MissingParameter("e"))?;
                DecodingKey::from_rsa_components(n, e)
                    .map_err(|err| JoseError::InvalidKey(err.to_string()))
            }
            KeyType::Ec => {
                let x = self.x.as_deref().ok_or(JoseError::MissingParameter("x"))?;
                let y = self.y.as_deref().ok_or(JoseError::MissingParameter("y"))?;
                DecodingKey::from_ec_components(x, y)
                    .map_err(|err| JoseError::InvalidKey(err.to_string()))
            }
            KeyType::Oct | KeyType::Okp => Err(JoseError::InvalidKey(format!(
                "key type {:?} cannot verify identity token signatures",
                self.kty
            ))),
        }
    }
}

/// Key type for JWK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// RSA key.
    #[serde(rename = "RSA")]
    Rsa,

    /// Elliptic Curve key.
    #[serde(rename = "EC")]
    Ec,

    /// Octet sequence (symmetric key).
    #[serde(rename = "oct")]
    Oct,

    /// Octet Key Pair (Ed25519, X25519).
    #[serde(rename = "OKP")]
    Okp,
}

/// Elliptic curve names for JWK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcCurve {
    /// NIST P-256 curve.
    #[serde(rename = "P-256")]
    P256,

    /// NIST P-384 curve.
    #[serde(rename = "P-384")]
    P384,

    /// NIST P-521 curve.
    #[serde(rename = "P-521")]
    P521,
}

impl EcCurve {
    /// Returns the curve name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
        }
    }
}
