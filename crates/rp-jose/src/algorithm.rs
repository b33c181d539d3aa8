//! JWS signature algorithm identifiers.
//!
//! Covers the asymmetric algorithms identity providers commonly sign ID
//! tokens with (RFC 7518). Symmetric (HS*) and EdDSA algorithms are not
//! accepted: the pipeline verifies against published provider keys only.

use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};

use crate::error::JoseError;

/// Asymmetric JWS signature algorithms accepted for identity tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256 (the OIDC default).
    #[serde(rename = "RS256")]
    Rs256,

    /// RSASSA-PKCS1-v1_5 with SHA-384.
    #[serde(rename = "RS384")]
    Rs384,

    /// RSASSA-PKCS1-v1_5 with SHA-512.
    #[serde(rename = "RS512")]
    Rs512,

    /// ECDSA with P-256 and SHA-256.
    #[serde(rename = "ES256")]
    Es256,

    /// ECDSA with P-384 and SHA-384.
    #[serde(rename = "ES384")]
    Es384,

    /// RSASSA-PSS with SHA-256.
    #[serde(rename = "PS256")]
    Ps256,

    /// RSASSA-PSS with SHA-384.
    #[serde(rename = "PS384")]
    Ps384,

    /// RSASSA-PSS with SHA-512.
    #[serde(rename = "PS512")]
    Ps512,
}

impl SignatureAlgorithm {
    /// Returns the JWA name of the algorithm.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
            Self::Es256 => "ES256",
            Self::Es384 => "ES384",
            Self::Ps256 => "PS256",
            Self::Ps384 => "PS384",
            Self::Ps512 => "PS512",
        }
    }

    /// Parses a JWA algorithm name.
    ///
    /// # Errors
    ///
    /// Returns [`JoseError::UnsupportedAlgorithm`] for unknown names and for
    /// algorithms that are not accepted for identity token signatures.
    pub fn from_jwa(name: &str) -> Result<Self, JoseError> {
        match name {
            "RS256" => Ok(Self::Rs256),
            "RS384" => Ok(Self::Rs384),
            "RS512" => Ok(Self::Rs512),
            "ES256" => Ok(Self::Es256),
            "ES384" => Ok(Self::Es384),
            "PS256" => Ok(Self::Ps256),
            "PS384" => Ok(Self::Ps384),
            "PS512" => Ok(Self::Ps512),
            other => Err(JoseError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// Converts the algorithm declared in a JWT header.
    ///
    /// # Errors
    ///
    /// Returns [`JoseError::UnsupportedAlgorithm`] for algorithms the
    /// pipeline does not verify (HS*, EdDSA).
    pub fn from_jwt(algorithm: Algorithm) -> Result<Self, JoseError> {
        match algorithm {
            Algorithm::RS256 => Ok(Self::Rs256),
            Algorithm::RS384 => Ok(Self::Rs384),
            Algorithm::RS512 => Ok(Self::Rs512),
            Algorithm::ES256 => Ok(Self::Es256),
            Algorithm::ES384 => Ok(Self::Es384),
            Algorithm::PS256 => Ok(Self::Ps256),
            Algorithm::PS384 => Ok(Self::Ps384),
            Algorithm::PS512 => Ok(Self::Ps512),
            other => Err(JoseError::UnsupportedAlgorithm(format!("{other:?}"))),
        }
    }

    /// Returns the `jsonwebtoken` algorithm.
    #[must_use]
    pub const fn to_jwt(self) -> Algorithm {
        match self {
            Self::Rs256 => Algorithm::RS256,
            Self::Rs384 => Algorithm::RS384,
            Self::Rs512 => Algorithm::RS512,
            Self::Es256 => Algorithm::ES256,
            Self::Es384 => Algorithm::ES384,
            Self::Ps256 => Algorithm::PS256,
            Self::Ps384 => Algorithm::PS384,
            Self::Ps512 => Algorithm::PS512,
        }
    }

    /// Checks whether the algorithm uses an RSA key.
    #[must_use]
    pub const fn is_rsa(self) -> bool {
        matches!(
            self,
            Self::Rs256 | Self::Rs384 | Self::Rs512 | Self::Ps256 | Self::Ps384 | Self::Ps512
        )
    }

    /// Checks whether the algorithm uses an EC key.
    #[must_use]
    pub const fn is_ec(self) -> bool {
        matches!(self, Self::Es256 | Self::Es384)
    }
}

impl std::fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
