//! Identity token claims.
//!
//! [`RawClaims`] is the deserialization target for an identity token payload
//! and stays crate-private: code outside the validator only ever sees
//! [`IdentityClaims`], which can solely be constructed from a token that
//! passed the full validation sequence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The `aud` claim: a single audience or a list of audiences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// A single audience value.
    Single(String),
    /// Multiple audience values.
    Multiple(Vec<String>),
}

impl Audience {
    /// Checks whether the audience contains the given value.
    #[must_use]
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::Single(value) => value == audience,
            Self::Multiple(values) => values.iter().any(|value| value == audience),
        }
    }

    /// Returns the audience values as a slice-like vector of string refs.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// Claims as deserialized from the identity token payload, prior to any
/// validation. Never exposed outside the crate.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawClaims {
    pub(crate) iss: String,
    pub(crate) sub: String,
    pub(crate) aud: Audience,
    pub(crate) exp: i64,
    pub(crate) iat: i64,
    #[serde(default)]
    pub(crate) auth_time: Option<i64>,
    #[serde(default)]
    pub(crate) nonce: Option<String>,
    #[serde(default)]
    pub(crate) azp: Option<String>,
    #[serde(flatten)]
    pub(crate) additional: HashMap<String, serde_json::Value>,
}

/// Validated identity token claims.
///
/// Instances exist only for tokens whose signature, issuer, audience,
/// timestamps and nonce all checked out; downstream code can rely on that
/// without re-validating.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityClaims {
    iss: String,
    sub: String,
    aud: Audience,
    exp: i64,
    iat: i64,
    auth_time: Option<i64>,
    azp: Option<String>,
    additional: HashMap<String, serde_json::Value>,
}

impl IdentityClaims {
    pub(crate) fn from_raw(raw: RawClaims) -> Self {
        Self {
            iss: raw.iss,
            sub: raw.sub,
            aud: raw.aud,
            exp: raw.exp,
            iat: raw.iat,
            auth_time: raw.auth_time,
            azp: raw.azp,
            additional: raw.additional,
        }
    }

    /// The issuer of the token.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.iss
    }

    /// The subject identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// The audience(s) the token is intended for.
    #[must_use]
    pub const fn audience(&self) -> &Audience {
        &self.aud
    }

    /// Expiry as seconds since the Unix epoch.
    #[must_use]
    pub const fn expires_at(&self) -> i64 {
        self.exp
    }

    /// Issued-at as seconds since the Unix epoch.
    #[must_use]
    pub const fn issued_at(&self) -> i64 {
        self.iat
    }

    /// Time of end-user authentication, if the provider supplied it.
    #[must_use]
    pub const fn auth_time(&self) -> Option<i64> {
        self.auth_time
    }

    /// The authorized party (`azp`), if present.
    #[must_use]
    pub fn authorized_party(&self) -> Option<&str> {
        self.azp.as_deref()
    }

    /// Looks up a non-registered claim by name.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&serde_json::Value> {
        self.additional.get(name)
    }

    /// Looks up a non-registered claim and returns it as a string, if it is
    /// one.
    #[must_use]
    pub fn string_claim(&self, name: &str) -> Option<&str> {
        self.additional.get(name).and_then(serde_json::Value::as_str)
    }

    /// All non-registered claims.
    #[must_use]
    pub const fn additional_claims(&self) -> &HashMap<String, serde_json::Value> {
        &self.additional
    }
}
