//! # rp-jose
//!
//! JOSE primitives for the relying-party authentication pipeline.
//!
//! This crate provides the signature-verification capability consumed by the
//! identity token validator:
//! - [`algorithm`] - JWS signature algorithm identifiers
//! - [`error`] - JOSE error types
//! - [`jwks`] - JSON Web Key and Key Set types (RFC 7517)
//! - [`resolver`] - Verification key resolution by key id and algorithm
//!
//! Key material is configured locally (a parsed JWK set or PEM-encoded keys);
//! fetching a remote key set is a concern of the surrounding application.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod algorithm;
pub mod error;
pub mod jwks;
pub mod resolver;

pub use algorithm::SignatureAlgorithm;
pub use error::{JoseError, JoseResult};
pub use jwks::{EcCurve, JsonWebKey, JsonWebKeySet, KeyType};
pub use resolver::{KeyResolver, StaticKeySet};
