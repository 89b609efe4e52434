//! azauth core library: SRP-6 credential derivation and verification.
//!
//! Implements the simplified SRP-6 scheme used by AzerothCore (WoW 3.3.5a)
//! `account` rows:
//! - SHA-1 identity hashing over `UPPER(username):UPPER(password)`
//! - private exponent `x` from a little-endian digest interpretation
//! - verifier `v = g^x mod N` over the fixed 256-bit safe prime
//! - 32-byte little-endian salt and verifier blobs, compared in constant time
//! - legacy `sha_pass_hash` rows as a read-only compatibility path
//!
//! The account storage itself is pluggable; see [`traits::AccountStore`].

pub mod errors;
pub mod traits;
pub mod types;
pub mod verifier;

pub use errors::CredentialError;
pub use traits::AccountStore;
pub use types::{Salt, StoredCredentials, Verifier, GENERATOR, SALT_LENGTH, VERIFIER_LENGTH};
pub use verifier::{
    derive_verifier, generate_salt, legacy_hash, verify_credential, verify_legacy_hash,
    Authenticator, InMemoryAccountStore,
};

/// Library version string.
pub fn version() -> &'static str { "azauth-core 0.1.0" }

#[cfg(test)]
mod tests;
