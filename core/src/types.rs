use num_bigint::BigUint;

use crate::errors::CredentialError;

/// 256-bit safe prime `N` shared by AzerothCore-compatible clients and servers.
pub const LARGE_SAFE_PRIME_HEX: &str =
    "894B645E89E1535BBDAD5B8B290650530801B18EBFBF5E8FAB3C82872A3E9BB7";

/// Generator `g`.
pub const GENERATOR: u8 = 7;

/// Salts are fixed-length binary blobs in the `account` table.
pub const SALT_LENGTH: usize = 32;

/// Verifiers are fixed-length binary blobs in the `account` table.
pub const VERIFIER_LENGTH: usize = 32;

/// Per-account random salt. Not secret, but unique per account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Wrap exactly [`SALT_LENGTH`] raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CredentialError> {
        let arr: [u8; SALT_LENGTH] = bytes
            .try_into()
            .map_err(|_| CredentialError::SaltLength(bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

impl From<[u8; SALT_LENGTH]> for Salt {
    fn from(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }
}

/// Password verifier `v = g^x mod N`, stored little-endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verifier([u8; VERIFIER_LENGTH]);

impl Verifier {
    /// Wrap exactly [`VERIFIER_LENGTH`] raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CredentialError> {
        let arr: [u8; VERIFIER_LENGTH] = bytes
            .try_into()
            .map_err(|_| CredentialError::VerifierLength(bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; VERIFIER_LENGTH] {
        &self.0
    }
}

impl From<[u8; VERIFIER_LENGTH]> for Verifier {
    fn from(bytes: [u8; VERIFIER_LENGTH]) -> Self {
        Self(bytes)
    }
}

/// Credential material an [`crate::traits::AccountStore`] holds for one account.
///
/// `LegacyHash` rows predate the salt+verifier migration and carry a
/// lowercase-hex `sha_pass_hash` column instead. They stay readable for
/// login but are never written for new accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredCredentials {
    SaltVerifier(Salt, Verifier),
    LegacyHash(String),
}

/// The prime `N` as a big integer.
pub(crate) fn large_safe_prime() -> BigUint {
    BigUint::parse_bytes(LARGE_SAFE_PRIME_HEX.as_bytes(), 16)
        .expect("prime constant is valid hex")
}

/// The generator `g` as a big integer.
pub(crate) fn generator() -> BigUint {
    BigUint::from(GENERATOR)
}
