use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::RngCore;
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::errors::CredentialError;
use crate::traits::AccountStore;
use crate::types::{
    generator, large_safe_prime, Salt, StoredCredentials, Verifier, SALT_LENGTH, VERIFIER_LENGTH,
};

/// Generate a fresh per-account salt from the OS random source.
pub fn generate_salt() -> Salt {
    let mut bytes = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    Salt::from(bytes)
}

/// Derive the 32-byte password verifier for `(username, password, salt)`.
///
/// Deterministic and pure. The byte order is fixed by the protocol: the
/// `x` digest is read little-endian, and the exported verifier is the
/// big-endian value of `g^x mod N` zero-padded to 32 bytes and reversed.
pub fn derive_verifier(username: &str, password: &str, salt: &Salt) -> Verifier {
    // x = SHA1( salt || SHA1( UPPER(user):UPPER(pass) ) ), little-endian
    let x_digest = private_exponent_digest(username, password, salt.as_bytes());
    let x = BigUint::from_bytes_le(&x_digest);

    // v = g^x mod N
    let v = generator().modpow(&x, &large_safe_prime());

    let v_be = pad_to_length(v.to_bytes_be(), VERIFIER_LENGTH);
    let mut v_le = [0u8; VERIFIER_LENGTH];
    for (i, b) in v_be.iter().rev().enumerate() {
        v_le[i] = *b;
    }
    Verifier::from(v_le)
}

/// Check a plaintext credential against a stored `(salt, verifier)` pair.
///
/// Fails closed: a salt or verifier of the wrong length answers `false`
/// without attempting comparison. The byte comparison is constant time.
pub fn verify_credential(
    username: &str,
    password: &str,
    stored_salt: &[u8],
    stored_verifier: &[u8],
) -> bool {
    let Ok(salt) = Salt::from_bytes(stored_salt) else {
        return false;
    };
    if stored_verifier.len() != VERIFIER_LENGTH {
        return false;
    }
    let candidate = derive_verifier(username, password, &salt);
    candidate.as_bytes().as_slice().ct_eq(stored_verifier).into()
}

/// Lowercase-hex `SHA1(UPPER(user):UPPER(pass))`, the pre-SRP `sha_pass_hash`
/// column format. Only for reading legacy rows; new accounts always get a
/// salt+verifier pair.
pub fn legacy_hash(username: &str, password: &str) -> String {
    hex::encode(identity_hash(username, password))
}

/// Check a plaintext credential against a legacy `sha_pass_hash` value.
/// Malformed stored hashes answer `false`.
pub fn verify_legacy_hash(username: &str, password: &str, stored_hash: &str) -> bool {
    let Ok(stored) = hex::decode(stored_hash.trim()) else {
        return false;
    };
    if stored.len() != 20 {
        return false;
    }
    let computed = identity_hash(username, password);
    computed.as_slice().ct_eq(stored.as_slice()).into()
}

/// SHA1( UPPER(username) ":" UPPER(password) ), raw 20 bytes.
///
/// ASCII case folding only; the protocol predates internationalized
/// account names.
fn identity_hash(username: &str, password: &str) -> [u8; 20] {
    let mut hasher = Sha1::new();
    hasher.update(username.to_ascii_uppercase().as_bytes());
    hasher.update(b":");
    hasher.update(password.to_ascii_uppercase().as_bytes());
    hasher.finalize().into()
}

/// SHA1( salt || identity_hash ), raw 20 bytes.
fn private_exponent_digest(username: &str, password: &str, salt: &[u8]) -> [u8; 20] {
    let mut hasher = Sha1::new();
    hasher.update(salt);
    hasher.update(identity_hash(username, password));
    hasher.finalize().into()
}

/// Left-pad with zero bytes to `target_len`. Big-endian export of a value
/// smaller than 2^255 can come back short.
fn pad_to_length(bytes: Vec<u8>, target_len: usize) -> Vec<u8> {
    if bytes.len() >= target_len {
        bytes
    } else {
        let mut padded = vec![0u8; target_len - bytes.len()];
        padded.extend(bytes);
        padded
    }
}

/// Simple in-memory account store suitable for tests and single-process demos.
#[derive(Default)]
pub struct InMemoryAccountStore {
    inner: Mutex<HashMap<String, StoredCredentials>>,
}

impl InMemoryAccountStore {
    /// Create a new, empty in-memory account store.
    pub fn new() -> Self {
        Self { inner: Mutex::new(HashMap::new()) }
    }

    /// Seed a legacy `sha_pass_hash` row, for exercising the fallback path.
    pub fn insert_legacy(&self, username: &str, sha_pass_hash: &str) {
        self.inner
            .lock()
            .unwrap()
            .insert(normalize(username), StoredCredentials::LegacyHash(sha_pass_hash.to_string()));
    }
}

impl AccountStore for InMemoryAccountStore {
    fn fetch(&self, username: &str) -> Option<StoredCredentials> {
        self.inner.lock().unwrap().get(&normalize(username)).cloned()
    }

    fn insert(&self, username: &str, salt: Salt, verifier: Verifier) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let key = normalize(username);
        if inner.contains_key(&key) {
            return false;
        }
        inner.insert(key, StoredCredentials::SaltVerifier(salt, verifier));
        true
    }

    fn update(&self, username: &str, salt: Salt, verifier: Verifier) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let key = normalize(username);
        if !inner.contains_key(&key) {
            return false;
        }
        inner.insert(key, StoredCredentials::SaltVerifier(salt, verifier));
        true
    }
}

// Account names are case-insensitive, like the game server treats them.
fn normalize(username: &str) -> String {
    username.to_ascii_uppercase()
}

/// Authenticator coordinates credential derivation against an account store.
pub struct Authenticator {
    store: Arc<dyn AccountStore>,
}

impl Authenticator {
    /// Create a new `Authenticator` backed by the given account store.
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Register a new account: validate, generate a fresh salt, derive the
    /// verifier, and store both in a single write.
    pub fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(Salt, Verifier), CredentialError> {
        validate_username(username)?;
        validate_password(password)?;

        let salt = generate_salt();
        let verifier = derive_verifier(username, password, &salt);
        if !self.store.insert(username, salt.clone(), verifier.clone()) {
            return Err(CredentialError::UsernameTaken(username.to_string()));
        }
        Ok((salt, verifier))
    }

    /// Check a login attempt. Unknown accounts and wrong passwords both
    /// answer `false`; this is a predicate, not an error path.
    ///
    /// Legacy rows are checked with the pre-SRP hash; everything else runs
    /// the SRP-6 derivation against the stored salt and verifier.
    pub fn login(&self, username: &str, password: &str) -> bool {
        match self.store.fetch(username) {
            Some(StoredCredentials::SaltVerifier(salt, verifier)) => {
                verify_credential(username, password, salt.as_bytes(), verifier.as_bytes())
            }
            Some(StoredCredentials::LegacyHash(hash)) => {
                verify_legacy_hash(username, password, &hash)
            }
            None => false,
        }
    }

    /// Change an account's password: re-salt, re-derive, overwrite in a
    /// single write. Legacy rows are migrated to salt+verifier by this path.
    pub fn set_password(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        validate_password(password)?;

        let salt = generate_salt();
        let verifier = derive_verifier(username, password, &salt);
        if !self.store.update(username, salt, verifier) {
            return Err(CredentialError::AccountUnknown(username.to_string()));
        }
        Ok(())
    }
}

fn validate_username(username: &str) -> Result<(), CredentialError> {
    let len = username.len();
    if !(3..=20).contains(&len) {
        return Err(CredentialError::UsernameLength(len));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.len() < 6 {
        return Err(CredentialError::PasswordTooShort);
    }
    Ok(())
}
