/// Abstraction over account rows. Implementers decide how (username) maps to
/// stored credential material; the consuming portal backs this with the
/// game server's auth database.
use crate::types::{Salt, StoredCredentials, Verifier};

pub trait AccountStore: Send + Sync {
    /// Return the stored credential material for `username`, if the account exists.
    fn fetch(&self, username: &str) -> Option<StoredCredentials>;

    /// Create an account row holding `salt` and `verifier` in one write.
    /// Returns `false` if the username is already taken.
    ///
    /// Salt and verifier must land together; a row with one but not the
    /// other must never become visible to `fetch`.
    fn insert(&self, username: &str, salt: Salt, verifier: Verifier) -> bool;

    /// Overwrite the credential material for an existing account in one write.
    /// Returns `false` if the account is unknown.
    fn update(&self, username: &str, salt: Salt, verifier: Verifier) -> bool;
}
