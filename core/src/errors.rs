use thiserror::Error;

/// Errors that can arise while deriving or storing credentials.
///
/// A wrong password is never an error: verification answers `false`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("salt must be exactly 32 bytes, got {0}")]
    SaltLength(usize),
    #[error("verifier must be exactly 32 bytes, got {0}")]
    VerifierLength(usize),
    #[error("username must be between 3 and 20 characters, got {0}")]
    UsernameLength(usize),
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    #[error("account name already in use: {0}")]
    UsernameTaken(String),
    #[error("account unknown: {0}")]
    AccountUnknown(String),
}
