//! Structured error types for the profiledesk model layer.
//!
//! Uses `thiserror` so the controller gets composable, matchable errors.
//! Every store operation maps an underlying driver fault to exactly one
//! domain-level kind; the driver error stays attached as the source but is
//! never part of the outward classification.

use thiserror::Error;

/// Errors raised by [`crate::store::ProfileStore`] and its backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Registration rejected because the email and/or username is taken.
    #[error("credential already registered (email taken: {email_taken}, username taken: {username_taken})")]
    DuplicateCredential {
        email_taken: bool,
        username_taken: bool,
    },

    /// Inserting a new profile failed.
    #[error("failed to register profile")]
    Registration(#[source] mongodb::error::Error),

    /// Listing users failed.
    #[error("failed to retrieve users")]
    Retrieval(#[source] mongodb::error::Error),

    /// Updating a user failed.
    #[error("failed to update user")]
    Update(#[source] mongodb::error::Error),

    /// Deleting a user failed.
    #[error("failed to delete user")]
    Deletion(#[source] mongodb::error::Error),

    /// Looking up a profile during login failed. Bad credentials are *not*
    /// an error; they surface as an empty login result.
    #[error("login failed")]
    Login(#[source] mongodb::error::Error),

    /// The uniqueness pre-check during registration failed.
    #[error("failed to verify credential availability")]
    Verification(#[source] mongodb::error::Error),

    /// A stored document carries a `type` tag that is neither `"User"` nor
    /// `"Admin"`.
    #[error("unknown profile type tag {0:?}")]
    UnknownProfileType(String),

    /// Password hashing or hash parsing failed (not a mismatch).
    #[error("password handling failed")]
    Password(#[from] PasswordError),
}

/// Infrastructure failures in the Argon2 hashing path. A wrong password is
/// never an error; these cover hashing itself and malformed stored hashes.
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("failed to hash password")]
    Hash(#[source] argon2::password_hash::Error),

    #[error("stored password hash is malformed")]
    MalformedHash(#[source] argon2::password_hash::Error),
}

/// Errors raised while initializing the shared connection pool.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("failed to load database settings")]
    Settings(#[from] config::ConfigError),

    #[error("failed to connect to MongoDB")]
    Connect(#[from] mongodb::error::Error),
}
