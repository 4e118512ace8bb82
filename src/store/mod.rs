//! # Profile store — domain operations over an abstract profile backend
//!
//! [`ProfileStore`] is the single contract the model layer exposes to the
//! controller: `register`, `login`, `users`, `update_user`, `delete_user`.
//! All persistence goes through the [`ProfileBackend`] trait, so the same
//! logic runs against MongoDB ([`MongoBackend`]) in the application and an
//! in-memory store ([`MemoryBackend`]) in tests.
//!
//! ## Registration
//!
//! Registration first asks the backend which of the submitted email/username
//! are already taken, so the caller gets a precise
//! [`StoreError::DuplicateCredential`] naming the offending credential(s).
//! The backend itself enforces uniqueness on insert as well (unique indexes
//! on MongoDB), so two racing registrations cannot both slip past the
//! pre-check; the loser's insert is reported as the same duplicate error.
//! The plaintext password never reaches the backend — it is hashed with
//! Argon2id ([`crate::auth`]) before the record is built.
//!
//! ## Login
//!
//! A credential matches on email *or* username. A missing document or a
//! failed password verification is an empty result, not an error. On
//! success the profile is recorded in the injected [`Session`].
//!
//! ## Update / delete
//!
//! `update_user` touches only the mutable fields (password, name, lastname,
//! telephone, gender, card) and answers `true` only if a stored value
//! actually changed; email and username are immutable after creation.
//! `delete_user` answers whether a document was removed, so a second delete
//! of the same id reports `false`.

mod memory;
mod mongo;

pub use memory::MemoryBackend;
pub use mongo::MongoBackend;

use mongodb::bson::oid::ObjectId;

use crate::auth;
use crate::error::StoreError;
use crate::models::{NewUser, Profile, User};
use crate::session::Session;

/// Which of a submitted email/username pair already exist in the collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialStatus {
    pub email_taken: bool,
    pub username_taken: bool,
}

impl CredentialStatus {
    pub fn any_taken(&self) -> bool {
        self.email_taken || self.username_taken
    }
}

/// Async interface to the `profiles` collection.
///
/// Implementations live in sibling modules ([`mongo`], [`memory`]). Every
/// method classifies its own failures into the per-operation
/// [`StoreError`] kinds; uniqueness of email and username is enforced by
/// the backend itself, not only by the store's pre-check.
pub trait ProfileBackend {
    fn credential_status(
        &self,
        email: &str,
        username: &str,
    ) -> impl std::future::Future<Output = Result<CredentialStatus, StoreError>>;

    /// Insert a new user document and return its generated id.
    fn insert_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<ObjectId, StoreError>>;

    /// Find the profile whose email or username equals `credential`.
    fn find_by_credential(
        &self,
        credential: &str,
    ) -> impl std::future::Future<Output = Result<Option<Profile>, StoreError>>;

    /// All documents tagged `type = "User"`, in backend-native order.
    fn list_users(&self) -> impl std::future::Future<Output = Result<Vec<User>, StoreError>>;

    /// Apply the mutable fields of `user` to the document matching its id.
    /// `Ok(true)` only if at least one stored value changed.
    fn update_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>>;

    /// Remove the document matching `id`. `Ok(true)` if one was removed.
    fn delete(&self, id: &ObjectId) -> impl std::future::Future<Output = Result<bool, StoreError>>;
}

/// High-level profile operations, generic over the storage backend.
pub struct ProfileStore<B: ProfileBackend> {
    backend: B,
    session: Session,
}

impl<B: ProfileBackend> ProfileStore<B> {
    /// Build a store over `backend`, recording logins into `session`.
    pub fn new(backend: B, session: Session) -> Self {
        Self { backend, session }
    }

    /// Register a new user account.
    ///
    /// Fails with [`StoreError::DuplicateCredential`] if the email and/or
    /// username is already registered (both are checked, so a caller can
    /// report exactly which one collided). On success returns the stored
    /// user with its generated id and hashed password.
    pub async fn register(&self, new: NewUser) -> Result<User, StoreError> {
        let status = self
            .backend
            .credential_status(&new.email, &new.username)
            .await?;
        if status.any_taken() {
            tracing::debug!(
                email_taken = status.email_taken,
                username_taken = status.username_taken,
                "registration rejected"
            );
            return Err(StoreError::DuplicateCredential {
                email_taken: status.email_taken,
                username_taken: status.username_taken,
            });
        }

        let hash = auth::hash_password(&new.password)?;
        let mut user = new.into_user(hash);
        let id = self.backend.insert_user(&user).await?;
        user.id = Some(id);

        tracing::debug!(username = %user.username, "registered new user");
        Ok(user)
    }

    /// Authenticate by email-or-username and password.
    ///
    /// `Ok(None)` when no profile matches the credential or the password
    /// does not verify; the session is left untouched in that case. On
    /// success the matched profile becomes the current session profile.
    pub async fn login(
        &self,
        credential: &str,
        password: &str,
    ) -> Result<Option<Profile>, StoreError> {
        let Some(profile) = self.backend.find_by_credential(credential).await? else {
            return Ok(None);
        };

        let valid = auth::verify_password(password, profile.password())?;
        if !valid {
            return Ok(None);
        }

        self.session.set(profile.clone());
        tracing::debug!(username = %profile.username(), "login succeeded");
        Ok(Some(profile))
    }

    /// All registered users. Order is backend-native and not guaranteed
    /// stable across calls.
    pub async fn users(&self) -> Result<Vec<User>, StoreError> {
        self.backend.list_users().await
    }

    /// Update the mutable fields of an existing user.
    ///
    /// Returns `Ok(false)` when the user has no id yet, no document matches
    /// the id, or every submitted value equals the stored one.
    pub async fn update_user(&self, user: &User) -> Result<bool, StoreError> {
        if user.id.is_none() {
            return Ok(false);
        }
        self.backend.update_user(user).await
    }

    /// Delete a user by id. `Ok(true)` exactly when a document was removed.
    pub async fn delete_user(&self, id: &ObjectId) -> Result<bool, StoreError> {
        self.backend.delete(id).await
    }

    /// The session this store records logins into.
    pub fn session(&self) -> &Session {
        &self.session
    }
}
