//! # Profile models — the two account variants stored in `profiles`
//!
//! Defines the polymorphic account entity persisted in the single `profiles`
//! collection:
//!
//! - [`User`] — a regular account with a gender and a card identifier.
//! - [`Admin`] — an administrative account holding a current-account reference.
//! - [`Profile`] — the tagged union over both, discriminated by the `type`
//!   document field (`"User"` | `"Admin"`).
//!
//! Both variants share the identity fields (`_id`, `email`, `username`), the
//! stored credential (`password`, always a PHC-format Argon2 hash — see
//! [`crate::auth`]) and the contact fields (`name`, `lastname`, `telephone`).
//! `email` and `username` are unique across the whole collection and immutable
//! once the document exists; `_id` is assigned by the store on insert.
//!
//! [`NewUser`] is the registration input: the same fields as [`User`] minus
//! the id, carrying the *plaintext* password that the store hashes before
//! anything is persisted.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Gender of a regular user, stored as an uppercase string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Full user record from the `profiles` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub username: String,
    /// PHC-format Argon2 hash, never the plaintext password.
    pub password: String,
    pub name: String,
    pub lastname: String,
    pub telephone: String,
    pub gender: Gender,
    pub card: String,
}

/// Administrator record from the `profiles` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub username: String,
    /// PHC-format Argon2 hash, never the plaintext password.
    pub password: String,
    pub name: String,
    pub lastname: String,
    pub telephone: String,
    #[serde(rename = "currentAccount")]
    pub current_account: String,
}

/// An authenticated principal: either account variant, discriminated by the
/// `type` field of the stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Profile {
    User(User),
    Admin(Admin),
}

impl Profile {
    pub fn id(&self) -> Option<ObjectId> {
        match self {
            Profile::User(u) => u.id,
            Profile::Admin(a) => a.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Profile::User(u) => &u.email,
            Profile::Admin(a) => &a.email,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Profile::User(u) => &u.username,
            Profile::Admin(a) => &a.username,
        }
    }

    /// Stored password hash of either variant.
    pub fn password(&self) -> &str {
        match self {
            Profile::User(u) => &u.password,
            Profile::Admin(a) => &a.password,
        }
    }
}

/// Registration input for a new user account.
///
/// `password` is the plaintext submitted by the registration form; the store
/// hashes it before building the persisted [`User`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub name: String,
    pub lastname: String,
    pub telephone: String,
    pub gender: Gender,
    pub card: String,
}

impl NewUser {
    /// Build the persisted record, replacing the plaintext password with the
    /// given hash. The id stays unset until the backend assigns one.
    pub(crate) fn into_user(self, password_hash: String) -> User {
        User {
            id: None,
            email: self.email,
            username: self.username,
            password: password_hash,
            name: self.name,
            lastname: self.lastname,
            telephone: self.telephone,
            gender: self.gender,
            card: self.card,
        }
    }
}
