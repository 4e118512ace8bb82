//! MongoDB backend for the `profiles` collection.
//!
//! Documents carry a `type` discriminator (`"User"` | `"Admin"`) and live in
//! one collection; decoding dispatches on that tag and treats any other
//! value as an explicit [`StoreError::UnknownProfileType`]. Uniqueness of
//! `email` and `username` is enforced by unique indexes, so a duplicate that
//! slips past the store's pre-check still fails at the insert and is
//! reported as the same [`StoreError::DuplicateCredential`].

use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::db::pool;
use crate::error::{PoolError, StoreError};
use crate::models::{Admin, Profile, User};
use crate::store::{CredentialStatus, ProfileBackend};

const COLLECTION: &str = "profiles";

/// Profile storage backed by a MongoDB collection.
#[derive(Clone, Debug)]
pub struct MongoBackend {
    profiles: Collection<Document>,
}

impl MongoBackend {
    /// Build a backend over an explicitly provided database handle.
    pub fn new(database: &Database) -> Self {
        Self {
            profiles: database.collection(COLLECTION),
        }
    }

    /// Build a backend over the shared connection pool and make sure the
    /// unique credential indexes exist.
    pub async fn from_pool() -> Result<Self, PoolError> {
        let backend = Self::new(pool::database().await?);
        backend.ensure_indexes().await?;
        Ok(backend)
    }

    /// Create the unique indexes on `email` and `username`. Idempotent.
    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        for field in ["email", "username"] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();
            self.profiles.create_index(index).await?;
        }
        tracing::debug!("unique credential indexes in place");
        Ok(())
    }
}

/// Decode a stored document into the variant named by its `type` tag.
fn decode_profile(document: Document) -> Result<Profile, StoreError> {
    let tag = document.get_str("type").unwrap_or_default().to_owned();
    match tag.as_str() {
        "User" => bson::from_document::<User>(document)
            .map(Profile::User)
            .map_err(|e| StoreError::Login(e.into())),
        "Admin" => bson::from_document::<Admin>(document)
            .map(Profile::Admin)
            .map_err(|e| StoreError::Login(e.into())),
        _ => Err(StoreError::UnknownProfileType(tag)),
    }
}

/// Map a duplicate-key write error (E11000) on the unique credential
/// indexes to the duplicate classification, naming the offending index.
fn duplicate_from_insert(err: &mongodb::error::Error) -> Option<StoreError> {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() {
        if write_error.code == 11000 {
            return Some(StoreError::DuplicateCredential {
                email_taken: write_error.message.contains("email"),
                username_taken: write_error.message.contains("username"),
            });
        }
    }
    None
}

impl ProfileBackend for MongoBackend {
    async fn credential_status(
        &self,
        email: &str,
        username: &str,
    ) -> Result<CredentialStatus, StoreError> {
        let email_count = self
            .profiles
            .count_documents(doc! { "email": email })
            .await
            .map_err(StoreError::Verification)?;
        let username_count = self
            .profiles
            .count_documents(doc! { "username": username })
            .await
            .map_err(StoreError::Verification)?;

        Ok(CredentialStatus {
            email_taken: email_count > 0,
            username_taken: username_count > 0,
        })
    }

    async fn insert_user(&self, user: &User) -> Result<ObjectId, StoreError> {
        let document = bson::to_document(&Profile::User(user.clone()))
            .map_err(|e| StoreError::Registration(e.into()))?;

        let result = self.profiles.insert_one(document).await.map_err(|e| {
            duplicate_from_insert(&e).unwrap_or(StoreError::Registration(e))
        })?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Registration(invalid_id_error()))
    }

    async fn find_by_credential(&self, credential: &str) -> Result<Option<Profile>, StoreError> {
        let filter = doc! { "$or": [ { "email": credential }, { "username": credential } ] };
        let document = self
            .profiles
            .find_one(filter)
            .await
            .map_err(StoreError::Login)?;

        document.map(decode_profile).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut cursor = self
            .profiles
            .find(doc! { "type": "User" })
            .await
            .map_err(StoreError::Retrieval)?;

        let mut users = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(StoreError::Retrieval)? {
            let user =
                bson::from_document::<User>(document).map_err(|e| StoreError::Retrieval(e.into()))?;
            users.push(user);
        }
        Ok(users)
    }

    async fn update_user(&self, user: &User) -> Result<bool, StoreError> {
        let Some(id) = user.id else {
            return Ok(false);
        };

        let gender = bson::to_bson(&user.gender).map_err(|e| StoreError::Update(e.into()))?;
        let update = doc! { "$set": {
            "password": &user.password,
            "name": &user.name,
            "lastname": &user.lastname,
            "telephone": &user.telephone,
            "gender": gender,
            "card": &user.card,
        }};

        let result = self
            .profiles
            .update_one(doc! { "_id": id }, update)
            .await
            .map_err(StoreError::Update)?;

        // modified_count, not matched_count: an update that changes nothing
        // reports false.
        Ok(result.modified_count > 0)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let result = self
            .profiles
            .delete_one(doc! { "_id": id })
            .await
            .map_err(StoreError::Deletion)?;
        Ok(result.deleted_count > 0)
    }
}

fn invalid_id_error() -> mongodb::error::Error {
    std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        "insert did not return an ObjectId",
    )
    .into()
}
