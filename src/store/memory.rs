use std::sync::{Arc, Mutex};

use mongodb::bson::oid::ObjectId;

use crate::error::StoreError;
use crate::models::{Profile, User};
use crate::store::{CredentialStatus, ProfileBackend};

/// In-memory ProfileBackend for testing and offline demos.
///
/// Behaves like the MongoDB backend: one flat collection of both variants,
/// uniqueness enforced on insert, ids assigned on insert, insertion order
/// preserved for listings.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    profiles: Arc<Mutex<Vec<Profile>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing profile, assigning an id if it has none. Lets tests
    /// and demos start from a populated collection (e.g. with an Admin).
    pub fn seed(&self, mut profile: Profile) -> ObjectId {
        let id = profile.id().unwrap_or_else(ObjectId::new);
        match &mut profile {
            Profile::User(u) => u.id = Some(id),
            Profile::Admin(a) => a.id = Some(id),
        }
        self.profiles.lock().unwrap().push(profile);
        id
    }
}

impl ProfileBackend for MemoryBackend {
    async fn credential_status(
        &self,
        email: &str,
        username: &str,
    ) -> Result<CredentialStatus, StoreError> {
        let profiles = self.profiles.lock().unwrap();
        Ok(CredentialStatus {
            email_taken: profiles.iter().any(|p| p.email() == email),
            username_taken: profiles.iter().any(|p| p.username() == username),
        })
    }

    async fn insert_user(&self, user: &User) -> Result<ObjectId, StoreError> {
        let mut profiles = self.profiles.lock().unwrap();

        // Same guarantee the unique indexes give the MongoDB backend.
        let email_taken = profiles.iter().any(|p| p.email() == user.email);
        let username_taken = profiles.iter().any(|p| p.username() == user.username);
        if email_taken || username_taken {
            return Err(StoreError::DuplicateCredential {
                email_taken,
                username_taken,
            });
        }

        let id = ObjectId::new();
        let mut stored = user.clone();
        stored.id = Some(id);
        profiles.push(Profile::User(stored));
        Ok(id)
    }

    async fn find_by_credential(&self, credential: &str) -> Result<Option<Profile>, StoreError> {
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles
            .iter()
            .find(|p| p.email() == credential || p.username() == credential)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles
            .iter()
            .filter_map(|p| match p {
                Profile::User(u) => Some(u.clone()),
                Profile::Admin(_) => None,
            })
            .collect())
    }

    async fn update_user(&self, user: &User) -> Result<bool, StoreError> {
        let Some(id) = user.id else {
            return Ok(false);
        };

        let mut profiles = self.profiles.lock().unwrap();
        for profile in profiles.iter_mut() {
            if let Profile::User(stored) = profile {
                if stored.id == Some(id) {
                    // Only the mutable fields; email and username stay as
                    // they were created.
                    let mut updated = stored.clone();
                    updated.password = user.password.clone();
                    updated.name = user.name.clone();
                    updated.lastname = user.lastname.clone();
                    updated.telephone = user.telephone.clone();
                    updated.gender = user.gender;
                    updated.card = user.card.clone();

                    let changed = updated != *stored;
                    *stored = updated;
                    return Ok(changed);
                }
            }
        }
        Ok(false)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let mut profiles = self.profiles.lock().unwrap();
        let before = profiles.len();
        profiles.retain(|p| p.id() != Some(*id));
        Ok(profiles.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth;
    use crate::models::{Admin, Gender, NewUser};
    use crate::session::Session;
    use crate::store::ProfileStore;

    fn new_user(email: &str, username: &str, password: &str) -> NewUser {
        NewUser {
            email: email.into(),
            username: username.into(),
            password: password.into(),
            name: "Alice".into(),
            lastname: "Ashton".into(),
            telephone: "600111222".into(),
            gender: Gender::Female,
            card: "4000-1".into(),
        }
    }

    fn store() -> ProfileStore<MemoryBackend> {
        ProfileStore::new(MemoryBackend::new(), Session::new())
    }

    fn seeded_admin(backend: &MemoryBackend) -> ObjectId {
        backend.seed(Profile::Admin(Admin {
            id: None,
            email: "root@x.com".into(),
            username: "root".into(),
            password: auth::hash_password("rootpw").unwrap(),
            name: "Ruth".into(),
            lastname: "Root".into(),
            telephone: "600999888".into(),
            current_account: "ES12-3456".into(),
        }))
    }

    #[tokio::test]
    async fn register_assigns_id_and_hashes_password() {
        let store = store();
        let user = store
            .register(new_user("a@x.com", "alice", "p"))
            .await
            .unwrap();

        assert!(user.id.is_some());
        assert_ne!(user.password, "p");
        assert!(user.password.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn duplicate_email_rejects_and_inserts_nothing() {
        let store = store();
        store
            .register(new_user("a@x.com", "alice", "p"))
            .await
            .unwrap();

        let err = store
            .register(new_user("a@x.com", "bob", "q"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateCredential {
                email_taken: true,
                username_taken: false,
            }
        ));
        assert_eq!(store.users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_rejects() {
        let store = store();
        store
            .register(new_user("a@x.com", "alice", "p"))
            .await
            .unwrap();

        let err = store
            .register(new_user("b@x.com", "alice", "q"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateCredential {
                email_taken: false,
                username_taken: true,
            }
        ));
    }

    #[tokio::test]
    async fn duplicate_email_and_username_reports_both() {
        let store = store();
        store
            .register(new_user("a@x.com", "alice", "p"))
            .await
            .unwrap();

        let err = store
            .register(new_user("a@x.com", "alice", "q"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateCredential {
                email_taken: true,
                username_taken: true,
            }
        ));
    }

    #[tokio::test]
    async fn admin_credentials_also_block_registration() {
        let backend = MemoryBackend::new();
        seeded_admin(&backend);
        let store = ProfileStore::new(backend, Session::new());

        let err = store
            .register(new_user("root@x.com", "newbie", "p"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateCredential {
                email_taken: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn login_matches_email_or_username() {
        let store = store();
        store
            .register(new_user("a@x.com", "alice", "secret"))
            .await
            .unwrap();

        let by_email = store.login("a@x.com", "secret").await.unwrap().unwrap();
        assert_eq!(by_email.username(), "alice");

        let by_username = store.login("alice", "secret").await.unwrap().unwrap();
        assert_eq!(by_username.email(), "a@x.com");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_credential() {
        let store = store();
        store
            .register(new_user("a@x.com", "alice", "secret"))
            .await
            .unwrap();

        assert!(store.login("alice", "wrong").await.unwrap().is_none());
        assert!(store.login("nobody", "secret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn login_records_session_only_on_success() {
        let store = store();
        store
            .register(new_user("a@x.com", "alice", "secret"))
            .await
            .unwrap();

        assert!(store.login("alice", "wrong").await.unwrap().is_none());
        assert!(!store.session().is_authenticated());

        store.login("alice", "secret").await.unwrap().unwrap();
        assert_eq!(store.session().current().unwrap().username(), "alice");

        // A later failed login does not reset the session.
        assert!(store.login("alice", "wrong").await.unwrap().is_none());
        assert!(store.session().is_authenticated());
    }

    #[tokio::test]
    async fn admin_login_yields_admin_variant() {
        let backend = MemoryBackend::new();
        seeded_admin(&backend);
        let store = ProfileStore::new(backend, Session::new());

        let profile = store.login("root", "rootpw").await.unwrap().unwrap();
        assert!(matches!(profile, Profile::Admin(_)));
    }

    #[tokio::test]
    async fn users_lists_only_user_documents() {
        let backend = MemoryBackend::new();
        seeded_admin(&backend);
        let store = ProfileStore::new(backend, Session::new());

        let registered = store
            .register(new_user("a@x.com", "alice", "p"))
            .await
            .unwrap();

        let users = store.users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0], registered);
    }

    #[tokio::test]
    async fn update_reports_whether_anything_changed() {
        let store = store();
        let mut user = store
            .register(new_user("a@x.com", "alice", "p"))
            .await
            .unwrap();

        // Identical values: nothing to do.
        assert!(!store.update_user(&user).await.unwrap());

        user.telephone = "700000000".into();
        assert!(store.update_user(&user).await.unwrap());

        let users = store.users().await.unwrap();
        assert_eq!(users[0].telephone, "700000000");
    }

    #[tokio::test]
    async fn update_never_touches_email_or_username() {
        let store = store();
        let mut user = store
            .register(new_user("a@x.com", "alice", "p"))
            .await
            .unwrap();

        user.email = "hijack@x.com".into();
        user.username = "mallory".into();
        assert!(!store.update_user(&user).await.unwrap());

        let users = store.users().await.unwrap();
        assert_eq!(users[0].email, "a@x.com");
        assert_eq!(users[0].username, "alice");
    }

    #[tokio::test]
    async fn update_without_or_with_unknown_id_is_false() {
        let store = store();
        let mut user = store
            .register(new_user("a@x.com", "alice", "p"))
            .await
            .unwrap();
        user.name = "Alicia".into();

        let mut without_id = user.clone();
        without_id.id = None;
        assert!(!store.update_user(&without_id).await.unwrap());

        let mut unknown_id = user.clone();
        unknown_id.id = Some(ObjectId::new());
        assert!(!store.update_user(&unknown_id).await.unwrap());
    }

    #[tokio::test]
    async fn delete_is_idempotent_observable() {
        let store = store();
        let user = store
            .register(new_user("a@x.com", "alice", "p"))
            .await
            .unwrap();
        let id = user.id.unwrap();

        assert!(store.delete_user(&id).await.unwrap());
        assert!(!store.delete_user(&id).await.unwrap());
        assert!(store.users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleted_credentials_become_available_again() {
        let store = store();
        let user = store
            .register(new_user("a@x.com", "alice", "p"))
            .await
            .unwrap();
        store.delete_user(&user.id.unwrap()).await.unwrap();

        store
            .register(new_user("a@x.com", "alice", "p2"))
            .await
            .unwrap();
    }
}
