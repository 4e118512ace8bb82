//! # profiledesk — model layer for a desktop login/registration application
//!
//! This crate is everything below the controller/view of a small MVC desktop
//! application: configuration, the shared MongoDB client, and the profile
//! store the UI drives. The controller talks to exactly one surface —
//! [`ProfileStore`] — and receives login results as [`Profile`] values that
//! also land in the injected [`Session`].
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Argon2id password hashing and verification |
//! | [`db`] | Lazy `OnceCell` MongoDB client singleton and shutdown |
//! | [`error`] | `thiserror` taxonomy: one failure kind per store operation |
//! | [`models`] | `Profile` tagged union over `User` / `Admin` documents |
//! | [`session`] | Injected holder of the currently authenticated profile |
//! | [`settings`] | Layered configuration (defaults → `config.toml` → env) |
//! | [`store`] | `ProfileStore` service over the `ProfileBackend` trait |
//!
//! ## Wiring
//!
//! ```no_run
//! use profiledesk::{db, MongoBackend, ProfileStore, Session};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::new();
//! let store = ProfileStore::new(MongoBackend::from_pool().await?, session.clone());
//!
//! if let Some(profile) = store.login("alice", "secret").await? {
//!     println!("welcome, {}", profile.username());
//! }
//!
//! // At application shutdown:
//! db::pool::close().await;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod session;
pub mod settings;
pub mod store;

pub use error::{PasswordError, PoolError, StoreError};
pub use models::{Admin, Gender, NewUser, Profile, User};
pub use session::Session;
pub use settings::Settings;
pub use store::{MemoryBackend, MongoBackend, ProfileBackend, ProfileStore};
