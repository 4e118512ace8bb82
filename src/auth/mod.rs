//! Credential handling for the local login path.

mod password;

pub use password::{hash_password, verify_password};
