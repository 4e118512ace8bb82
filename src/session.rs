//! # Session — the currently authenticated profile
//!
//! A desktop process has exactly one logical session. [`Session`] is a cheap
//! cloneable handle around shared state, constructed by the application and
//! injected into the store rather than living as a process-global: every part
//! that needs the logged-in profile holds its own clone of the same handle.
//!
//! The session is written only by a successful login; a failed login leaves
//! whatever was there before untouched.

use std::sync::{Arc, Mutex};

use crate::models::Profile;

/// Shared handle to the single authenticated profile, or empty.
#[derive(Clone, Debug, Default)]
pub struct Session {
    current: Arc<Mutex<Option<Profile>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current session profile.
    pub fn set(&self, profile: Profile) {
        *self.current.lock().unwrap() = Some(profile);
    }

    /// Snapshot of the current profile, if anyone is logged in.
    pub fn current(&self) -> Option<Profile> {
        self.current.lock().unwrap().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.lock().unwrap().is_some()
    }

    /// Log out: drop the current profile.
    pub fn clear(&self) {
        *self.current.lock().unwrap() = None;
    }
}
