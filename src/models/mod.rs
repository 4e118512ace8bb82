//! Database models for the `profiles` collection.

mod profile;

pub use profile::{Admin, Gender, NewUser, Profile, User};
