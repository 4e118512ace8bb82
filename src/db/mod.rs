//! Shared MongoDB client handle and its lifecycle.

pub mod pool;
