//! In-memory backend for the brigade roster.
//!
//! Both collections live behind `RwLock`s inside a reference-counted
//! [`MemoryStore`], so clones share state and concurrent writers are
//! serialised. Nothing is written to disk.

mod auth;
mod seed;
mod store;

pub mod error;

pub use auth::{MemorySession, StaticCredentials};
pub use error::{Error, Result};
pub use store::{MemoryStore, RejectAttendance, StoreOptions};
