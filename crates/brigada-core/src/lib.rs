//! Core types and trait definitions for the brigade roster.
//!
//! This crate is deliberately free of runtime and storage dependencies.
//! Every other crate depends on it; it depends on nothing proprietary.

pub mod auth;
pub mod citation;
pub mod error;
pub mod personnel;
pub mod resource;
pub mod stats;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
pub use resource::Resource;
