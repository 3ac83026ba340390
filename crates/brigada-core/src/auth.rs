//! Users and the identity collaborators the core consumes.
//!
//! Credential checking and session persistence belong to the host platform.
//! The core only calls them through [`CredentialValidator`] and
//! [`SessionStore`].

use serde::{Deserialize, Serialize};

/// Account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
  Admin,
  #[serde(rename = "usuario")]
  Member,
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:     i64,
  /// Login identifier; not always an email address.
  pub email:  String,
  pub name:   String,
  pub role:   String,
  pub kind:   UserKind,
  pub active: bool,
}

impl User {
  pub fn is_admin(&self) -> bool { self.kind == UserKind::Admin }
}

/// Checks an identifier/secret pair.
pub trait CredentialValidator: Send + Sync {
  /// Returns the matching user, or `None` when the pair is not recognised.
  fn validate(&self, identifier: &str, secret: &str) -> Option<User>;
}

/// Key-value persistence for the current session.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist `user` as the logged-in user together with its session token.
  fn save(&self, user: &User, token: &str) -> Result<(), Self::Error>;

  fn current_user(&self) -> Result<Option<User>, Self::Error>;

  fn is_logged_in(&self) -> Result<bool, Self::Error>;

  /// Forget everything about the session.
  fn clear(&self) -> Result<(), Self::Error>;
}
