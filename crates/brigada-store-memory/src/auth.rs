//! In-memory identity collaborators.

use std::sync::{Arc, RwLock};

use brigada_core::auth::{CredentialValidator, SessionStore, User, UserKind};

use crate::Error;

// ─── Credentials ─────────────────────────────────────────────────────────────

/// A fixed list of accounts with plaintext secrets. Demo use only.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
  accounts: Vec<(String, String, User)>,
}

impl StaticCredentials {
  pub fn new() -> Self { Self { accounts: Vec::new() } }

  /// The two demo accounts: `admin` / `1234` and `bombero@bomberos.cl` / `bomb345`.
  pub fn demo() -> Self {
    Self::new()
      .with_account("admin", "1234", User {
        id:     1,
        email:  "admin".into(),
        name:   "Administrador del Sistema".into(),
        role:   "Comandante".into(),
        kind:   UserKind::Admin,
        active: true,
      })
      .with_account("bombero@bomberos.cl", "bomb345", User {
        id:     2,
        email:  "bombero@bomberos.cl".into(),
        name:   "Usuario Bombero".into(),
        role:   "Bombero".into(),
        kind:   UserKind::Member,
        active: true,
      })
  }

  pub fn with_account(
    mut self,
    identifier: impl Into<String>,
    secret: impl Into<String>,
    user: User,
  ) -> Self {
    self.accounts.push((identifier.into(), secret.into(), user));
    self
  }
}

impl Default for StaticCredentials {
  fn default() -> Self { Self::demo() }
}

impl CredentialValidator for StaticCredentials {
  fn validate(&self, identifier: &str, secret: &str) -> Option<User> {
    self
      .accounts
      .iter()
      .find(|(id, s, _)| id == identifier && s == secret)
      .map(|(_, _, user)| user.clone())
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Session {
  user:  Option<User>,
  token: Option<String>,
}

/// A process-lifetime session store.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
  inner: Arc<RwLock<Session>>,
}

impl MemorySession {
  pub fn new() -> Self { Self::default() }

  /// The token saved with the current user.
  pub fn token(&self) -> Result<Option<String>, Error> {
    Ok(self.inner.read().map_err(|_| Error::Poisoned("session"))?.token.clone())
  }
}

impl SessionStore for MemorySession {
  type Error = Error;

  fn save(&self, user: &User, token: &str) -> Result<(), Error> {
    let mut session = self.inner.write().map_err(|_| Error::Poisoned("session"))?;
    session.user = Some(user.clone());
    session.token = Some(token.to_owned());
    Ok(())
  }

  fn current_user(&self) -> Result<Option<User>, Error> {
    Ok(self.inner.read().map_err(|_| Error::Poisoned("session"))?.user.clone())
  }

  fn is_logged_in(&self) -> Result<bool, Error> {
    Ok(self.inner.read().map_err(|_| Error::Poisoned("session"))?.user.is_some())
  }

  fn clear(&self) -> Result<(), Error> {
    *self.inner.write().map_err(|_| Error::Poisoned("session"))? = Session::default();
    Ok(())
  }
}
