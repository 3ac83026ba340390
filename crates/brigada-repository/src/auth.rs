//! [`AuthRepository`]: login and session management.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use brigada_core::auth::{CredentialValidator, SessionStore, User};

use crate::{
  Latency, ResourceStream,
  one_shot::{Op, one_shot},
};

/// Repository over the credential validator and session store collaborators.
pub struct AuthRepository<C, P> {
  credentials: Arc<C>,
  session:     Arc<P>,
  latency:     Latency,
}

impl<C, P> Clone for AuthRepository<C, P> {
  fn clone(&self) -> Self {
    Self {
      credentials: self.credentials.clone(),
      session:     self.session.clone(),
      latency:     self.latency,
    }
  }
}

impl<C, P> AuthRepository<C, P>
where
  C: CredentialValidator + 'static,
  P: SessionStore + 'static,
{
  pub fn new(credentials: Arc<C>, session: Arc<P>, latency: Latency) -> Self {
    Self {
      credentials,
      session,
      latency,
    }
  }

  /// Check the credentials and, on a match, persist the user with a fresh
  /// session token.
  pub fn login(&self, identifier: String, secret: String) -> ResourceStream<User> {
    let credentials = self.credentials.clone();
    let session = self.session.clone();
    let op = Op {
      name:      "auth.login",
      delay:     self.latency.login,
      not_found: "Invalid credentials",
    };
    one_shot(op, move || {
      let Some(user) = credentials.validate(&identifier, &secret) else {
        return Ok::<_, P::Error>(None);
      };
      let token = Uuid::new_v4().to_string();
      session.save(&user, &token)?;
      info!(user_id = user.id, "logged in");
      Ok(Some(user))
    })
  }

  pub fn logout(&self) -> Result<(), P::Error> {
    self.session.clear()?;
    info!("logged out");
    Ok(())
  }

  pub fn current_user(&self) -> Result<Option<User>, P::Error> { self.session.current_user() }

  pub fn is_logged_in(&self) -> Result<bool, P::Error> { self.session.is_logged_in() }
}
