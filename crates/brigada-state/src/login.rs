//! Login screen.

use std::sync::Arc;

use tokio::sync::watch;

use brigada_core::{
  Resource,
  auth::{CredentialValidator, SessionStore, User},
  validate,
};
use brigada_repository::AuthRepository;

use crate::request::RequestTracker;

pub const DEMO_ADMIN: (&str, &str) = ("admin", "1234");
pub const DEMO_MEMBER: (&str, &str) = ("bombero@bomberos.cl", "bomb345");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginState {
  pub identifier:       String,
  pub secret:           String,
  pub secret_visible:   bool,
  pub identifier_error: Option<String>,
  pub secret_error:     Option<String>,
  pub result:           Option<Resource<User>>,
}

impl LoginState {
  pub fn logged_in(&self) -> Option<&User> {
    match &self.result {
      Some(Resource::Success(user)) => Some(user),
      _ => None,
    }
  }

  fn validate(&mut self) -> bool {
    self.identifier_error = None;
    self.secret_error = None;
    if !validate::is_not_blank(&self.identifier) {
      self.identifier_error = Some("Email is required".into());
    }
    if !validate::is_not_blank(&self.secret) {
      self.secret_error = Some("Password is required".into());
    } else if !validate::is_valid_password(&self.secret) {
      self.secret_error = Some(format!(
        "Password must have at least {} characters",
        validate::PASSWORD_MIN_LEN
      ));
    }
    self.identifier_error.is_none() && self.secret_error.is_none()
  }
}

pub struct LoginHolder<C, P> {
  inner: Arc<Inner<C, P>>,
}

struct Inner<C, P> {
  auth:     AuthRepository<C, P>,
  state:    watch::Sender<LoginState>,
  requests: RequestTracker,
}

impl<C, P> Clone for LoginHolder<C, P> {
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
    }
  }
}

impl<C, P> LoginHolder<C, P>
where
  C: CredentialValidator + 'static,
  P: SessionStore + 'static,
{
  pub fn new(auth: AuthRepository<C, P>) -> Self {
    let (state, _) = watch::channel(LoginState::default());
    Self {
      inner: Arc::new(Inner {
        auth,
        state,
        requests: RequestTracker::default(),
      }),
    }
  }

  pub fn subscribe(&self) -> watch::Receiver<LoginState> { self.inner.state.subscribe() }

  pub fn snapshot(&self) -> LoginState { self.inner.state.borrow().clone() }

  /// Typing into a field clears its error.
  pub fn set_identifier(&self, value: impl Into<String>) {
    let value = value.into();
    self.inner.state.send_modify(|s| {
      s.identifier = value;
      s.identifier_error = None;
    });
  }

  pub fn set_secret(&self, value: impl Into<String>) {
    let value = value.into();
    self.inner.state.send_modify(|s| {
      s.secret = value;
      s.secret_error = None;
    });
  }

  pub fn toggle_secret_visibility(&self) {
    self.inner.state.send_modify(|s| s.secret_visible = !s.secret_visible);
  }

  pub fn fill_demo_admin(&self) { self.fill(DEMO_ADMIN) }

  pub fn fill_demo_member(&self) { self.fill(DEMO_MEMBER) }

  fn fill(&self, (identifier, secret): (&str, &str)) {
    self.inner.state.send_modify(|s| {
      s.identifier = identifier.to_owned();
      s.secret = secret.to_owned();
    });
  }

  /// Validate the fields and, if they pass, attempt to log in. Returns the
  /// user on success.
  pub async fn login(&self) -> Option<User> {
    let mut credentials = None;
    self.inner.state.send_modify(|s| {
      if s.validate() {
        credentials = Some((s.identifier.clone(), s.secret.clone()));
      }
    });
    let (identifier, secret) = credentials?;

    let state = &self.inner.state;
    self
      .inner
      .requests
      .drive(self.inner.auth.login(identifier, secret), |emission| {
        state.send_modify(|s| s.result = Some(emission))
      })
      .await;
    self.inner.state.borrow().logged_in().cloned()
  }

  /// Forget the last login outcome.
  pub fn clear(&self) { self.inner.state.send_modify(|s| s.result = None) }
}

#[cfg(test)]
mod tests {
  use brigada_core::auth::UserKind;
  use brigada_repository::Latency;
  use brigada_store_memory::{MemorySession, StaticCredentials};

  use super::*;

  fn holder() -> (LoginHolder<StaticCredentials, MemorySession>, Arc<MemorySession>) {
    let session = Arc::new(MemorySession::new());
    let auth =
      AuthRepository::new(Arc::new(StaticCredentials::demo()), session.clone(), Latency::none());
    (LoginHolder::new(auth), session)
  }

  #[tokio::test]
  async fn blank_fields_are_rejected_locally() {
    let (h, session) = holder();
    assert_eq!(h.login().await, None);
    let s = h.snapshot();
    assert_eq!(s.identifier_error.as_deref(), Some("Email is required"));
    assert_eq!(s.secret_error.as_deref(), Some("Password is required"));
    assert_eq!(s.result, None);
    assert!(!session.is_logged_in().unwrap());

    h.set_identifier("admin");
    assert_eq!(h.snapshot().identifier_error, None);
  }

  #[tokio::test]
  async fn short_password_is_rejected() {
    let (h, _) = holder();
    h.set_identifier("admin");
    h.set_secret("123");
    assert_eq!(h.login().await, None);
    assert_eq!(
      h.snapshot().secret_error.as_deref(),
      Some("Password must have at least 4 characters")
    );
  }

  #[tokio::test]
  async fn demo_credentials_log_in() {
    let (h, session) = holder();
    h.fill_demo_member();
    let user = h.login().await.unwrap();
    assert_eq!(user.kind, UserKind::Member);
    assert!(session.is_logged_in().unwrap());

    h.clear();
    assert_eq!(h.snapshot().result, None);
  }

  #[tokio::test]
  async fn wrong_password_surfaces_the_error() {
    let (h, _) = holder();
    h.set_identifier("admin");
    h.set_secret("9999");
    assert_eq!(h.login().await, None);
    assert_eq!(h.snapshot().result, Some(Resource::error("Invalid credentials")));
  }

  #[test]
  fn visibility_toggles() {
    let (h, _) = holder();
    h.toggle_secret_visibility();
    assert!(h.snapshot().secret_visible);
    h.toggle_secret_visibility();
    assert!(!h.snapshot().secret_visible);
  }
}
