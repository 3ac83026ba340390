//! Dashboard: roster statistics and the signed-in user.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use brigada_core::{
  Resource,
  auth::{CredentialValidator, SessionStore, User},
  stats::Stats,
  store::PersonnelStore,
};
use brigada_repository::{AuthRepository, PersonnelRepository};

use crate::request::RequestTracker;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
  pub stats:      Option<Resource<Stats>>,
  pub user:       Option<User>,
  pub logged_out: bool,
}

pub struct DashboardHolder<S, C, P> {
  inner: Arc<Inner<S, C, P>>,
}

struct Inner<S, C, P> {
  personnel: PersonnelRepository<S>,
  auth:      AuthRepository<C, P>,
  state:     watch::Sender<DashboardState>,
  requests:  RequestTracker,
}

impl<S, C, P> Clone for DashboardHolder<S, C, P> {
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
    }
  }
}

impl<S, C, P> DashboardHolder<S, C, P>
where
  S: PersonnelStore + 'static,
  C: CredentialValidator + 'static,
  P: SessionStore + 'static,
{
  pub fn new(personnel: PersonnelRepository<S>, auth: AuthRepository<C, P>) -> Self {
    let (state, _) = watch::channel(DashboardState::default());
    Self {
      inner: Arc::new(Inner {
        personnel,
        auth,
        state,
        requests: RequestTracker::default(),
      }),
    }
  }

  pub fn subscribe(&self) -> watch::Receiver<DashboardState> { self.inner.state.subscribe() }

  pub fn snapshot(&self) -> DashboardState { self.inner.state.borrow().clone() }

  /// Read the session user and fetch fresh statistics.
  pub async fn load(&self) {
    let user = self.inner.auth.current_user().unwrap_or_else(|e| {
      warn!(error = %e, "could not read the session user");
      None
    });
    self.inner.state.send_modify(|s| s.user = user);

    let state = &self.inner.state;
    self
      .inner
      .requests
      .drive(self.inner.personnel.stats(), |emission| {
        state.send_modify(|s| s.stats = Some(emission))
      })
      .await;
  }

  pub async fn refresh(&self) { self.load().await }

  pub fn logout(&self) -> Result<(), P::Error> {
    self.inner.auth.logout()?;
    self.inner.state.send_modify(|s| {
      s.user = None;
      s.logged_out = true;
    });
    Ok(())
  }
}
