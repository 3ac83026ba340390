//! Roster screen: searchable, status-filtered personnel list.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use brigada_core::{
  Resource,
  personnel::{Personnel, StatusFilter},
  store::PersonnelStore,
};
use brigada_repository::{PersonnelQuery, PersonnelRepository};

use crate::{ListPhase, request::RequestTracker};

/// Everything the roster screen renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonnelListState {
  /// `None` until the first load.
  pub result:     Option<Resource<Vec<Personnel>>>,
  /// Pull-to-refresh in flight.
  pub refreshing: bool,
  pub search:     String,
  pub status:     StatusFilter,
}

impl PersonnelListState {
  pub fn phase(&self) -> ListPhase { ListPhase::of(self.result.as_ref()) }

  fn query(&self) -> PersonnelQuery {
    PersonnelQuery {
      search: self.search.clone(),
      status: self.status,
    }
  }
}

/// State holder for the roster screen.
pub struct PersonnelListHolder<S> {
  inner: Arc<Inner<S>>,
}

struct Inner<S> {
  repo:     PersonnelRepository<S>,
  state:    watch::Sender<PersonnelListState>,
  requests: RequestTracker,
}

impl<S> Clone for PersonnelListHolder<S> {
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
    }
  }
}

impl<S> PersonnelListHolder<S>
where
  S: PersonnelStore + 'static,
{
  pub fn new(repo: PersonnelRepository<S>) -> Self {
    let (state, _) = watch::channel(PersonnelListState::default());
    Self {
      inner: Arc::new(Inner {
        repo,
        state,
        requests: RequestTracker::default(),
      }),
    }
  }

  pub fn subscribe(&self) -> watch::Receiver<PersonnelListState> { self.inner.state.subscribe() }

  pub fn snapshot(&self) -> PersonnelListState { self.inner.state.borrow().clone() }

  pub fn phase(&self) -> ListPhase { self.inner.state.borrow().phase() }

  pub async fn load(&self) { self.fetch(false, |_| {}).await }

  pub async fn retry(&self) { self.fetch(false, |_| {}).await }

  /// Reload without replacing the current list with a spinner.
  pub async fn refresh(&self) { self.fetch(true, |s| s.refreshing = true).await }

  pub async fn set_search_query(&self, query: impl Into<String>) {
    let query = query.into();
    debug!(%query, "personnel search changed");
    self.fetch(false, |s| s.search = query).await
  }

  pub async fn set_status_filter(&self, status: StatusFilter) {
    debug!(%status, "personnel status filter changed");
    self.fetch(false, |s| s.status = status).await
  }

  /// Drop an error result, keeping any stale rows it carried.
  pub fn clear_error(&self) {
    self.inner.state.send_if_modified(|s| match s.result.take() {
      Some(Resource::Error { data, .. }) => {
        s.result = data.map(Resource::Success);
        true
      }
      other => {
        s.result = other;
        false
      }
    });
  }

  /// Apply `change` and issue the request for the resulting query in one
  /// state write, so the newest ticket always matches the visible query.
  async fn fetch(&self, refreshing: bool, change: impl FnOnce(&mut PersonnelListState)) {
    let requests = &self.inner.requests;
    let mut issued = None;
    self.inner.state.send_modify(|s| {
      change(s);
      issued = Some((requests.begin(), s.query()));
    });
    let Some((ticket, query)) = issued else { return };
    let stream = self.inner.repo.list(query);
    let state = &self.inner.state;
    requests
      .drive_as(ticket, stream, |emission| {
        state.send_modify(|s| {
          if emission.is_terminal() {
            s.refreshing = false;
          } else if refreshing && s.result.is_some() {
            return;
          }
          s.result = Some(emission);
        })
      })
      .await;
  }
}
