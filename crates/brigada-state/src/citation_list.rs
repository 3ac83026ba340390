//! Citation list with status/activity filters and inline attendance actions.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use brigada_core::{
  Resource,
  citation::{ActivityType, Citation, CitationStatus},
  store::{CitationQuery, CitationStore},
};
use brigada_repository::{CitationRepository, ResourceStream};

use crate::{ListPhase, request::RequestTracker};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationListState {
  pub result:        Option<Resource<Vec<Citation>>>,
  pub refreshing:    bool,
  pub status:        Option<CitationStatus>,
  pub activity_type: Option<ActivityType>,
  /// Outcome of the last confirm/reject issued from the list.
  pub attendance:    Option<Resource<Citation>>,
}

impl CitationListState {
  pub fn phase(&self) -> ListPhase { ListPhase::of(self.result.as_ref()) }

  pub fn query(&self) -> CitationQuery {
    CitationQuery {
      status:        self.status,
      activity_type: self.activity_type,
    }
  }
}

pub struct CitationListHolder<S> {
  inner: Arc<Inner<S>>,
}

struct Inner<S> {
  repo:       CitationRepository<S>,
  state:      watch::Sender<CitationListState>,
  lists:      RequestTracker,
  attendance: RequestTracker,
}

impl<S> Clone for CitationListHolder<S> {
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
    }
  }
}

impl<S> CitationListHolder<S>
where
  S: CitationStore + 'static,
{
  pub fn new(repo: CitationRepository<S>) -> Self {
    let (state, _) = watch::channel(CitationListState::default());
    Self {
      inner: Arc::new(Inner {
        repo,
        state,
        lists: RequestTracker::default(),
        attendance: RequestTracker::default(),
      }),
    }
  }

  pub fn subscribe(&self) -> watch::Receiver<CitationListState> { self.inner.state.subscribe() }

  pub fn snapshot(&self) -> CitationListState { self.inner.state.borrow().clone() }

  pub fn phase(&self) -> ListPhase { self.inner.state.borrow().phase() }

  pub async fn load(&self) { self.fetch(false, |_| {}).await }

  pub async fn retry(&self) { self.fetch(false, |_| {}).await }

  pub async fn refresh(&self) { self.fetch(true, |s| s.refreshing = true).await }

  pub async fn set_status_filter(&self, status: Option<CitationStatus>) {
    debug!(?status, "citation status filter changed");
    self.fetch(false, |s| s.status = status).await
  }

  pub async fn set_activity_filter(&self, activity_type: Option<ActivityType>) {
    debug!(?activity_type, "citation activity filter changed");
    self.fetch(false, |s| s.activity_type = activity_type).await
  }

  pub async fn clear_filters(&self) {
    self
      .fetch(false, |s| {
        s.status = None;
        s.activity_type = None;
      })
      .await
  }

  pub async fn confirm_attendance(&self, id: i64) -> bool {
    self.attend(self.inner.repo.confirm_attendance(id)).await
  }

  pub async fn reject_attendance(&self, id: i64) -> bool {
    self.attend(self.inner.repo.reject_attendance(id)).await
  }

  pub fn clear_attendance(&self) { self.inner.state.send_modify(|s| s.attendance = None) }

  /// Apply an attendance action, reloading the list when it succeeds.
  async fn attend(&self, stream: ResourceStream<Citation>) -> bool {
    let state = &self.inner.state;
    let ok = self
      .inner
      .attendance
      .drive(stream, |emission| state.send_modify(|s| s.attendance = Some(emission)))
      .await
      .unwrap_or(false);
    if ok {
      self.fetch(false, |_| {}).await;
    }
    ok
  }

  /// Apply `change` and take the list ticket in the same state write.
  async fn fetch(&self, refreshing: bool, change: impl FnOnce(&mut CitationListState)) {
    let lists = &self.inner.lists;
    let mut issued = None;
    self.inner.state.send_modify(|s| {
      change(s);
      issued = Some((lists.begin(), s.query()));
    });
    let Some((ticket, query)) = issued else { return };
    let state = &self.inner.state;
    lists
      .drive_as(ticket, self.inner.repo.list(query), |emission| {
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
