//! Personnel detail screen.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use brigada_core::{Resource, personnel::Personnel, store::PersonnelStore};
use brigada_repository::PersonnelRepository;

use crate::request::RequestTracker;

const INVALID_ID: &str = "Invalid personnel id";

#[derive(Debug, Clone, PartialEq)]
pub struct PersonnelDetailState {
  /// Identity received from navigation; `None` if it was missing or invalid.
  pub id:       Option<i64>,
  pub result:   Option<Resource<Personnel>>,
  /// Outcome of the last delete request.
  pub deletion: Option<Resource<bool>>,
}

impl PersonnelDetailState {
  /// Whether the record is gone and the screen should navigate back.
  pub fn deleted(&self) -> bool { matches!(self.deletion, Some(Resource::Success(true))) }
}

pub struct PersonnelDetailHolder<S> {
  inner: Arc<Inner<S>>,
}

struct Inner<S> {
  repo:    PersonnelRepository<S>,
  state:   watch::Sender<PersonnelDetailState>,
  loads:   RequestTracker,
  deletes: RequestTracker,
}

impl<S> Clone for PersonnelDetailHolder<S> {
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
    }
  }
}

impl<S> PersonnelDetailHolder<S>
where
  S: PersonnelStore + 'static,
{
  /// A holder for the record `id`. A missing or non-positive id is reported
  /// as an error straight away and never reaches the repository.
  pub fn new(repo: PersonnelRepository<S>, id: Option<i64>) -> Self {
    let id = id.filter(|id| *id > 0);
    let result = match id {
      Some(_) => None,
      None => Some(Resource::error(INVALID_ID)),
    };
    let (state, _) = watch::channel(PersonnelDetailState {
      id,
      result,
      deletion: None,
    });
    Self {
      inner: Arc::new(Inner {
        repo,
        state,
        loads: RequestTracker::default(),
        deletes: RequestTracker::default(),
      }),
    }
  }

  pub fn subscribe(&self) -> watch::Receiver<PersonnelDetailState> {
    self.inner.state.subscribe()
  }

  pub fn snapshot(&self) -> PersonnelDetailState { self.inner.state.borrow().clone() }

  pub async fn load(&self) {
    let Some(id) = self.inner.state.borrow().id else {
      debug!("personnel detail has no valid id; not loading");
      return;
    };
    let state = &self.inner.state;
    self
      .inner
      .loads
      .drive(self.inner.repo.get(id), |emission| {
        state.send_modify(|s| s.result = Some(emission))
      })
      .await;
  }

  pub async fn reload(&self) { self.load().await }

  /// Delete the displayed record. Returns whether it was removed.
  pub async fn delete(&self) -> bool {
    let id = {
      let s = self.inner.state.borrow();
      match (s.id, s.result.as_ref().and_then(Resource::data)) {
        (Some(id), Some(_)) => id,
        _ => return false,
      }
    };
    let state = &self.inner.state;
    let outcome = self
      .inner
      .deletes
      .drive(self.inner.repo.delete(id), |emission| {
        if let Resource::Error { message, .. } = &emission {
          warn!(id, %message, "personnel delete failed");
        }
        state.send_modify(|s| s.deletion = Some(emission))
      })
      .await;
    outcome.unwrap_or(false)
  }

  pub fn clear_deletion(&self) { self.inner.state.send_modify(|s| s.deletion = None) }
}

#[cfg(test)]
mod tests {
  use brigada_repository::Latency;
  use brigada_store_memory::MemoryStore;
  use chrono::Utc;

  use super::*;

  fn holder(id: Option<i64>) -> PersonnelDetailHolder<MemoryStore> {
    let store = Arc::new(MemoryStore::seeded(Utc::now()));
    PersonnelDetailHolder::new(PersonnelRepository::new(store, Latency::none()), id)
  }

  #[tokio::test]
  async fn loads_the_record() {
    let h = holder(Some(2));
    assert_eq!(h.snapshot().result, None);
    h.load().await;
    let s = h.snapshot();
    assert_eq!(s.result.and_then(Resource::into_data).map(|p| p.rank), Some("Capitán".into()));
  }

  #[tokio::test]
  async fn invalid_id_is_an_immediate_error() {
    for id in [None, Some(0), Some(-3)] {
      let h = holder(id);
      assert_eq!(h.snapshot().result, Some(Resource::error(INVALID_ID)));
      h.load().await;
      assert_eq!(h.snapshot().result, Some(Resource::error(INVALID_ID)));
    }
  }

  #[tokio::test]
  async fn unknown_id_reports_not_found() {
    let h = holder(Some(77));
    h.reload().await;
    assert_eq!(h.snapshot().result, Some(Resource::error("Personnel not found")));
  }

  #[tokio::test]
  async fn delete_requires_a_loaded_record() {
    let h = holder(Some(3));
    assert!(!h.delete().await);
    assert_eq!(h.snapshot().deletion, None);

    h.load().await;
    assert!(h.delete().await);
    assert!(h.snapshot().deleted());

    h.reload().await;
    assert!(h.snapshot().result.is_some_and(|r| r.is_error()));
  }
}
