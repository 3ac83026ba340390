//! [`CitationRepository`]: citations and the attendance workflow.

use std::sync::Arc;

use brigada_core::{
  citation::{Citation, CitationUpdate, NewCitation},
  store::{CitationQuery, CitationStore},
};

use crate::{
  Latency, ResourceStream,
  one_shot::{Op, one_shot},
};

const NOT_FOUND: &str = "Citation not found";

/// Repository over a [`CitationStore`].
pub struct CitationRepository<S> {
  store:   Arc<S>,
  latency: Latency,
}

impl<S> Clone for CitationRepository<S> {
  fn clone(&self) -> Self {
    Self {
      store:   self.store.clone(),
      latency: self.latency,
    }
  }
}

impl<S> CitationRepository<S>
where
  S: CitationStore + 'static,
{
  pub fn new(store: Arc<S>, latency: Latency) -> Self { Self { store, latency } }

  fn op(&self, name: &'static str, delay: std::time::Duration) -> Op {
    Op {
      name,
      delay,
      not_found: NOT_FOUND,
    }
  }

  /// Citations passing `query`, most recently scheduled first.
  pub fn list(&self, query: CitationQuery) -> ResourceStream<Vec<Citation>> {
    let store = self.store.clone();
    one_shot(self.op("citations.list", self.latency.list), move || {
      store.list(&query).map(Some)
    })
  }

  pub fn get(&self, id: i64) -> ResourceStream<Citation> {
    let store = self.store.clone();
    one_shot(self.op("citations.get", self.latency.get), move || store.get(id))
  }

  pub fn create(&self, draft: NewCitation) -> ResourceStream<Citation> {
    let store = self.store.clone();
    one_shot(self.op("citations.create", self.latency.mutate), move || {
      store.create(draft).map(Some)
    })
  }

  pub fn update(&self, id: i64, update: CitationUpdate) -> ResourceStream<Citation> {
    let store = self.store.clone();
    one_shot(self.op("citations.update", self.latency.mutate), move || {
      store.update(id, update)
    })
  }

  pub fn delete(&self, id: i64) -> ResourceStream<bool> {
    let store = self.store.clone();
    one_shot(self.op("citations.delete", self.latency.mutate), move || {
      store.delete(id).map(|removed| removed.then_some(true))
    })
  }

  pub fn confirm_attendance(&self, id: i64) -> ResourceStream<Citation> {
    let store = self.store.clone();
    one_shot(self.op("citations.confirm", self.latency.attendance), move || {
      store.confirm_attendance(id)
    })
  }

  pub fn reject_attendance(&self, id: i64) -> ResourceStream<Citation> {
    let store = self.store.clone();
    one_shot(self.op("citations.reject", self.latency.attendance), move || {
      store.reject_attendance(id)
    })
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use brigada_core::{
    Resource,
    citation::{ActivityType, CitationStatus},
  };
  use brigada_store_memory::MemoryStore;
  use chrono::Utc;
  use futures::StreamExt as _;
  use tokio::time::Instant;

  use super::*;

  fn repo(latency: Latency) -> CitationRepository<MemoryStore> {
    CitationRepository::new(Arc::new(MemoryStore::seeded(Utc::now())), latency)
  }

  async fn terminal<T>(s: ResourceStream<T>) -> Resource<T> {
    let mut all: Vec<Resource<T>> = s.collect().await;
    assert_eq!(all.len(), 2);
    assert!(all[0].is_loading());
    all.pop().expect("terminal value")
  }

  #[tokio::test]
  async fn list_applies_filters() {
    let repo = repo(Latency::none());
    let drills = terminal(repo.list(CitationQuery {
      activity_type: Some(ActivityType::Drill),
      ..Default::default()
    }))
    .await
    .into_data()
    .unwrap();
    assert_eq!(drills.len(), 1);
    assert_eq!(drills[0].status, CitationStatus::Completed);

    let none = terminal(repo.list(CitationQuery {
      status:        Some(CitationStatus::Cancelled),
      activity_type: None,
    }))
    .await;
    assert_eq!(none, Resource::Success(vec![]));
  }

  #[tokio::test]
  async fn confirm_twice_counts_twice() {
    let repo = repo(Latency::none());
    let first = terminal(repo.confirm_attendance(3)).await.into_data().unwrap();
    let second = terminal(repo.confirm_attendance(3)).await.into_data().unwrap();
    assert_eq!((first.confirmed_attendees, second.confirmed_attendees), (4, 5));
  }

  #[tokio::test]
  async fn reject_returns_the_unchanged_citation() {
    let repo = repo(Latency::none());
    let before = terminal(repo.get(3)).await.into_data().unwrap();
    assert_eq!(terminal(repo.reject_attendance(3)).await, Resource::Success(before));
  }

  #[tokio::test]
  async fn unknown_citation_reports_not_found() {
    let repo = repo(Latency::none());
    let expected: Resource<Citation> = Resource::error("Citation not found");
    assert_eq!(terminal(repo.get(99)).await, expected);
    assert_eq!(terminal(repo.confirm_attendance(99)).await, expected);
    assert_eq!(terminal(repo.reject_attendance(99)).await, expected);
    assert_eq!(terminal(repo.update(99, CitationUpdate::default())).await, expected);
    assert_eq!(terminal(repo.delete(99)).await, Resource::error("Citation not found"));
  }

  #[tokio::test]
  async fn update_then_delete() {
    let repo = repo(Latency::none());
    let updated = terminal(repo.update(4, CitationUpdate {
      status: Some(CitationStatus::Cancelled),
      ..Default::default()
    }))
    .await
    .into_data()
    .unwrap();
    assert_eq!(updated.status, CitationStatus::Cancelled);
    assert_eq!(updated.title, "Ceremonia del Día del Bombero");

    assert_eq!(terminal(repo.delete(4)).await, Resource::Success(true));
    assert!(terminal(repo.get(4)).await.is_error());
  }

  #[tokio::test(start_paused = true)]
  async fn attendance_uses_its_own_latency() {
    let repo = repo(Latency::default());
    let start = Instant::now();
    terminal(repo.confirm_attendance(1)).await;
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_millis(500));
  }
}
