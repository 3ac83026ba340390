//! [`PersonnelRepository`]: personnel records and dashboard statistics.

use std::sync::Arc;

use chrono::Utc;

use brigada_core::{
  personnel::{NewPersonnel, Personnel, StatusFilter},
  stats::Stats,
  store::PersonnelStore,
};

use crate::{
  Latency, ResourceStream,
  one_shot::{Op, one_shot},
};

const NOT_FOUND: &str = "Personnel not found";

/// Parameters of a personnel listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonnelQuery {
  pub search: String,
  pub status: StatusFilter,
}

/// Repository over a [`PersonnelStore`].
pub struct PersonnelRepository<S> {
  store:   Arc<S>,
  latency: Latency,
}

impl<S> Clone for PersonnelRepository<S> {
  fn clone(&self) -> Self {
    Self {
      store:   self.store.clone(),
      latency: self.latency,
    }
  }
}

impl<S> PersonnelRepository<S>
where
  S: PersonnelStore + 'static,
{
  pub fn new(store: Arc<S>, latency: Latency) -> Self { Self { store, latency } }

  fn op(&self, name: &'static str, delay: std::time::Duration) -> Op {
    Op {
      name,
      delay,
      not_found: NOT_FOUND,
    }
  }

  /// List personnel. A non-blank search takes precedence over the status
  /// filter; otherwise the status filter applies.
  pub fn list(&self, query: PersonnelQuery) -> ResourceStream<Vec<Personnel>> {
    let store = self.store.clone();
    one_shot(self.op("personnel.list", self.latency.list), move || {
      if query.search.trim().is_empty() {
        store.list_by_status(query.status).map(Some)
      } else {
        store.search(&query.search).map(Some)
      }
    })
  }

  pub fn get(&self, id: i64) -> ResourceStream<Personnel> {
    let store = self.store.clone();
    one_shot(self.op("personnel.get", self.latency.get), move || store.get(id))
  }

  /// Statistics computed from the current roster.
  pub fn stats(&self) -> ResourceStream<Stats> {
    let store = self.store.clone();
    one_shot(self.op("personnel.stats", self.latency.stats), move || {
      store
        .list_all()
        .map(|all| Some(Stats::compute(&all, Utc::now())))
    })
  }

  pub fn create(&self, draft: NewPersonnel) -> ResourceStream<Personnel> {
    let store = self.store.clone();
    one_shot(self.op("personnel.create", self.latency.mutate), move || {
      store.create(draft).map(Some)
    })
  }

  /// Replace the record with `record.id`.
  pub fn update(&self, record: Personnel) -> ResourceStream<Personnel> {
    let store = self.store.clone();
    one_shot(self.op("personnel.update", self.latency.mutate), move || {
      store.update(record)
    })
  }

  pub fn delete(&self, id: i64) -> ResourceStream<bool> {
    let store = self.store.clone();
    one_shot(self.op("personnel.delete", self.latency.mutate), move || {
      store.delete(id).map(|removed| removed.then_some(true))
    })
  }
}

#[cfg(test)]
mod tests {
  use brigada_core::{
    Resource,
    personnel::{NewPersonnel, PersonnelStatus},
  };
  use brigada_store_memory::MemoryStore;
  use futures::StreamExt as _;

  use super::*;

  fn repo() -> PersonnelRepository<MemoryStore> {
    PersonnelRepository::new(Arc::new(MemoryStore::seeded(Utc::now())), Latency::none())
  }

  async fn terminal<T>(s: ResourceStream<T>) -> Resource<T> {
    let mut all: Vec<Resource<T>> = s.collect().await;
    assert_eq!(all.len(), 2, "one Loading then one terminal value");
    assert!(all[0].is_loading());
    all.pop().expect("terminal value")
  }

  #[tokio::test]
  async fn list_defaults_to_active_members() {
    let r = terminal(repo().list(PersonnelQuery::default())).await;
    let Resource::Success(list) = r else { panic!("expected success") };
    assert_eq!(list.len(), 8);
    assert!(list.iter().all(|p| p.is_active()));
  }

  #[tokio::test]
  async fn search_overrides_status_filter() {
    let r = terminal(repo().list(PersonnelQuery {
      search: "valentina".into(),
      status: StatusFilter::Only(PersonnelStatus::Active),
    }))
    .await;
    let list = r.into_data().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].status, PersonnelStatus::Inactive);
  }

  #[tokio::test]
  async fn empty_search_result_is_success() {
    let r = terminal(repo().list(PersonnelQuery {
      search: "zzz-no-match".into(),
      status: StatusFilter::All,
    }))
    .await;
    assert_eq!(r, Resource::Success(vec![]));
  }

  #[tokio::test]
  async fn missing_record_is_an_error() {
    let repo = repo();
    assert_eq!(terminal(repo.get(404)).await, Resource::error("Personnel not found"));
    assert_eq!(terminal(repo.delete(404)).await, Resource::error("Personnel not found"));

    let mut ghost = terminal(repo.get(1)).await.into_data().unwrap();
    ghost.id = 404;
    assert_eq!(terminal(repo.update(ghost)).await, Resource::error("Personnel not found"));
  }

  #[tokio::test]
  async fn create_update_delete_cycle() {
    let repo = repo();
    let created = terminal(repo.create(NewPersonnel::new(
      "Ana",
      "Soto",
      "Bombero",
      PersonnelStatus::Active,
    )))
    .await
    .into_data()
    .unwrap();
    assert_eq!(created.id, 11);

    let mut edited = created.clone();
    edited.status = PersonnelStatus::OnLeave;
    let updated = terminal(repo.update(edited)).await.into_data().unwrap();
    assert_eq!(updated.status, PersonnelStatus::OnLeave);
    assert_eq!(terminal(repo.get(11)).await, Resource::Success(updated));

    assert_eq!(terminal(repo.delete(11)).await, Resource::Success(true));
    assert!(terminal(repo.get(11)).await.is_error());
  }

  #[tokio::test]
  async fn stats_reflect_current_roster() {
    let repo = repo();
    let stats = terminal(repo.stats()).await.into_data().unwrap();
    assert_eq!(stats.total, 10);
    assert_eq!(stats.total_active, 8);
    assert_eq!(stats.total_inactive, 2);
    assert_eq!(stats.by_rank[0].rank, "Bombero");
    assert_eq!(stats.by_rank[0].count, 5);

    terminal(repo.create(NewPersonnel::new("Ana", "Soto", "Cabo", PersonnelStatus::Active))).await;
    let stats = terminal(repo.stats()).await.into_data().unwrap();
    assert_eq!(stats.total, 11);
    assert_eq!(stats.new_last_month, 1);
  }

  // ─── Fault translation ────────────────────────────────────────────────────

  struct BrokenStore;

  impl PersonnelStore for BrokenStore {
    type Error = std::io::Error;

    fn list_all(&self) -> Result<Vec<Personnel>, Self::Error> {
      Err(std::io::Error::other("backend offline"))
    }

    fn list_by_status(&self, _: StatusFilter) -> Result<Vec<Personnel>, Self::Error> {
      self.list_all()
    }

    fn search(&self, _: &str) -> Result<Vec<Personnel>, Self::Error> { self.list_all() }

    fn get(&self, _: i64) -> Result<Option<Personnel>, Self::Error> {
      Err(std::io::Error::other("backend offline"))
    }

    fn create(&self, _: NewPersonnel) -> Result<Personnel, Self::Error> {
      Err(std::io::Error::other("backend offline"))
    }

    fn update(&self, _: Personnel) -> Result<Option<Personnel>, Self::Error> {
      Err(std::io::Error::other("backend offline"))
    }

    fn delete(&self, _: i64) -> Result<bool, Self::Error> {
      Err(std::io::Error::other("backend offline"))
    }
  }

  #[tokio::test]
  async fn store_faults_become_error_values() {
    let repo = PersonnelRepository::new(Arc::new(BrokenStore), Latency::none());
    assert_eq!(
      terminal(repo.list(PersonnelQuery::default())).await,
      Resource::error("Unexpected error: backend offline")
    );
    assert!(terminal(repo.stats()).await.is_error());
    assert!(terminal(repo.delete(1)).await.is_error());
  }
}
