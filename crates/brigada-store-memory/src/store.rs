//! [`MemoryStore`], the in-memory implementation of the entity stores.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use brigada_core::{
  citation::{Citation, CitationUpdate, NewCitation},
  personnel::{NewPersonnel, Personnel, StatusFilter},
  store::{CitationQuery, CitationStore, PersonnelStore},
};

use crate::{Error, Result, seed};

// ─── Options ─────────────────────────────────────────────────────────────────

/// What `reject_attendance` does to the citation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectAttendance {
  /// Leave the citation untouched and return it as stored.
  #[default]
  Unchanged,
  /// Remove one confirmation, stopping at zero.
  Decrement,
}

/// Behavioural switches for [`MemoryStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct StoreOptions {
  #[serde(default)]
  pub reject_attendance: RejectAttendance,
}

// ─── Store ───────────────────────────────────────────────────────────────────

struct CitationTable {
  rows:    Vec<Citation>,
  next_id: i64,
}

struct Inner {
  personnel: RwLock<Vec<Personnel>>,
  citations: RwLock<CitationTable>,
  options:   StoreOptions,
}

/// The brigade roster held in process memory.
///
/// Clones share the same collections.
#[derive(Clone)]
pub struct MemoryStore {
  inner: Arc<Inner>,
}

impl Default for MemoryStore {
  fn default() -> Self { Self::new() }
}

impl MemoryStore {
  /// An empty store; the first citation gets id 1.
  pub fn new() -> Self { Self::with_rows(Vec::new(), Vec::new(), 1, StoreOptions::default()) }

  /// A store preloaded with the demo roster and citations, with citation
  /// dates placed relative to `now`.
  pub fn seeded(now: DateTime<Utc>) -> Self { Self::seeded_with(now, StoreOptions::default()) }

  pub fn seeded_with(now: DateTime<Utc>, options: StoreOptions) -> Self {
    let citations = seed::citations(now);
    let next_id = citations.iter().map(|c| c.id).max().unwrap_or(0) + 1;
    Self::with_rows(seed::personnel(), citations, next_id, options)
  }

  /// Build a store from explicit rows. `next_citation_id` seeds the citation
  /// id sequence.
  pub fn with_rows(
    personnel: Vec<Personnel>,
    citations: Vec<Citation>,
    next_citation_id: i64,
    options: StoreOptions,
  ) -> Self {
    Self {
      inner: Arc::new(Inner {
        personnel: RwLock::new(personnel),
        citations: RwLock::new(CitationTable {
          rows:    citations,
          next_id: next_citation_id,
        }),
        options,
      }),
    }
  }

  pub fn options(&self) -> StoreOptions { self.inner.options }

  fn personnel(&self) -> Result<RwLockReadGuard<'_, Vec<Personnel>>> {
    self.inner.personnel.read().map_err(|_| Error::Poisoned("personnel"))
  }

  fn personnel_mut(&self) -> Result<RwLockWriteGuard<'_, Vec<Personnel>>> {
    self.inner.personnel.write().map_err(|_| Error::Poisoned("personnel"))
  }

  fn citations(&self) -> Result<RwLockReadGuard<'_, CitationTable>> {
    self.inner.citations.read().map_err(|_| Error::Poisoned("citations"))
  }

  fn citations_mut(&self) -> Result<RwLockWriteGuard<'_, CitationTable>> {
    self.inner.citations.write().map_err(|_| Error::Poisoned("citations"))
  }

  /// Apply `f` to the citation with `id` in place, returning the result.
  fn modify_citation(
    &self,
    id: i64,
    f: impl FnOnce(&mut Citation),
  ) -> Result<Option<Citation>> {
    let mut table = self.citations_mut()?;
    Ok(table.rows.iter_mut().find(|c| c.id == id).map(|c| {
      f(c);
      c.clone()
    }))
  }
}

// ─── PersonnelStore impl ─────────────────────────────────────────────────────

impl PersonnelStore for MemoryStore {
  type Error = Error;

  fn list_all(&self) -> Result<Vec<Personnel>> { Ok(self.personnel()?.clone()) }

  fn list_by_status(&self, filter: StatusFilter) -> Result<Vec<Personnel>> {
    Ok(
      self
        .personnel()?
        .iter()
        .filter(|p| filter.accepts(p.status))
        .cloned()
        .collect(),
    )
  }

  fn search(&self, query: &str) -> Result<Vec<Personnel>> {
    Ok(
      self
        .personnel()?
        .iter()
        .filter(|p| p.matches(query))
        .cloned()
        .collect(),
    )
  }

  fn get(&self, id: i64) -> Result<Option<Personnel>> {
    Ok(self.personnel()?.iter().find(|p| p.id == id).cloned())
  }

  fn create(&self, draft: NewPersonnel) -> Result<Personnel> {
    let mut rows = self.personnel_mut()?;
    let id = rows.iter().map(|p| p.id).max().unwrap_or(0) + 1;
    let record = draft.into_personnel(id, Utc::now());
    rows.push(record.clone());
    debug!(id, "personnel created");
    Ok(record)
  }

  fn update(&self, mut record: Personnel) -> Result<Option<Personnel>> {
    let mut rows = self.personnel_mut()?;
    let Some(slot) = rows.iter_mut().find(|p| p.id == record.id) else {
      return Ok(None);
    };
    record.created_at = slot.created_at;
    record.updated_at = Utc::now();
    *slot = record.clone();
    debug!(id = record.id, "personnel updated");
    Ok(Some(record))
  }

  fn delete(&self, id: i64) -> Result<bool> {
    let mut rows = self.personnel_mut()?;
    let before = rows.len();
    rows.retain(|p| p.id != id);
    let removed = rows.len() != before;
    debug!(id, removed, "personnel delete");
    Ok(removed)
  }
}

// ─── CitationStore impl ──────────────────────────────────────────────────────

impl CitationStore for MemoryStore {
  type Error = Error;

  fn list(&self, query: &CitationQuery) -> Result<Vec<Citation>> {
    let mut rows: Vec<Citation> = self
      .citations()?
      .rows
      .iter()
      .filter(|c| query.accepts(c))
      .cloned()
      .collect();
    rows.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
    Ok(rows)
  }

  fn get(&self, id: i64) -> Result<Option<Citation>> {
    Ok(self.citations()?.rows.iter().find(|c| c.id == id).cloned())
  }

  fn create(&self, draft: NewCitation) -> Result<Citation> {
    let mut table = self.citations_mut()?;
    let id = table.next_id;
    table.next_id += 1;
    let citation = draft.into_citation(id, Utc::now());
    table.rows.push(citation.clone());
    debug!(id, "citation created");
    Ok(citation)
  }

  fn update(&self, id: i64, update: CitationUpdate) -> Result<Option<Citation>> {
    let updated = self.modify_citation(id, |c| *c = update.apply(c))?;
    debug!(id, found = updated.is_some(), "citation update");
    Ok(updated)
  }

  fn delete(&self, id: i64) -> Result<bool> {
    let mut table = self.citations_mut()?;
    let before = table.rows.len();
    table.rows.retain(|c| c.id != id);
    let removed = table.rows.len() != before;
    debug!(id, removed, "citation delete");
    Ok(removed)
  }

  fn confirm_attendance(&self, id: i64) -> Result<Option<Citation>> {
    let updated = self.modify_citation(id, |c| {
      c.confirmed_attendees = c.confirmed_attendees.saturating_add(1);
    })?;
    if let Some(c) = &updated {
      debug!(id, confirmed = c.confirmed_attendees, "attendance confirmed");
    }
    Ok(updated)
  }

  fn reject_attendance(&self, id: i64) -> Result<Option<Citation>> {
    match self.inner.options.reject_attendance {
      RejectAttendance::Unchanged => CitationStore::get(self, id),
      RejectAttendance::Decrement => self.modify_citation(id, |c| {
        c.confirmed_attendees = c.confirmed_attendees.saturating_sub(1);
      }),
    }
  }
}
