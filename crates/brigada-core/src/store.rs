//! The entity store traits and supporting query types.
//!
//! Traits are implemented by storage backends (e.g. `brigada-store-memory`).
//! Repositories depend on these abstractions, not on a concrete backend.
//!
//! Store operations are synchronous and never yield. "Not found" is an
//! ordinary outcome (`Ok(None)` / `Ok(false)`); `Err` is reserved for
//! unexpected faults in the backend.

use crate::{
  citation::{ActivityType, Citation, CitationStatus, CitationUpdate, NewCitation},
  personnel::{NewPersonnel, Personnel, StatusFilter},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Filters for [`CitationStore::list`]. `None` disables a filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CitationQuery {
  pub status:        Option<CitationStatus>,
  pub activity_type: Option<ActivityType>,
}

impl CitationQuery {
  pub fn accepts(&self, citation: &Citation) -> bool {
    self.status.is_none_or(|s| citation.status == s)
      && self.activity_type.is_none_or(|t| citation.activity_type == t)
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Store of personnel records keyed by integer id.
pub trait PersonnelStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every record, in insertion order.
  fn list_all(&self) -> Result<Vec<Personnel>, Self::Error>;

  /// Records whose status passes `filter`, in insertion order.
  fn list_by_status(&self, filter: StatusFilter) -> Result<Vec<Personnel>, Self::Error>;

  /// Records matching `query` (see [`Personnel::matches`]). A blank query
  /// returns every record.
  fn search(&self, query: &str) -> Result<Vec<Personnel>, Self::Error>;

  fn get(&self, id: i64) -> Result<Option<Personnel>, Self::Error>;

  /// Persist a new record with id `max(existing) + 1` (or `1`), stamping both
  /// timestamps.
  fn create(&self, draft: NewPersonnel) -> Result<Personnel, Self::Error>;

  /// Replace the record with the same id, refreshing `updated_at`.
  /// `created_at` is preserved. Returns `None` if the id is unknown.
  fn update(&self, record: Personnel) -> Result<Option<Personnel>, Self::Error>;

  /// Returns whether a record was removed.
  fn delete(&self, id: i64) -> Result<bool, Self::Error>;
}

/// Store of citations keyed by integer id.
pub trait CitationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Citations passing `query`, most recently scheduled first.
  fn list(&self, query: &CitationQuery) -> Result<Vec<Citation>, Self::Error>;

  fn get(&self, id: i64) -> Result<Option<Citation>, Self::Error>;

  /// Persist a new citation under the next sequential id. The citation
  /// always starts `Pending` with zero confirmations.
  fn create(&self, draft: NewCitation) -> Result<Citation, Self::Error>;

  /// Merge `update` into the stored citation. Returns `None` if the id is
  /// unknown.
  fn update(&self, id: i64, update: CitationUpdate) -> Result<Option<Citation>, Self::Error>;

  /// Returns whether a citation was removed.
  fn delete(&self, id: i64) -> Result<bool, Self::Error>;

  /// Add one confirmed attendee. Repeated calls keep counting; there is no
  /// per-member guard and no clamp at `required_attendees`.
  fn confirm_attendance(&self, id: i64) -> Result<Option<Citation>, Self::Error>;

  /// Record a rejection. Whether this changes the citation is backend policy.
  fn reject_attendance(&self, id: i64) -> Result<Option<Citation>, Self::Error>;
}
