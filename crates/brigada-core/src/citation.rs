//! Citations: scheduled convocations with attendance tracking.
//!
//! Citations are created `Pending` with no confirmed attendees. Updates use
//! partial-merge semantics: every `None` field of a [`CitationUpdate`] keeps
//! the stored value.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{Error, Result};

// ─── Vocabulary ──────────────────────────────────────────────────────────────

/// The kind of activity a citation convenes.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ActivityType {
  #[serde(rename = "ENTRENAMIENTO")]
  #[strum(to_string = "Entrenamiento", serialize = "ENTRENAMIENTO", serialize = "Training")]
  Training,
  #[serde(rename = "GUARDIA")]
  #[strum(to_string = "Guardia", serialize = "GUARDIA", serialize = "Duty")]
  Duty,
  #[serde(rename = "REUNION")]
  #[strum(to_string = "Reunión", serialize = "REUNION", serialize = "Meeting")]
  Meeting,
  #[serde(rename = "CEREMONIA")]
  #[strum(to_string = "Ceremonia", serialize = "CEREMONIA", serialize = "Ceremony")]
  Ceremony,
  #[serde(rename = "EJERCICIO")]
  #[strum(to_string = "Ejercicio", serialize = "EJERCICIO", serialize = "Drill")]
  Drill,
  #[serde(rename = "OTRO")]
  #[strum(to_string = "Otro", serialize = "OTRO", serialize = "Other")]
  Other,
}

/// Lifecycle status of a citation.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum CitationStatus {
  #[serde(rename = "PENDIENTE")]
  #[strum(to_string = "Pendiente", serialize = "PENDIENTE", serialize = "Pending")]
  Pending,
  #[serde(rename = "CONFIRMADA")]
  #[strum(to_string = "Confirmada", serialize = "CONFIRMADA", serialize = "Confirmed")]
  Confirmed,
  #[serde(rename = "EN_CURSO")]
  #[strum(to_string = "En Curso", serialize = "EN_CURSO", serialize = "InProgress")]
  InProgress,
  #[serde(rename = "COMPLETADA")]
  #[strum(to_string = "Completada", serialize = "COMPLETADA", serialize = "Completed")]
  Completed,
  #[serde(rename = "CANCELADA")]
  #[strum(to_string = "Cancelada", serialize = "CANCELADA", serialize = "Cancelled")]
  Cancelled,
}

impl ActivityType {
  /// Resolve a code (`"REUNION"`), English or display name.
  pub fn lookup(s: &str) -> Result<Self> {
    s.trim()
      .parse()
      .map_err(|_| Error::UnknownActivityType(s.to_owned()))
  }
}

impl CitationStatus {
  /// Resolve a code (`"EN_CURSO"`), English or display name.
  pub fn lookup(s: &str) -> Result<Self> {
    s.trim()
      .parse()
      .map_err(|_| Error::UnknownCitationStatus(s.to_owned()))
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A stored citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
  pub id:                  i64,
  pub title:               String,
  pub description:         String,
  /// Local wall-clock time of the activity.
  pub scheduled_at:        NaiveDateTime,
  pub location:            String,
  pub activity_type:       ActivityType,
  pub status:              CitationStatus,
  pub required_attendees:  u32,
  /// May exceed `required_attendees`; never clamped.
  pub confirmed_attendees: u32,
  pub cited_personnel:     Vec<i64>,
  pub created_by:          String,
  pub created_at:          DateTime<Utc>,
  pub remarks:             Option<String>,
}

impl Citation {
  /// Attendees still missing to reach the required count.
  pub fn outstanding(&self) -> u32 {
    self.required_attendees.saturating_sub(self.confirmed_attendees)
  }
}

/// Input for creating a citation.
///
/// There is no status or confirmed count: new citations always start
/// `Pending` with zero confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCitation {
  pub title:              String,
  pub description:        String,
  pub scheduled_at:       NaiveDateTime,
  pub location:           String,
  pub activity_type:      ActivityType,
  pub required_attendees: u32,
  pub cited_personnel:    Vec<i64>,
  pub created_by:         String,
  pub remarks:            Option<String>,
}

impl NewCitation {
  pub fn into_citation(self, id: i64, now: DateTime<Utc>) -> Citation {
    Citation {
      id,
      title: self.title,
      description: self.description,
      scheduled_at: self.scheduled_at,
      location: self.location,
      activity_type: self.activity_type,
      status: CitationStatus::Pending,
      required_attendees: self.required_attendees,
      confirmed_attendees: 0,
      cited_personnel: self.cited_personnel,
      created_by: self.created_by,
      created_at: now,
      remarks: self.remarks,
    }
  }
}

/// A partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationUpdate {
  pub title:              Option<String>,
  pub description:        Option<String>,
  pub scheduled_at:       Option<NaiveDateTime>,
  pub location:           Option<String>,
  pub activity_type:      Option<ActivityType>,
  pub status:             Option<CitationStatus>,
  pub required_attendees: Option<u32>,
  pub cited_personnel:    Option<Vec<i64>>,
  pub remarks:            Option<String>,
}

impl CitationUpdate {
  /// Merge into `current`, producing the replacement record.
  ///
  /// Identity, creator, creation time and confirmed count are never touched.
  pub fn apply(self, current: &Citation) -> Citation {
    Citation {
      id:                  current.id,
      title:               self.title.unwrap_or_else(|| current.title.clone()),
      description:         self
        .description
        .unwrap_or_else(|| current.description.clone()),
      scheduled_at:        self.scheduled_at.unwrap_or(current.scheduled_at),
      location:            self.location.unwrap_or_else(|| current.location.clone()),
      activity_type:       self.activity_type.unwrap_or(current.activity_type),
      status:              self.status.unwrap_or(current.status),
      required_attendees:  self
        .required_attendees
        .unwrap_or(current.required_attendees),
      confirmed_attendees: current.confirmed_attendees,
      cited_personnel:     self
        .cited_personnel
        .unwrap_or_else(|| current.cited_personnel.clone()),
      created_by:          current.created_by.clone(),
      created_at:          current.created_at,
      remarks:             self.remarks.or_else(|| current.remarks.clone()),
    }
  }
}
