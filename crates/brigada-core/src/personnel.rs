//! Personnel records: a brigade member's profile.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::Error;

// ─── Vocabulary ──────────────────────────────────────────────────────────────

/// The ranks offered by the personnel form, highest first.
///
/// `Personnel::rank` stays a free-form string; this list only seeds choices.
pub const RANKS: &[&str] =
  &["Comandante", "Capitán", "Teniente", "Sargento", "Cabo", "Bombero"];

/// Service status of a brigade member.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PersonnelStatus {
  #[serde(rename = "Activo")]
  #[strum(to_string = "Activo", serialize = "Active")]
  Active,
  #[serde(rename = "Licencia")]
  #[strum(to_string = "Licencia", serialize = "OnLeave")]
  OnLeave,
  #[serde(rename = "Inactivo")]
  #[strum(to_string = "Inactivo", serialize = "Inactive")]
  Inactive,
}

/// Status filter for personnel listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filter", content = "status", rename_all = "snake_case")]
pub enum StatusFilter {
  All,
  Only(PersonnelStatus),
}

impl StatusFilter {
  pub fn accepts(&self, status: PersonnelStatus) -> bool {
    match self {
      Self::All => true,
      Self::Only(s) => *s == status,
    }
  }
}

impl Default for StatusFilter {
  fn default() -> Self { Self::Only(PersonnelStatus::Active) }
}

impl FromStr for StatusFilter {
  type Err = Error;

  /// Blank, `"Todos"` and `"All"` select everything.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("todos") || s.eq_ignore_ascii_case("all")
    {
      return Ok(Self::All);
    }
    PersonnelStatus::from_str(s)
      .map(Self::Only)
      .map_err(|_| Error::UnknownPersonnelStatus(s.to_owned()))
  }
}

impl std::fmt::Display for StatusFilter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::All => f.write_str("Todos"),
      Self::Only(s) => write!(f, "{s}"),
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A stored personnel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personnel {
  pub id:          i64,
  pub given_names: String,
  pub surnames:    String,
  pub rank:        String,
  pub specialty:   Option<String>,
  pub status:      PersonnelStatus,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  pub address:     Option<String>,
  pub joined_on:   Option<NaiveDate>,
  /// Reference to a photo owned by the host platform.
  pub photo_ref:   Option<String>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Personnel {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.given_names, self.surnames)
  }

  pub fn is_active(&self) -> bool { self.status == PersonnelStatus::Active }

  /// Whether the full name, rank or specialty contains `query`, ignoring case.
  ///
  /// A blank query matches every record.
  pub fn matches(&self, query: &str) -> bool {
    if query.trim().is_empty() {
      return true;
    }
    let needle = query.to_lowercase();
    self.full_name().to_lowercase().contains(&needle)
      || self.rank.to_lowercase().contains(&needle)
      || self
        .specialty
        .as_deref()
        .is_some_and(|s| s.to_lowercase().contains(&needle))
  }
}

/// Input for creating a personnel record. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPersonnel {
  pub given_names: String,
  pub surnames:    String,
  pub rank:        String,
  pub specialty:   Option<String>,
  pub status:      PersonnelStatus,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  pub address:     Option<String>,
  pub joined_on:   Option<NaiveDate>,
  pub photo_ref:   Option<String>,
}

impl NewPersonnel {
  /// A draft with only the required fields set.
  pub fn new(
    given_names: impl Into<String>,
    surnames: impl Into<String>,
    rank: impl Into<String>,
    status: PersonnelStatus,
  ) -> Self {
    Self {
      given_names: given_names.into(),
      surnames: surnames.into(),
      rank: rank.into(),
      specialty: None,
      status,
      phone: None,
      email: None,
      address: None,
      joined_on: None,
      photo_ref: None,
    }
  }

  /// Build the stored record, stamping both timestamps with `now`.
  pub fn into_personnel(self, id: i64, now: DateTime<Utc>) -> Personnel {
    Personnel {
      id,
      given_names: self.given_names,
      surnames: self.surnames,
      rank: self.rank,
      specialty: self.specialty,
      status: self.status,
      phone: self.phone,
      email: self.email,
      address: self.address,
      joined_on: self.joined_on,
      photo_ref: self.photo_ref,
      created_at: now,
      updated_at: now,
    }
  }
}
