//! Per-screen state holders.
//!
//! Each holder owns the UI-facing state of one screen, publishes it through a
//! [`tokio::sync::watch`] channel, and turns user intents into repository
//! calls. Emissions from a repository stream overwrite the held result in
//! full. When a newer request for the same logical query starts, emissions of
//! the older one are discarded.
//!
//! Holders are cheap to clone; clones share state, so a UI can hand one clone
//! to a spawned task and keep another for rendering.

mod request;

pub mod citation_detail;
pub mod citation_list;
pub mod dashboard;
pub mod login;
pub mod personnel_detail;
pub mod personnel_form;
pub mod personnel_list;

pub use citation_detail::{AttendanceAction, CitationDetailHolder, CitationDetailState};
pub use citation_list::{CitationListHolder, CitationListState};
pub use dashboard::{DashboardHolder, DashboardState};
pub use login::{LoginHolder, LoginState};
pub use personnel_detail::{PersonnelDetailHolder, PersonnelDetailState};
pub use personnel_form::{FormField, FormMode, PersonnelFormHolder, PersonnelFormState};
pub use personnel_list::{PersonnelListHolder, PersonnelListState};

use brigada_core::Resource;

/// What a list screen should render for its current result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase {
  /// Nothing requested yet.
  Idle,
  /// Spinner.
  Loading,
  /// Loaded, nothing to show.
  Empty,
  /// Loaded with `n` rows.
  Ready(usize),
  /// Retry affordance with the carried message.
  Failed(String),
}

impl ListPhase {
  pub fn of<T>(result: Option<&Resource<Vec<T>>>) -> Self {
    match result {
      None => Self::Idle,
      Some(Resource::Loading(_)) => Self::Loading,
      Some(Resource::Success(rows)) if rows.is_empty() => Self::Empty,
      Some(Resource::Success(rows)) => Self::Ready(rows.len()),
      Some(Resource::Error { message, .. }) => Self::Failed(message.clone()),
    }
  }
}
