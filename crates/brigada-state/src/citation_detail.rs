//! Citation detail screen and its attendance workflow.
//!
//! Confirming or rejecting attendance goes through a confirmation dialog.
//! Accepting it dispatches the repository call; on success the citation is
//! fetched again so the displayed counts come from the store.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use brigada_core::{Resource, citation::Citation, store::CitationStore};
use brigada_repository::CitationRepository;

use crate::request::RequestTracker;

const INVALID_ID: &str = "Invalid citation id";

/// The attendance action awaiting confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceAction {
  Confirm,
  Reject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CitationDetailState {
  pub id:         Option<i64>,
  pub result:     Option<Resource<Citation>>,
  /// Open confirmation dialog, if any.
  pub dialog:     Option<AttendanceAction>,
  pub attendance: Option<Resource<Citation>>,
}

pub struct CitationDetailHolder<S> {
  inner: Arc<Inner<S>>,
}

struct Inner<S> {
  repo:       CitationRepository<S>,
  state:      watch::Sender<CitationDetailState>,
  loads:      RequestTracker,
  attendance: RequestTracker,
}

impl<S> Clone for CitationDetailHolder<S> {
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
    }
  }
}

impl<S> CitationDetailHolder<S>
where
  S: CitationStore + 'static,
{
  /// A missing or non-positive id is an immediate error.
  pub fn new(repo: CitationRepository<S>, id: Option<i64>) -> Self {
    let id = id.filter(|id| *id > 0);
    let (state, _) = watch::channel(CitationDetailState {
      id,
      result: id.is_none().then(|| Resource::error(INVALID_ID)),
      dialog: None,
      attendance: None,
    });
    Self {
      inner: Arc::new(Inner {
        repo,
        state,
        loads: RequestTracker::default(),
        attendance: RequestTracker::default(),
      }),
    }
  }

  pub fn subscribe(&self) -> watch::Receiver<CitationDetailState> {
    self.inner.state.subscribe()
  }

  pub fn snapshot(&self) -> CitationDetailState { self.inner.state.borrow().clone() }

  pub async fn load(&self) {
    let Some(id) = self.inner.state.borrow().id else {
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

  pub fn request_confirm(&self) { self.open_dialog(AttendanceAction::Confirm) }

  pub fn request_reject(&self) { self.open_dialog(AttendanceAction::Reject) }

  pub fn dismiss_dialog(&self) { self.inner.state.send_modify(|s| s.dialog = None) }

  fn open_dialog(&self, action: AttendanceAction) {
    self.inner.state.send_if_modified(|s| {
      if s.id.is_none() {
        return false;
      }
      s.dialog = Some(action);
      true
    });
  }

  /// Close the dialog and run its action. Returns whether the action
  /// succeeded; `false` if no dialog was open.
  pub async fn accept_dialog(&self) -> bool {
    let mut pending = None;
    self.inner.state.send_if_modified(|s| {
      pending = s.dialog.take().zip(s.id);
      pending.is_some()
    });
    let Some((action, id)) = pending else {
      return false;
    };
    debug!(id, ?action, "attendance action accepted");

    let stream = match action {
      AttendanceAction::Confirm => self.inner.repo.confirm_attendance(id),
      AttendanceAction::Reject => self.inner.repo.reject_attendance(id),
    };
    let state = &self.inner.state;
    let ok = self
      .inner
      .attendance
      .drive(stream, |emission| state.send_modify(|s| s.attendance = Some(emission)))
      .await
      .unwrap_or(false);
    if ok {
      self.load().await;
    }
    ok
  }

  pub fn clear_attendance(&self) { self.inner.state.send_modify(|s| s.attendance = None) }
}
