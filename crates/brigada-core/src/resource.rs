//! [`Resource`], the tri-state result of every asynchronous operation.
//!
//! Repositories emit `Loading` first and then exactly one terminal value
//! (`Success` or `Error`). State holders fold these values into the state
//! they publish to the UI. The enum is closed: consumers match on all three
//! variants.

use serde::{Deserialize, Serialize};

/// The state of an asynchronous operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Resource<T> {
  /// The operation is in flight. May carry stale data for optimistic display.
  Loading(Option<T>),
  /// The operation completed. The payload is always present.
  Success(T),
  /// The operation failed with a human-readable `message`. `data` may carry
  /// stale fallback content.
  Error {
    message: String,
    data:    Option<T>,
  },
}

impl<T> Resource<T> {
  /// `Loading` without stale data.
  pub fn loading() -> Self { Self::Loading(None) }

  /// `Error` without fallback data.
  pub fn error(message: impl Into<String>) -> Self {
    Self::Error {
      message: message.into(),
      data:    None,
    }
  }

  pub fn is_loading(&self) -> bool { matches!(self, Self::Loading(_)) }

  pub fn is_success(&self) -> bool { matches!(self, Self::Success(_)) }

  pub fn is_error(&self) -> bool { matches!(self, Self::Error { .. }) }

  /// Whether this is a terminal (`Success` or `Error`) state.
  pub fn is_terminal(&self) -> bool { !self.is_loading() }

  /// The carried payload, if any.
  pub fn data(&self) -> Option<&T> {
    match self {
      Self::Loading(data) | Self::Error { data, .. } => data.as_ref(),
      Self::Success(data) => Some(data),
    }
  }

  /// Consume the resource, returning the carried payload, if any.
  pub fn into_data(self) -> Option<T> {
    match self {
      Self::Loading(data) | Self::Error { data, .. } => data,
      Self::Success(data) => Some(data),
    }
  }

  /// The error message. `None` unless this is `Error`.
  pub fn message(&self) -> Option<&str> {
    match self {
      Self::Error { message, .. } => Some(message),
      _ => None,
    }
  }

  /// Transform the payload, preserving the state.
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
    match self {
      Self::Loading(data) => Resource::Loading(data.map(f)),
      Self::Success(data) => Resource::Success(f(data)),
      Self::Error { message, data } => Resource::Error {
        message,
        data: data.map(f),
      },
    }
  }
}
