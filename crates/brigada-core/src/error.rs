//! Error types for `brigada-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown personnel status: {0:?}")]
  UnknownPersonnelStatus(String),

  #[error("unknown citation status: {0:?}")]
  UnknownCitationStatus(String),

  #[error("unknown activity type: {0:?}")]
  UnknownActivityType(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
