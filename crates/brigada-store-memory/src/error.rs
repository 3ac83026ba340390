//! Error type for `brigada-store-memory`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A writer panicked while holding the lock for `0`.
  #[error("{0} lock poisoned")]
  Poisoned(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
