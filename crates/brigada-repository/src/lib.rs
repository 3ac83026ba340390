//! Asynchronous repositories over the brigade entity stores.
//!
//! Every operation returns a [`ResourceStream`]: a one-shot stream that yields
//! [`Resource::Loading`](brigada_core::Resource::Loading) first and then
//! exactly one terminal `Success` or `Error` before completing. Store faults
//! never escape as errors or panics; they become `Error` values.

mod auth;
mod citations;
mod one_shot;
mod personnel;

use std::time::Duration;

use brigada_core::Resource;
use futures::stream::BoxStream;

pub use auth::AuthRepository;
pub use citations::CitationRepository;
pub use personnel::{PersonnelQuery, PersonnelRepository};

/// The emission sequence of a single repository operation.
pub type ResourceStream<T> = BoxStream<'static, Resource<T>>;

/// Simulated latency applied before each operation resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
  pub list:       Duration,
  pub get:        Duration,
  pub mutate:     Duration,
  pub attendance: Duration,
  pub stats:      Duration,
  pub login:      Duration,
}

impl Latency {
  /// Resolve immediately after `Loading`.
  pub const fn none() -> Self {
    Self {
      list:       Duration::ZERO,
      get:        Duration::ZERO,
      mutate:     Duration::ZERO,
      attendance: Duration::ZERO,
      stats:      Duration::ZERO,
      login:      Duration::ZERO,
    }
  }
}

impl Default for Latency {
  /// Delays of the network-backed variants: 500 ms for listings, statistics
  /// and writes, 300 ms for single reads and attendance, 1 s for login.
  fn default() -> Self {
    Self {
      list:       Duration::from_millis(500),
      get:        Duration::from_millis(300),
      mutate:     Duration::from_millis(500),
      attendance: Duration::from_millis(300),
      stats:      Duration::from_millis(500),
      login:      Duration::from_millis(1000),
    }
  }
}
