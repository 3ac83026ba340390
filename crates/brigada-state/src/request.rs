//! Request superseding for state holders.

use std::sync::atomic::{AtomicU64, Ordering};

use brigada_core::Resource;
use brigada_repository::ResourceStream;
use futures::StreamExt as _;
use tracing::debug;

/// Identifies one request issued through a [`RequestTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

/// Monotonic request ids for one logical query. Only the most recently
/// issued ticket is current.
#[derive(Debug, Default)]
pub(crate) struct RequestTracker(AtomicU64);

impl RequestTracker {
  pub fn begin(&self) -> Ticket { Ticket(self.0.fetch_add(1, Ordering::SeqCst) + 1) }

  pub fn is_current(&self, ticket: Ticket) -> bool { self.0.load(Ordering::SeqCst) == ticket.0 }

  /// Drive `stream` under a fresh ticket, handing each emission to `apply`
  /// while the ticket is current.
  ///
  /// Returns `Some(succeeded)` once the terminal value is applied, or `None`
  /// if a newer request superseded this one. A superseded stream is dropped
  /// without being polled further.
  pub async fn drive<T>(
    &self,
    stream: ResourceStream<T>,
    apply: impl FnMut(Resource<T>),
  ) -> Option<bool> {
    self.drive_as(self.begin(), stream, apply).await
  }

  /// Like [`drive`](Self::drive), under a ticket the caller already took.
  /// Taking the ticket while holding the state lock ties it to the query
  /// parameters written under that same lock.
  pub async fn drive_as<T>(
    &self,
    ticket: Ticket,
    mut stream: ResourceStream<T>,
    mut apply: impl FnMut(Resource<T>),
  ) -> Option<bool> {
    while let Some(emission) = stream.next().await {
      if !self.is_current(ticket) {
        debug!(ticket = ticket.0, "dropping superseded emission");
        return None;
      }
      let terminal = emission.is_terminal();
      let succeeded = emission.is_success();
      apply(emission);
      if terminal {
        return Some(succeeded);
      }
    }
    None
  }
}

#[cfg(test)]
mod tests {
  use futures::{StreamExt as _, future, stream};

  use super::*;

  #[test]
  fn only_latest_ticket_is_current() {
    let t = RequestTracker::default();
    let a = t.begin();
    assert!(t.is_current(a));
    let b = t.begin();
    assert!(!t.is_current(a));
    assert!(t.is_current(b));
  }

  #[tokio::test]
  async fn drive_applies_every_emission_in_order() {
    let t = RequestTracker::default();
    let s = stream::iter([Resource::loading(), Resource::Success(5)]).boxed();
    let mut seen = Vec::new();
    assert_eq!(t.drive(s, |r| seen.push(r)).await, Some(true));
    assert_eq!(seen, vec![Resource::loading(), Resource::Success(5)]);
  }

  #[tokio::test]
  async fn superseded_request_stops_applying() {
    let t = std::sync::Arc::new(RequestTracker::default());
    let t2 = t.clone();
    // Issue a newer ticket between the two emissions.
    let s = stream::once(future::ready(Resource::<u8>::loading()))
      .chain(stream::once(async move {
        t2.begin();
        Resource::Success(1)
      }))
      .boxed();

    let mut seen = Vec::new();
    assert_eq!(t.drive(s, |r| seen.push(r)).await, None);
    assert_eq!(seen, vec![Resource::loading()]);
  }

  #[tokio::test]
  async fn stale_ticket_applies_nothing() {
    let t = RequestTracker::default();
    let early = t.begin();
    t.begin();
    let s = stream::iter([Resource::loading(), Resource::Success(5)]).boxed();
    let mut seen = Vec::new();
    assert_eq!(t.drive_as(early, s, |r| seen.push(r)).await, None);
    assert!(seen.is_empty());
  }
}
