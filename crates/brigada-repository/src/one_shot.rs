//! The `Loading` → terminal pipeline shared by every repository operation.

use std::{
  panic::{AssertUnwindSafe, catch_unwind},
  time::Duration,
};

use brigada_core::Resource;
use futures::{StreamExt as _, future, stream};
use tracing::{debug, warn};

use crate::ResourceStream;

/// Describes one repository operation for logging and error reporting.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Op {
  pub name:      &'static str,
  pub delay:     Duration,
  /// Message emitted when the store reports nothing for the request.
  pub not_found: &'static str,
}

/// Build the stream for `op`: `Loading` immediately, then the outcome of
/// `work` once the configured delay has passed.
///
/// `Ok(None)` from `work` becomes `Error(op.not_found)`; an `Err` or a panic
/// becomes `Error("Unexpected error: …")`.
pub(crate) fn one_shot<T, E, F>(op: Op, work: F) -> ResourceStream<T>
where
  T: Send + 'static,
  E: std::fmt::Display,
  F: FnOnce() -> Result<Option<T>, E> + Send + 'static,
{
  let terminal = async move {
    if !op.delay.is_zero() {
      tokio::time::sleep(op.delay).await;
    }
    match catch_unwind(AssertUnwindSafe(work)) {
      Ok(Ok(Some(value))) => {
        debug!(op = op.name, "resolved");
        Resource::Success(value)
      }
      Ok(Ok(None)) => {
        debug!(op = op.name, "not found");
        Resource::error(op.not_found)
      }
      Ok(Err(e)) => {
        warn!(op = op.name, error = %e, "store operation failed");
        Resource::error(format!("Unexpected error: {e}"))
      }
      Err(_) => {
        warn!(op = op.name, "store operation panicked");
        Resource::error("Unexpected error: operation aborted")
      }
    }
  };

  stream::once(future::ready(Resource::loading()))
    .chain(stream::once(terminal))
    .boxed()
}

#[cfg(test)]
mod tests {
  use futures::StreamExt as _;
  use tokio::time::Instant;

  use super::*;

  const OP: Op = Op {
    name:      "test",
    delay:     Duration::from_millis(500),
    not_found: "Thing not found",
  };

  #[tokio::test(start_paused = true)]
  async fn loading_is_immediate_and_terminal_waits_for_delay() {
    let start = Instant::now();
    let mut s = one_shot(OP, || Ok::<_, String>(Some(1)));

    assert_eq!(s.next().await, Some(Resource::loading()));
    assert_eq!(start.elapsed(), Duration::ZERO);

    assert_eq!(s.next().await, Some(Resource::Success(1)));
    assert!(start.elapsed() >= Duration::from_millis(500));

    assert_eq!(s.next().await, None);
  }

  #[tokio::test]
  async fn work_runs_only_after_loading() {
    let ran = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = ran.clone();
    let mut s = one_shot(Op { delay: Duration::ZERO, ..OP }, move || {
      flag.store(true, std::sync::atomic::Ordering::SeqCst);
      Ok::<_, String>(Some(()))
    });

    assert!(s.next().await.is_some_and(|r| r.is_loading()));
    assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
    assert!(s.next().await.is_some_and(|r| r.is_success()));
    assert!(ran.load(std::sync::atomic::Ordering::SeqCst));
  }

  #[tokio::test]
  async fn none_becomes_not_found() {
    let out: Vec<Resource<u8>> =
      one_shot(Op { delay: Duration::ZERO, ..OP }, || Ok::<_, String>(None))
        .collect()
        .await;
    assert_eq!(out, vec![Resource::loading(), Resource::error("Thing not found")]);
  }

  #[tokio::test]
  async fn faults_become_errors() {
    let out: Vec<Resource<u8>> = one_shot(Op { delay: Duration::ZERO, ..OP }, || {
      Err::<Option<u8>, _>("disk on fire")
    })
    .collect()
    .await;
    assert_eq!(out[1].message(), Some("Unexpected error: disk on fire"));

    let out: Vec<Resource<u8>> =
      one_shot(Op { delay: Duration::ZERO, ..OP }, || -> Result<Option<u8>, String> {
        panic!("boom")
      })
      .collect()
      .await;
    assert_eq!(out.len(), 2);
    assert!(out[1].is_error());
  }
}
