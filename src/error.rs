//! Failures raised by the crate itself rather than by the streams it carries.

use std::convert::Infallible;

/// Error produced by the external source adapters.
///
/// Stream failures of user publishers use the publisher's own `Err` type;
/// this type only covers what can go wrong while bridging a future into a
/// publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum SourceError {
  /// The sending half of a one-shot channel was dropped before it sent.
  #[error("source canceled: sender dropped before delivering a value")]
  Canceled,

  /// The executor refused to spawn the task driving the source.
  #[error("source could not be spawned: executor is shut down")]
  Spawn,
}

impl From<Infallible> for SourceError {
  fn from(err: Infallible) -> Self { match err {} }
}

#[cfg(feature = "futures-source")]
impl From<futures::channel::oneshot::Canceled> for SourceError {
  fn from(_: futures::channel::oneshot::Canceled) -> Self { SourceError::Canceled }
}

#[cfg(feature = "futures-source")]
impl From<futures::task::SpawnError> for SourceError {
  fn from(_: futures::task::SpawnError) -> Self { SourceError::Spawn }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_messages() {
    assert_eq!(
      SourceError::Canceled.to_string(),
      "source canceled: sender dropped before delivering a value"
    );
    assert!(SourceError::Spawn.to_string().starts_with("source could not be spawned"));
  }

  #[cfg(feature = "futures-source")]
  #[test]
  fn converts_from_oneshot_cancel() {
    let (tx, mut rx) = futures::channel::oneshot::channel::<i32>();
    drop(tx);
    let err = rx.try_recv().map(|_| ()).map_err(SourceError::from);
    assert_eq!(err, Err(SourceError::Canceled));
  }
}
