use std::{convert::Infallible, marker::PhantomData};

use futures::{
  channel::oneshot,
  future::{abortable, AbortHandle, Future, FutureExt, Map},
  task::{LocalSpawn, LocalSpawnExt, SpawnError},
};

use crate::{
  error::SourceError,
  observer::Observer,
  publisher::Publisher,
  rc::{MutRc, RcDerefMut},
  subscriber::Subscriber,
  subscription::{LocalSubscription, SubscriptionLike},
};

/// Converts a `Future` into a publisher that emits its output once and then
/// finishes.
///
/// The future is spawned on `spawner` when the publisher is subscribed, so
/// its value arrives from the executor, never during subscribe. Cancelling
/// the subscription aborts the future.
///
/// ```rust
/// use futures::{executor::LocalPool, future};
/// use rxcombine::prelude::*;
/// use std::{cell::RefCell, rc::Rc};
///
/// let mut pool = LocalPool::new();
/// let res = Rc::new(RefCell::new(0));
/// let c_res = res.clone();
/// publisher::from_future(future::ready(1), pool.spawner())
///   .sink(move |v| *c_res.borrow_mut() = v, |_| {});
///
/// pool.run();
/// assert_eq!(*res.borrow(), 1);
/// ```
///
/// If the future resolves to a `Result` that should fail the stream, use
/// [`from_future_result`].
#[allow(clippy::type_complexity)]
pub fn from_future<F, S>(
  future: F, spawner: S,
) -> FutureResultPublisher<Map<F, fn(F::Output) -> Result<F::Output, Infallible>>, S, SourceError>
where
  F: Future,
{
  from_future_result(future.map(Ok as fn(F::Output) -> Result<F::Output, Infallible>), spawner)
}

/// Converts a `Future` resolving to a `Result` into a publisher: `Ok` is
/// emitted as a value followed by completion, `Err` fails the stream.
///
/// The publisher's error type must also absorb [`SpawnError`], which is
/// what subscribers receive when the executor refuses the task.
pub fn from_future_result<F, S, Err>(future: F, spawner: S) -> FutureResultPublisher<F, S, Err> {
  FutureResultPublisher { future, spawner, _err: PhantomData }
}

/// Publisher over the receiving half of a one-shot channel.
///
/// A dropped sender fails the stream with [`SourceError::Canceled`].
pub fn from_oneshot<T, S>(
  receiver: oneshot::Receiver<T>, spawner: S,
) -> FutureResultPublisher<oneshot::Receiver<T>, S, SourceError> {
  from_future_result(receiver, spawner)
}

pub struct FutureResultPublisher<F, S, Err> {
  future: F,
  spawner: S,
  _err: PhantomData<fn() -> Err>,
}

impl<F: Clone, S: Clone, Err> Clone for FutureResultPublisher<F, S, Err> {
  fn clone(&self) -> Self {
    FutureResultPublisher {
      future: self.future.clone(),
      spawner: self.spawner.clone(),
      _err: PhantomData,
    }
  }
}

impl<F, S, Item, FErr, Err> Publisher<'static> for FutureResultPublisher<F, S, Err>
where
  F: Future<Output = Result<Item, FErr>> + 'static,
  FErr: Into<Err>,
  Err: From<SpawnError>,
  S: LocalSpawn,
{
  type Item = Item;
  type Err = Err;
  type Unsub = LocalSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'static,
  {
    let subscription = subscriber.subscription.clone();
    let (future, handle) = abortable(self.future);
    subscription.add(AbortOnUnsubscribe { handle, closed: false });

    let slot = MutRc::own(Some(subscriber));
    let c_slot = slot.clone();
    let task = future.map(move |output| {
      let Ok(result) = output else { return };
      let subscriber = c_slot.rc_deref_mut().take();
      if let Some(mut subscriber) = subscriber {
        match result {
          Ok(value) => {
            subscriber.next(value);
            subscriber.complete();
          }
          Err(err) => subscriber.error(err.into()),
        }
      }
    });

    if let Err(err) = self.spawner.spawn_local(task) {
      tracing::warn!(%err, "future source could not be spawned");
      let subscriber = slot.rc_deref_mut().take();
      if let Some(subscriber) = subscriber {
        subscriber.error(Err::from(err));
      }
    }
    subscription
  }
}

struct AbortOnUnsubscribe {
  handle: AbortHandle,
  closed: bool,
}

impl SubscriptionLike for AbortOnUnsubscribe {
  fn unsubscribe(&mut self) {
    if !self.closed {
      self.closed = true;
      tracing::trace!("aborting future source");
      self.handle.abort();
    }
  }

  fn is_closed(&self) -> bool { self.closed }
}
