//! Hot multicast source.
//!
//! A [`LocalSubject`] is both a [`Publisher`] and a manual input: values
//! pushed into it go to whichever observers are attached at that moment.
//! Nothing is buffered for observers that attach later, except the
//! completion, which is replayed to anyone attaching after it.

use std::collections::VecDeque;

use crate::{
  observer::{Completion, Observer},
  publisher::Publisher,
  rc::{MutRc, RcDeref, RcDerefMut, WeakRc},
  subscriber::Subscriber,
  subscription::{LocalSubscription, SubscriptionLike},
};

mod subscribers;
use subscribers::Subscribers;

/// A single-threaded subject. Clones are handles to the same subject.
///
/// Pushing while no observer is attached loses the value. Emitting from
/// inside one of the subject's own observers is allowed: the event is queued
/// and delivered to everyone once the current delivery finishes, so every
/// observer sees events in the same order.
///
/// Observers are owned by the subject until their subscription is cancelled
/// or the subject completes, so they must be `'static`.
///
/// ```rust
/// use rxcombine::prelude::*;
/// use std::{cell::RefCell, convert::Infallible, rc::Rc};
///
/// let subject = LocalSubject::<i32, Infallible>::new();
/// subject.push(0);
///
/// let values = Rc::new(RefCell::new(vec![]));
/// let c_values = values.clone();
/// subject.clone().subscribe(move |v| c_values.borrow_mut().push(v));
/// subject.push(1);
/// subject.push(2);
/// subject.finish();
/// subject.push(3);
///
/// assert_eq!(*values.borrow(), [1, 2]);
/// ```
pub struct LocalSubject<Item, Err> {
  state: MutRc<SubjectState<Item, Err>>,
}

struct SubjectState<Item, Err> {
  observers: Subscribers<Item, Err>,
  completion: Option<Completion<Err>>,
  emitting: bool,
  pending: VecDeque<Emission<Item, Err>>,
}

enum Emission<Item, Err> {
  Next(Item),
  Complete(Completion<Err>),
}

impl<Item, Err> Clone for LocalSubject<Item, Err> {
  fn clone(&self) -> Self { LocalSubject { state: self.state.clone() } }
}

impl<Item, Err> Default for LocalSubject<Item, Err> {
  fn default() -> Self {
    LocalSubject {
      state: MutRc::own(SubjectState {
        observers: Subscribers::default(),
        completion: None,
        emitting: false,
        pending: VecDeque::new(),
      }),
    }
  }
}

impl<Item, Err> LocalSubject<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// Number of attached observers that have not been cancelled.
  ///
  /// Observers attached by a callback that is currently running inside a
  /// delivery are counted; the ones receiving that delivery are not.
  pub fn subscriber_count(&self) -> usize { self.state.rc_deref().observers.open_count() }

  /// Whether the subject has finished or failed.
  pub fn is_finished(&self) -> bool { self.state.rc_deref().completion.is_some() }
}

impl<Item: Clone, Err: Clone> LocalSubject<Item, Err> {
  /// Deliver `value` to every attached observer. Ignored once the subject
  /// has completed.
  pub fn push(&self, value: Item) {
    if self.is_finished() {
      return;
    }
    self.emit(Emission::Next(value));
  }

  /// Deliver `Finished` to every attached observer and detach them all.
  pub fn finish(&self) { self.terminate(Completion::Finished) }

  /// Deliver `Failed(err)` to every attached observer and detach them all.
  pub fn fail(&self, err: Err) { self.terminate(Completion::Failed(err)) }

  fn terminate(&self, completion: Completion<Err>) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.completion.is_some() {
        return;
      }
      state.completion = Some(completion.clone());
    }
    self.emit(Emission::Complete(completion));
  }

  fn emit(&self, emission: Emission<Item, Err>) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.emitting {
        tracing::debug!("subject emission queued behind the current delivery");
        state.pending.push_back(emission);
        return;
      }
      state.emitting = true;
    }

    let mut next = Some(emission);
    while let Some(emission) = next {
      self.deliver(emission);
      let mut state = self.state.rc_deref_mut();
      next = state.pending.pop_front();
      if next.is_none() {
        state.emitting = false;
      }
    }
  }

  // The observer list is moved out for the delivery so callbacks can attach,
  // cancel and emit without hitting a held borrow.
  fn deliver(&self, emission: Emission<Item, Err>) {
    let mut observers = self.state.rc_deref_mut().observers.take();
    match emission {
      Emission::Next(value) => {
        observers.broadcast_value(value);
        let later = self.state.rc_deref_mut().observers.take();
        observers.merge(later);
        self.state.rc_deref_mut().observers = observers;
      }
      Emission::Complete(completion) => observers.broadcast_completion(completion),
    }
  }
}

impl<Item: 'static, Err: Clone + 'static> Publisher<'static> for LocalSubject<Item, Err> {
  type Item = Item;
  type Err = Err;
  type Unsub = LocalSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'static,
  {
    let subscription = subscriber.subscription.clone();
    let completion = self.state.rc_deref().completion.clone();
    match completion {
      Some(completion) => {
        tracing::debug!(failed = completion.is_failed(), "replaying completion to late subscriber");
        completion.notify(subscriber);
      }
      None => {
        let id = {
          let mut state = self.state.rc_deref_mut();
          state.observers.prune();
          state.observers.add(Box::new(subscriber))
        };
        subscription.add(SubjectSubscription { state: self.state.downgrade(), id, closed: false });
      }
    }
    subscription
  }
}

/// Removes one observer from its subject when the subscription is cancelled.
struct SubjectSubscription<Item, Err> {
  state: WeakRc<SubjectState<Item, Err>>,
  id: usize,
  closed: bool,
}

impl<Item, Err> SubscriptionLike for SubjectSubscription<Item, Err> {
  fn unsubscribe(&mut self) {
    if self.closed {
      return;
    }
    self.closed = true;
    let Some(state) = self.state.upgrade() else { return };
    // Busy means a delivery is running; the closed entry is pruned after it.
    let removed = state.try_rc_deref_mut().and_then(|mut state| state.observers.remove(self.id));
    drop(removed);
  }

  #[inline]
  fn is_closed(&self) -> bool { self.closed }
}

impl<Item: Clone, Err: Clone> Observer<Item, Err> for LocalSubject<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { self.push(value) }

  #[inline]
  fn error(self, err: Err) { self.fail(err) }

  #[inline]
  fn complete(self) { self.finish() }

  #[inline]
  fn is_closed(&self) -> bool { self.is_finished() }
}
