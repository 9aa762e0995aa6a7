use std::collections::VecDeque;

use crate::{
  observer::{Completion, Observer},
  publisher::Publisher,
  rc::{MutRc, RcDerefMut},
  subscriber::Subscriber,
  subscription::{LocalSubscription, SubscriptionLike},
};

/// Flattens a publisher of publishers, following only the most recent inner
/// publisher.
///
/// Callbacks of the downstream observer may push new inner publishers or
/// terminate the outer source. Values and terminal events raised while a
/// value is being delivered are queued and delivered, in order, once that
/// callback returns. Queued values of an inner publisher that has been
/// replaced in the meantime are dropped.
#[derive(Clone)]
pub struct SwitchToLatest<S> {
  pub(crate) source: S,
}

impl<'a, S, Inner> Publisher<'a> for SwitchToLatest<S>
where
  S: Publisher<'a, Item = Inner>,
  Inner: Publisher<'a, Err = S::Err>,
  Inner::Item: 'a,
  S::Err: 'a,
{
  type Item = Inner::Item;
  type Err = S::Err;
  type Unsub = LocalSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Self::Item, Self::Err> + 'a,
  {
    let subscription = subscriber.subscription.clone();
    let outer_subscription = LocalSubscription::default();
    subscription.add(outer_subscription.clone());

    let observer = SwitchOuterObserver {
      shared: SwitchShared {
        downstream: MutRc::own(Some(subscriber)),
        state: MutRc::own(SwitchState {
          inner: None,
          generation: 0,
          outer_finished: false,
          delivering: false,
          pending: VecDeque::new(),
          deferred: None,
        }),
      },
      subscription: subscription.clone(),
    };
    let outer = Subscriber::with_subscription(observer, outer_subscription.clone());
    outer_subscription.add(self.source.actual_subscribe(outer));
    subscription
  }
}

struct SwitchState<Item, Err> {
  inner: Option<LocalSubscription>,
  /// Bumped for every inner publisher received.
  generation: usize,
  outer_finished: bool,
  delivering: bool,
  pending: VecDeque<(usize, Item)>,
  deferred: Option<Completion<Err>>,
}

struct SwitchShared<O, Item, Err> {
  downstream: MutRc<Option<Subscriber<O>>>,
  state: MutRc<SwitchState<Item, Err>>,
}

impl<O, Item, Err> Clone for SwitchShared<O, Item, Err> {
  fn clone(&self) -> Self {
    SwitchShared { downstream: self.downstream.clone(), state: self.state.clone() }
  }
}

impl<O, Item, Err> SwitchShared<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  fn terminate(&self, completion: Completion<Err>) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.delivering {
        state.deferred.get_or_insert(completion);
        return;
      }
    }
    let downstream = self.downstream.rc_deref_mut().take();
    if let Some(downstream) = downstream {
      completion.notify(downstream);
    }
  }

  // Only one value reaches the downstream at a time; values raised by its
  // callbacks wait in `pending`.
  fn deliver(&self, generation: usize, value: Item) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.delivering {
        state.pending.push_back((generation, value));
        return;
      }
      state.delivering = true;
    }

    let mut next = Some(value);
    while let Some(value) = next {
      if let Some(downstream) = self.downstream.rc_deref_mut().as_mut() {
        downstream.next(value);
      }
      next = self.next_pending();
    }

    let deferred = self.state.rc_deref_mut().deferred.take();
    if let Some(completion) = deferred {
      self.terminate(completion);
    }
  }

  fn next_pending(&self) -> Option<Item> {
    let mut state = self.state.rc_deref_mut();
    while let Some((generation, value)) = state.pending.pop_front() {
      if generation == state.generation {
        return Some(value);
      }
    }
    state.delivering = false;
    None
  }
}

struct SwitchOuterObserver<O, Item, Err> {
  shared: SwitchShared<O, Item, Err>,
  subscription: LocalSubscription,
}

struct SwitchInnerObserver<O, Item, Err> {
  shared: SwitchShared<O, Item, Err>,
  current: LocalSubscription,
  generation: usize,
}

impl<'a, Inner, Item, Err, O> Observer<Inner, Err> for SwitchOuterObserver<O, Item, Err>
where
  Inner: Publisher<'a, Item = Item, Err = Err>,
  O: Observer<Item, Err> + 'a,
  Item: 'a,
  Err: 'a,
{
  fn next(&mut self, inner: Inner) {
    if self.subscription.is_closed() {
      return;
    }
    let current = LocalSubscription::default();
    let (previous, generation) = {
      let mut state = self.shared.state.rc_deref_mut();
      state.generation += 1;
      (state.inner.replace(current.clone()), state.generation)
    };
    if let Some(mut previous) = previous {
      tracing::debug!("switch_to_latest: cancelling previous inner publisher");
      previous.unsubscribe();
    }
    self.subscription.add(current.clone());

    let observer =
      SwitchInnerObserver { shared: self.shared.clone(), current: current.clone(), generation };
    let unsub = inner.actual_subscribe(Subscriber::with_subscription(observer, current.clone()));
    current.add(unsub);
  }

  fn error(self, err: Err) {
    let inner = self.shared.state.rc_deref_mut().inner.take();
    if let Some(mut inner) = inner {
      inner.unsubscribe();
    }
    self.shared.terminate(Completion::Failed(err));
  }

  fn complete(self) {
    let finished = {
      let mut state = self.shared.state.rc_deref_mut();
      state.outer_finished = true;
      state.inner.is_none()
    };
    if finished {
      self.shared.terminate(Completion::Finished);
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}

impl<Item, Err, O> Observer<Item, Err> for SwitchInnerObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.shared.deliver(self.generation, value) }

  fn error(self, err: Err) {
    self.shared.state.rc_deref_mut().inner = None;
    self.shared.terminate(Completion::Failed(err));
  }

  fn complete(self) {
    let finished = {
      let mut state = self.shared.state.rc_deref_mut();
      if state.inner.as_ref().is_some_and(|s| s.ptr_eq(&self.current)) {
        state.inner = None;
      }
      state.outer_finished && state.inner.is_none()
    };
    if finished {
      self.shared.terminate(Completion::Finished);
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.current.is_closed() }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  #[derive(Debug, PartialEq)]
  enum Event<Item, Err> {
    Next(Item),
    Done(Completion<Err>),
  }

  type Buffer<Item, Err> = Rc<RefCell<Vec<Event<Item, Err>>>>;

  fn record<'a, P>(source: P, buffer: &Buffer<P::Item, P::Err>) -> SubscriptionWrapper<P::Unsub>
  where
    P: Publisher<'a>,
    P::Item: 'a,
    P::Err: 'a,
  {
    let (c1, c2) = (buffer.clone(), buffer.clone());
    source.sink(
      move |v| c1.borrow_mut().push(Event::Next(v)),
      move |c| c2.borrow_mut().push(Event::Done(c)),
    )
  }

  fn pop<Item, Err>(buffer: &Buffer<Item, Err>) -> Vec<Event<Item, Err>> { buffer.take() }

  #[test]
  fn base_function() {
    use Event::*;
    let buffer: Buffer<i32, Infallible> = Default::default();
    let outer = LocalSubject::<Sequence<std::ops::Range<i32>, Infallible>, Infallible>::new();
    let _subscription = record(outer.clone().switch_to_latest(), &buffer);

    outer.push(publisher::from_iter(0..3));
    assert_eq!(pop(&buffer), [Next(0), Next(1), Next(2)]);
    outer.push(publisher::from_iter(10..13));
    assert_eq!(pop(&buffer), [Next(10), Next(11), Next(12)]);
    outer.finish();
    assert_eq!(pop(&buffer), [Done(Completion::Finished)]);
  }

  #[test]
  fn only_latest_inner_is_forwarded() {
    use Event::*;
    let buffer: Buffer<&str, Infallible> = Default::default();
    let outer = LocalSubject::<LocalSubject<&str, Infallible>, Infallible>::new();
    let first = LocalSubject::new();
    let second = LocalSubject::new();
    let _subscription = record(outer.clone().switch_to_latest(), &buffer);

    outer.push(first.clone());
    first.push("a1");
    outer.push(second.clone());
    first.push("a2");
    second.push("b1");
    assert_eq!(first.subscriber_count(), 0);
    assert_eq!(pop(&buffer), [Next("a1"), Next("b1")]);

    first.finish();
    outer.finish();
    assert!(pop(&buffer).is_empty());
    second.finish();
    assert_eq!(pop(&buffer), [Done(Completion::Finished)]);
  }

  #[test]
  fn outer_finished_without_inner_completes() {
    let buffer: Buffer<i32, Infallible> = Default::default();
    let outer = LocalSubject::<LocalSubject<i32, Infallible>, Infallible>::new();
    let subscription = record(outer.clone().switch_to_latest(), &buffer);

    outer.finish();
    assert_eq!(pop(&buffer), [Event::Done(Completion::Finished)]);
    assert!(subscription.is_closed());
  }

  #[test]
  fn inner_failure_cancels_outer() {
    let buffer: Buffer<i32, &str> = Default::default();
    let outer = LocalSubject::<LocalSubject<i32, &str>, &str>::new();
    let inner = LocalSubject::new();
    let subscription = record(outer.clone().switch_to_latest(), &buffer);

    outer.push(inner.clone());
    inner.push(1);
    inner.fail("inner broke");

    assert_eq!(pop(&buffer), [Event::Next(1), Event::Done(Completion::Failed("inner broke"))]);
    assert_eq!(outer.subscriber_count(), 0);
    assert!(subscription.is_closed());
  }

  #[test]
  fn outer_failure_cancels_inner() {
    let buffer: Buffer<i32, &str> = Default::default();
    let outer = LocalSubject::<LocalSubject<i32, &str>, &str>::new();
    let inner = LocalSubject::new();
    let _subscription = record(outer.clone().switch_to_latest(), &buffer);

    outer.push(inner.clone());
    outer.fail("outer broke");
    inner.push(1);

    assert_eq!(pop(&buffer), [Event::Done(Completion::Failed("outer broke"))]);
    assert_eq!(inner.subscriber_count(), 0);
  }

  #[test]
  fn cancel_releases_outer_and_inner() {
    let buffer: Buffer<i32, Infallible> = Default::default();
    let outer = LocalSubject::<LocalSubject<i32, Infallible>, Infallible>::new();
    let inner = LocalSubject::new();
    let mut subscription = record(outer.clone().switch_to_latest(), &buffer);

    outer.push(inner.clone());
    assert_eq!(outer.subscriber_count(), 1);
    assert_eq!(inner.subscriber_count(), 1);

    subscription.unsubscribe();
    inner.push(1);
    assert_eq!(outer.subscriber_count(), 0);
    assert_eq!(inner.subscriber_count(), 0);
    assert!(pop(&buffer).is_empty());
  }

  #[test]
  fn boxed_inner_publishers_of_mixed_types() {
    use Event::*;
    let buffer: Buffer<i32, Infallible> = Default::default();
    let outer = LocalSubject::<BoxedPublisherClone<'static, i32, Infallible>, Infallible>::new();
    let _subscription = record(outer.clone().switch_to_latest(), &buffer);

    outer.push(BoxedPublisherClone::new(publisher::of(1)));
    outer.push(BoxedPublisherClone::new(publisher::from_iter(vec![2, 3]).prepend_iter([0])));
    outer.finish();
    assert_eq!(pop(&buffer), [Next(1), Next(0), Next(2), Next(3), Done(Completion::Finished)]);
  }

  #[test]
  fn outer_push_from_downstream_callback() {
    let values = Rc::new(RefCell::new(vec![]));
    let outer = LocalSubject::<LocalSubject<i32, Infallible>, Infallible>::new();
    let first = LocalSubject::new();
    let second = LocalSubject::<i32, Infallible>::new();

    let (c_values, c_outer, c_second) = (values.clone(), outer.clone(), second.clone());
    let _subscription = outer.clone().switch_to_latest().subscribe(move |v| {
      c_values.borrow_mut().push(v);
      if v == 1 {
        c_outer.push(c_second.clone());
      }
    });

    outer.push(first.clone());
    first.push(1);
    first.push(2);
    second.push(3);
    assert_eq!(*values.borrow(), [1, 3]);
  }

  #[test]
  fn sync_inner_pushed_from_downstream_callback() {
    let values = Rc::new(RefCell::new(vec![]));
    let outer = LocalSubject::<BoxedPublisherClone<'static, i32, Infallible>, Infallible>::new();
    let first = LocalSubject::<i32, Infallible>::new();

    let (c_values, c_outer) = (values.clone(), outer.clone());
    let subscription = outer.clone().switch_to_latest().subscribe(move |v| {
      c_values.borrow_mut().push(v);
      if v == 1 {
        c_outer.push(BoxedPublisherClone::new(publisher::from_iter([10, 11])));
      }
    });

    outer.push(BoxedPublisherClone::new(first.clone()));
    first.push(1);
    first.push(2);
    assert_eq!(*values.borrow(), [1, 10, 11]);
    assert_eq!(first.subscriber_count(), 0);

    outer.finish();
    assert!(subscription.is_closed());
  }

  #[test]
  fn queued_values_of_replaced_inner_are_dropped() {
    let values = Rc::new(RefCell::new(vec![]));
    let outer = LocalSubject::<BoxedPublisherClone<'static, i32, Infallible>, Infallible>::new();
    let first = LocalSubject::<i32, Infallible>::new();

    let (c_values, c_outer) = (values.clone(), outer.clone());
    let _subscription = outer.clone().switch_to_latest().subscribe(move |v| {
      c_values.borrow_mut().push(v);
      if v == 1 {
        c_outer.push(BoxedPublisherClone::new(publisher::from_iter([10, 11])));
        c_outer.push(BoxedPublisherClone::new(publisher::of(20)));
      }
    });

    outer.push(BoxedPublisherClone::new(first.clone()));
    first.push(1);
    assert_eq!(*values.borrow(), [1, 20]);
  }
}
