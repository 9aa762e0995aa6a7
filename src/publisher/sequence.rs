use std::{
  iter::{Empty, Once},
  marker::PhantomData,
};

use crate::{
  observer::Observer,
  publisher::Publisher,
  subscriber::Subscriber,
  subscription::{LocalSubscription, SubscriptionLike},
};

/// Creates a publisher that produces values from an iterator.
///
/// Every value is emitted synchronously during subscribe, then the publisher
/// finishes. It never fails on its own; `Err` only names the failure type of
/// the streams it is combined with.
///
/// ```
/// use rxcombine::prelude::*;
///
/// publisher::from_iter(0..10).subscribe(|v| println!("{v},"));
/// ```
pub fn from_iter<Iter, Err>(iter: Iter) -> Sequence<Iter, Err>
where
  Iter: IntoIterator,
{
  Sequence { iter, _err: PhantomData }
}

/// Creates a publisher that emits `value` once and then finishes.
pub fn of<Item, Err>(value: Item) -> Sequence<Once<Item>, Err> { from_iter(std::iter::once(value)) }

/// Creates a publisher that finishes immediately without emitting.
pub fn empty<Item, Err>() -> Sequence<Empty<Item>, Err> { from_iter(std::iter::empty()) }

/// A finite, synchronous publisher over an iterator.
pub struct Sequence<Iter, Err> {
  iter: Iter,
  _err: PhantomData<fn() -> Err>,
}

impl<Iter: Clone, Err> Clone for Sequence<Iter, Err> {
  fn clone(&self) -> Self { Sequence { iter: self.iter.clone(), _err: PhantomData } }
}

impl<'a, Iter, Err> Publisher<'a> for Sequence<Iter, Err>
where
  Iter: IntoIterator,
{
  type Item = Iter::Item;
  type Err = Err;
  type Unsub = LocalSubscription;

  fn actual_subscribe<O>(self, mut subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Self::Item, Self::Err> + 'a,
  {
    let subscription = subscriber.subscription.clone();
    for v in self.iter {
      if subscription.is_closed() {
        return subscription;
      }
      subscriber.next(v);
    }
    subscriber.complete();
    subscription
  }
}

/// Creates a publisher that fails with `err` immediately, without emitting.
///
/// ```
/// use rxcombine::prelude::*;
///
/// let mut completion = None;
/// publisher::throw_err::<i32, _>("broken").sink(|_| {}, |c| completion = Some(c));
/// assert_eq!(completion, Some(Completion::Failed("broken")));
/// ```
pub fn throw_err<Item, Err>(err: Err) -> ThrowErr<Item, Err> {
  ThrowErr { err, _item: PhantomData }
}

pub struct ThrowErr<Item, Err> {
  err: Err,
  _item: PhantomData<fn() -> Item>,
}

impl<Item, Err: Clone> Clone for ThrowErr<Item, Err> {
  fn clone(&self) -> Self { ThrowErr { err: self.err.clone(), _item: PhantomData } }
}

impl<'a, Item, Err> Publisher<'a> for ThrowErr<Item, Err> {
  type Item = Item;
  type Err = Err;
  type Unsub = LocalSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'a,
  {
    let subscription = subscriber.subscription.clone();
    subscriber.error(self.err);
    subscription
  }
}

#[cfg(test)]
mod test {
  use std::convert::Infallible;

  use bencher::{benchmark_group, Bencher};

  use crate::prelude::*;

  #[test]
  fn from_range() {
    let mut hit_count = 0;
    let mut completion = None;
    publisher::from_iter::<_, Infallible>(0..100)
      .sink(|_| hit_count += 1, |c| completion = Some(c));

    assert_eq!(hit_count, 100);
    assert_eq!(completion, Some(Completion::Finished));
  }

  #[test]
  fn of_and_empty() {
    let mut values = vec![];
    publisher::of(7).subscribe(|v| values.push(v));
    assert_eq!(values, [7]);

    let mut completion = None;
    publisher::empty::<i32, ()>().sink(|_| unreachable!(), |c| completion = Some(c));
    assert_eq!(completion, Some(Completion::Finished));
  }

  #[test]
  fn stops_when_cancelled_mid_sequence() {
    let subscription = LocalSubscription::default();
    let handle = subscription.clone();
    let mut values = vec![];
    let observer = ObserverFn(|v: i32| {
      values.push(v);
      if v == 3 {
        handle.clone().unsubscribe();
      }
    });
    let subscriber = Subscriber::with_subscription(observer, subscription);
    publisher::from_iter(1..).actual_subscribe(subscriber);

    assert_eq!(values, [1, 2, 3]);
  }

  #[test]
  fn bench() { do_bench(); }

  benchmark_group!(do_bench, bench_from_iter);

  fn bench_from_iter(b: &mut Bencher) {
    b.iter(|| {
      let mut sum = 0;
      publisher::from_iter(0..1000).subscribe(|v| sum += v);
      sum
    });
  }
}
