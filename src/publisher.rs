use crate::{
  observer::{Completion, Observer},
  ops::{append::Append, prepend::Prepend, switch_to_latest::SwitchToLatest},
  subscriber::Subscriber,
  subscription::{SubscriptionLike, SubscriptionWrapper},
};

mod boxed;
mod defer;
#[cfg(feature = "futures-source")]
mod from_future;
mod sequence;
mod sink;

pub use boxed::*;
pub use defer::*;
#[cfg(feature = "futures-source")]
pub use from_future::*;
pub use sequence::*;
pub use sink::*;

/// A representation of any set of values over any amount of time, followed by
/// at most one terminal event.
///
/// `actual_subscribe` may deliver values (and the terminal event)
/// synchronously before it returns. The returned handle cancels the
/// subscription: after `unsubscribe` returns, the observer receives nothing
/// more.
///
/// A publisher is consumed by subscribing. Clone it to subscribe more than
/// once; each subscription builds an independent graph.
pub trait Publisher<'a>: Sized {
  type Item;
  type Err;
  /// A type implementing [`SubscriptionLike`]
  type Unsub: SubscriptionLike + 'static;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Self::Item, Self::Err> + 'a;
}

/// Combinators and sinks available on every [`Publisher`].
pub trait PublisherExt<'a>: Publisher<'a> {
  /// Emit every value of `prefix` before the values of this publisher.
  ///
  /// This publisher is subscribed only after `prefix` finishes; if `prefix`
  /// fails, the failure is forwarded and this publisher is never subscribed.
  /// Chained calls stack, the latest applied prefix runs first.
  ///
  /// ```rust
  /// use rxcombine::prelude::*;
  ///
  /// let mut values = vec![];
  /// publisher::from_iter([3, 4, 5])
  ///   .prepend(publisher::from_iter([1, 2]))
  ///   .subscribe(|v| values.push(v));
  ///
  /// assert_eq!(values, [1, 2, 3, 4, 5]);
  /// ```
  #[inline]
  fn prepend<P>(self, prefix: P) -> Prepend<Self, P>
  where
    P: Publisher<'a, Item = Self::Item, Err = Self::Err>,
  {
    Prepend { source: self, prefix }
  }

  /// Emit the values of `values`, in iteration order, before the values of
  /// this publisher.
  ///
  /// ```rust
  /// use rxcombine::prelude::*;
  ///
  /// let mut values = vec![];
  /// publisher::from_iter([3, 4, 5])
  ///   .prepend_iter([1, 2])
  ///   .prepend_iter([-1, 0])
  ///   .subscribe(|v| values.push(v));
  ///
  /// assert_eq!(values, [-1, 0, 1, 2, 3, 4, 5]);
  /// ```
  #[inline]
  fn prepend_iter<I>(self, values: I) -> Prepend<Self, Sequence<I, Self::Err>>
  where
    I: IntoIterator<Item = Self::Item>,
  {
    self.prepend(from_iter(values))
  }

  /// Emit every value of `suffix` after this publisher finishes.
  ///
  /// `suffix` is subscribed only once this publisher finishes. A hot suffix,
  /// like a [`LocalSubject`](crate::subject::LocalSubject), loses whatever
  /// was pushed to it before that point. If this publisher fails, `suffix` is
  /// never subscribed.
  #[inline]
  fn append<P>(self, suffix: P) -> Append<Self, P>
  where
    P: Publisher<'a, Item = Self::Item, Err = Self::Err>,
  {
    Append { source: self, suffix }
  }

  /// Emit the values of `values`, in iteration order, after this publisher
  /// finishes.
  ///
  /// ```rust
  /// use rxcombine::prelude::*;
  ///
  /// let mut values = vec![];
  /// publisher::from_iter([3, 4, 5])
  ///   .append_iter([6, 7])
  ///   .append_iter([8, 9])
  ///   .subscribe(|v| values.push(v));
  ///
  /// assert_eq!(values, [3, 4, 5, 6, 7, 8, 9]);
  /// ```
  #[inline]
  fn append_iter<I>(self, values: I) -> Append<Self, Sequence<I, Self::Err>>
  where
    I: IntoIterator<Item = Self::Item>,
  {
    self.append(from_iter(values))
  }

  /// Flatten a publisher of publishers, forwarding only the values of the
  /// most recently received inner publisher.
  ///
  /// Receiving a new inner publisher cancels the previous one. The stream
  /// finishes once both the outer publisher and the active inner publisher
  /// have finished; any failure is forwarded immediately.
  #[inline]
  fn switch_to_latest(self) -> SwitchToLatest<Self>
  where
    Self::Item: Publisher<'a, Err = Self::Err>,
  {
    SwitchToLatest { source: self }
  }

  /// Erase the concrete type of this publisher.
  #[inline]
  fn box_it(self) -> BoxedPublisher<'a, Self::Item, Self::Err>
  where
    Self: 'a,
  {
    BoxedPublisher::new(self)
  }

  /// Subscribe with a full [`Observer`].
  #[inline]
  fn subscribe_with<O>(self, observer: O) -> SubscriptionWrapper<Self::Unsub>
  where
    O: Observer<Self::Item, Self::Err> + 'a,
  {
    SubscriptionWrapper(self.actual_subscribe(Subscriber::new(observer)))
  }

  /// Subscribe to a publisher that cannot fail, handling its values only.
  #[inline]
  fn subscribe<N>(self, next: N) -> SubscriptionWrapper<Self::Unsub>
  where
    ObserverFn<N>: Observer<Self::Item, Self::Err> + 'a,
  {
    self.subscribe_with(ObserverFn(next))
  }

  /// Subscribe with a value handler and a handler for the terminal
  /// [`Completion`].
  ///
  /// ```rust
  /// use rxcombine::prelude::*;
  ///
  /// let mut values = vec![];
  /// let mut completion = None;
  /// publisher::from_iter([1, 2])
  ///   .append(publisher::throw_err("boom"))
  ///   .sink(|v| values.push(v), |c| completion = Some(c));
  ///
  /// assert_eq!(values, [1, 2]);
  /// assert_eq!(completion, Some(Completion::Failed("boom")));
  /// ```
  #[inline]
  fn sink<N, C>(self, next: N, on_complete: C) -> SubscriptionWrapper<Self::Unsub>
  where
    N: FnMut(Self::Item) + 'a,
    C: FnOnce(Completion<Self::Err>) + 'a,
  {
    self.subscribe_with(SinkObserver::new(next, on_complete))
  }
}

impl<'a, T: Publisher<'a>> PublisherExt<'a> for T {}
