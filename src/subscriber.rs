use crate::{
  observer::Observer,
  subscription::{LocalSubscription, SubscriptionLike},
};

/// An observer bound to the subscription of one subscribe call.
///
/// Every observer handed to [`Publisher::actual_subscribe`] is a
/// `Subscriber`. It drops events once its subscription is closed and closes
/// the subscription when a terminal event passes through, so a finished or
/// cancelled subscription never delivers again.
///
/// [`Publisher::actual_subscribe`]: crate::publisher::Publisher::actual_subscribe
pub struct Subscriber<O> {
  pub(crate) observer: O,
  pub(crate) subscription: LocalSubscription,
}

impl<O> Subscriber<O> {
  /// Wrap `observer` with a fresh subscription.
  pub fn new(observer: O) -> Self {
    Subscriber { observer, subscription: LocalSubscription::default() }
  }

  /// Wrap `observer` with an existing subscription.
  pub fn with_subscription(observer: O, subscription: LocalSubscription) -> Self {
    Subscriber { observer, subscription }
  }

  /// The handle that cancels this subscriber.
  #[inline]
  pub fn subscription(&self) -> &LocalSubscription { &self.subscription }
}

impl<Item, Err, O> Observer<Item, Err> for Subscriber<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if !self.subscription.is_closed() {
      self.observer.next(value)
    }
  }

  fn error(mut self, err: Err) {
    if !self.subscription.is_closed() {
      self.subscription.unsubscribe();
      self.observer.error(err);
    }
  }

  fn complete(mut self) {
    if !self.subscription.is_closed() {
      self.subscription.unsubscribe();
      self.observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.subscription.is_closed() || self.observer.is_closed() }
}
