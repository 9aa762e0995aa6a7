use super::{DynamicSubscriptions, SubscriptionLike};

/// A caller-held collection of subscriptions that are released together.
///
/// Every subscription still held is cancelled when the bag is cleared or
/// dropped. Use it to tie the lifetime of several streams to one owner.
///
/// ```rust
/// use rxcombine::prelude::*;
///
/// let subject = LocalSubject::<i32, std::convert::Infallible>::new();
/// let mut bag = SubscriptionBag::default();
///
/// subject.clone().subscribe(|v| println!("{v}")).store_in(&mut bag);
/// subject.clone().subscribe(|v| println!("again {v}")).store_in(&mut bag);
/// assert_eq!(subject.subscriber_count(), 2);
///
/// drop(bag);
/// assert_eq!(subject.subscriber_count(), 0);
/// ```
#[derive(Default)]
pub struct SubscriptionBag {
  items: DynamicSubscriptions<Box<dyn SubscriptionLike>>,
}

impl SubscriptionBag {
  pub fn new() -> Self { Self::default() }

  /// Take ownership of `subscription`, returning an ID for [`Self::remove`].
  pub fn insert<S: SubscriptionLike + 'static>(&mut self, subscription: S) -> usize {
    self.items.retain(|_, s| !s.is_closed());
    self.items.add(Box::new(subscription))
  }

  /// Give the subscription back to the caller without cancelling it.
  pub fn remove(&mut self, id: usize) -> Option<Box<dyn SubscriptionLike>> {
    self.items.remove(id)
  }

  /// Number of subscriptions held, finished ones included until the next
  /// insert prunes them.
  pub fn len(&self) -> usize { self.items.len() }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Cancel every held subscription and empty the bag.
  pub fn clear(&mut self) {
    if !self.items.is_empty() {
      tracing::trace!(count = self.items.len(), "releasing subscription bag");
    }
    self.items.unsubscribe_all();
  }
}

impl Drop for SubscriptionBag {
  fn drop(&mut self) { self.clear() }
}
