use crate::{
  observer::{BoxedObserver, Completion, Observer},
  subscription::DynamicSubscriptions,
};

/// The observers attached to a subject, in attach order.
///
/// Each entry is a boxed [`Subscriber`](crate::subscriber::Subscriber).
/// Cancelling it removes the entry by ID; if that happens while a delivery
/// holds the list, the entry reports itself closed and is pruned afterwards.
pub(crate) struct Subscribers<Item, Err> {
  inner: DynamicSubscriptions<BoxedObserver<'static, Item, Err>>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Self { inner: DynamicSubscriptions::default() } }
}

impl<Item, Err> Subscribers<Item, Err> {
  #[inline]
  pub(crate) fn add(&mut self, observer: BoxedObserver<'static, Item, Err>) -> usize {
    self.inner.add(observer)
  }

  #[inline]
  pub(crate) fn remove(&mut self, id: usize) -> Option<BoxedObserver<'static, Item, Err>> {
    self.inner.remove(id)
  }

  /// Number of entries that are still open.
  pub(crate) fn open_count(&self) -> usize {
    self.inner.iter().filter(|o| !o.is_closed()).count()
  }

  /// Drop every entry whose subscription has been cancelled.
  pub(crate) fn prune(&mut self) { self.inner.retain(|_, o| !o.is_closed()); }

  /// Move every entry out, leaving an empty list that keeps handing out
  /// fresh IDs.
  pub(crate) fn take(&mut self) -> Self { Self { inner: self.inner.split_off_items() } }

  /// Put `later` after the current entries and prune cancelled ones.
  pub(crate) fn merge(&mut self, mut later: Self) {
    self.inner.append(&mut later.inner);
    self.prune();
  }

  /// Send `value` to every open entry, cloning for all but the last.
  pub(crate) fn broadcast_value(&mut self, value: Item)
  where
    Item: Clone,
  {
    let mut iter = self.inner.iter_mut().filter(|o| !o.is_closed()).peekable();
    while let Some(observer) = iter.next() {
      if iter.peek().is_some() {
        observer.next(value.clone());
      } else {
        observer.next(value);
        break;
      }
    }
  }

  /// Hand `completion` to every entry, consuming the list.
  pub(crate) fn broadcast_completion(mut self, completion: Completion<Err>)
  where
    Err: Clone,
  {
    let mut iter = self.inner.drain().filter(|o| !o.is_closed()).peekable();
    while let Some(observer) = iter.next() {
      if iter.peek().is_some() {
        completion.clone().notify(observer);
      } else {
        completion.notify(observer);
        break;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::{
    subscriber::Subscriber,
    subscription::{LocalSubscription, SubscriptionLike},
  };

  type Log = Rc<RefCell<Vec<String>>>;

  struct Named(&'static str, Log);

  impl Observer<i32, ()> for Named {
    fn next(&mut self, value: i32) { self.1.borrow_mut().push(format!("{}:{value}", self.0)); }
    fn error(self, _: ()) { self.1.borrow_mut().push(format!("{}:failed", self.0)); }
    fn complete(self) { self.1.borrow_mut().push(format!("{}:finished", self.0)); }
    fn is_closed(&self) -> bool { false }
  }

  fn boxed(name: &'static str, log: &Log) -> (BoxedObserver<'static, i32, ()>, LocalSubscription) {
    let subscriber = Subscriber::new(Named(name, log.clone()));
    let subscription = subscriber.subscription().clone();
    let observer: BoxedObserver<'static, i32, ()> = Box::new(subscriber);
    (observer, subscription)
  }

  #[test]
  fn broadcast_skips_cancelled_and_keeps_order() {
    let log = Log::default();
    let mut subscribers = Subscribers::default();
    let (a, _a) = boxed("a", &log);
    let (b, b_handle) = boxed("b", &log);
    let (c, _c) = boxed("c", &log);
    subscribers.add(a);
    subscribers.add(b);
    subscribers.add(c);

    b_handle.clone().unsubscribe();
    assert_eq!(subscribers.open_count(), 2);
    subscribers.broadcast_value(1);
    subscribers.broadcast_completion(Completion::Failed(()));

    assert_eq!(*log.borrow(), ["a:1", "c:1", "a:failed", "c:failed"]);
  }

  #[test]
  fn remove_by_id_drops_the_entry() {
    let log = Log::default();
    let mut subscribers = Subscribers::default();
    let (a, _a) = boxed("a", &log);
    let (b, _b) = boxed("b", &log);
    let id = subscribers.add(a);
    subscribers.add(b);

    assert!(subscribers.remove(id).is_some());
    assert!(subscribers.remove(id).is_none());
    subscribers.broadcast_value(3);
    assert_eq!(*log.borrow(), ["b:3"]);
  }

  #[test]
  fn merge_appends_later_entries() {
    let log = Log::default();
    let mut subscribers = Subscribers::default();
    let (a, _a) = boxed("a", &log);
    subscribers.add(a);

    let mut taken = subscribers.take();
    let (b, _b) = boxed("b", &log);
    subscribers.add(b);
    taken.merge(subscribers.take());
    taken.broadcast_value(7);

    assert_eq!(*log.borrow(), ["a:7", "b:7"]);
  }
}
