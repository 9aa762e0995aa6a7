//! Type-erased publishers.
//!
//! Useful when a function returns different publisher chains from different
//! branches, or when a stream of publishers mixes several concrete types.

use crate::{
  observer::{BoxedObserver, Observer},
  publisher::Publisher,
  subscriber::Subscriber,
  subscription::LocalSubscription,
};

/// Object-safe form of [`Publisher`], subscribed with a boxed observer.
pub trait DynPublisher<'a, Item, Err> {
  fn box_subscribe(
    self: Box<Self>, subscriber: Subscriber<BoxedObserver<'a, Item, Err>>,
  ) -> LocalSubscription;
}

impl<'a, T> DynPublisher<'a, T::Item, T::Err> for T
where
  T: Publisher<'a> + 'a,
{
  fn box_subscribe(
    self: Box<Self>, subscriber: Subscriber<BoxedObserver<'a, T::Item, T::Err>>,
  ) -> LocalSubscription {
    let subscription = subscriber.subscription.clone();
    subscription.add((*self).actual_subscribe(subscriber));
    subscription
  }
}

/// [`DynPublisher`] that can also clone itself behind the box.
pub trait DynPublisherClone<'a, Item, Err>: DynPublisher<'a, Item, Err> {
  fn box_clone(&self) -> Box<dyn DynPublisherClone<'a, Item, Err> + 'a>;
}

impl<'a, T> DynPublisherClone<'a, T::Item, T::Err> for T
where
  T: Publisher<'a> + Clone + 'a,
{
  fn box_clone(&self) -> Box<dyn DynPublisherClone<'a, T::Item, T::Err> + 'a> {
    Box::new(self.clone())
  }
}

fn erase<'a, Item, Err, O>(subscriber: Subscriber<O>) -> Subscriber<BoxedObserver<'a, Item, Err>>
where
  O: Observer<Item, Err> + 'a,
{
  let Subscriber { observer, subscription } = subscriber;
  let observer: BoxedObserver<'a, Item, Err> = Box::new(observer);
  Subscriber::with_subscription(observer, subscription)
}

/// A publisher whose concrete type has been erased.
pub struct BoxedPublisher<'a, Item, Err>(Box<dyn DynPublisher<'a, Item, Err> + 'a>);

impl<'a, Item, Err> BoxedPublisher<'a, Item, Err> {
  pub fn new<P>(publisher: P) -> Self
  where
    P: Publisher<'a, Item = Item, Err = Err> + 'a,
  {
    BoxedPublisher(Box::new(publisher))
  }
}

impl<'a, Item, Err> Publisher<'a> for BoxedPublisher<'a, Item, Err> {
  type Item = Item;
  type Err = Err;
  type Unsub = LocalSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'a,
  {
    self.0.box_subscribe(erase(subscriber))
  }
}

/// A cloneable publisher whose concrete type has been erased.
pub struct BoxedPublisherClone<'a, Item, Err>(Box<dyn DynPublisherClone<'a, Item, Err> + 'a>);

impl<'a, Item, Err> BoxedPublisherClone<'a, Item, Err> {
  pub fn new<P>(publisher: P) -> Self
  where
    P: Publisher<'a, Item = Item, Err = Err> + Clone + 'a,
  {
    BoxedPublisherClone(Box::new(publisher))
  }
}

impl<'a, Item, Err> Clone for BoxedPublisherClone<'a, Item, Err> {
  fn clone(&self) -> Self { BoxedPublisherClone(self.0.box_clone()) }
}

impl<'a, Item, Err> Publisher<'a> for BoxedPublisherClone<'a, Item, Err> {
  type Item = Item;
  type Err = Err;
  type Unsub = LocalSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'a,
  {
    self.0.box_subscribe(erase(subscriber))
  }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn box_it_forwards_values() {
    let result = Rc::new(RefCell::new(Vec::new()));
    let c_result = result.clone();

    publisher::of(42).box_it().subscribe(move |v| c_result.borrow_mut().push(v));

    assert_eq!(*result.borrow(), vec![42]);
  }

  #[test]
  fn heterogeneous_branches() {
    fn pick<'a>(short: bool) -> BoxedPublisher<'a, i32, Infallible> {
      if short {
        publisher::of(1).box_it()
      } else {
        publisher::from_iter(vec![1, 2]).append_iter([3]).box_it()
      }
    }

    let mut values = vec![];
    pick(true).subscribe(|v| values.push(v));
    pick(false).subscribe(|v| values.push(v));
    assert_eq!(values, [1, 1, 2, 3]);
  }

  #[test]
  fn boxed_clone_subscribes_twice() {
    let boxed = BoxedPublisherClone::new(publisher::from_iter::<_, Infallible>([1, 2]));
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    boxed.clone().subscribe(move |v| c_values.borrow_mut().push(v));
    let c_values = values.clone();
    boxed.subscribe(move |v| c_values.borrow_mut().push(v * 10));
    assert_eq!(*values.borrow(), [1, 2, 10, 20]);
  }

  #[test]
  fn boxed_subscription_cancels_source() {
    let subject = LocalSubject::<i32, Infallible>::new();
    let mut subscription = subject.clone().box_it().subscribe(|_| {});
    assert_eq!(subject.subscriber_count(), 1);
    subscription.unsubscribe();
    assert!(subscription.is_closed());
    assert_eq!(subject.subscriber_count(), 0);
  }
}
