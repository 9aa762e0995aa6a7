use crate::{observer::Observer, publisher::Publisher, subscriber::Subscriber};

/// Creates a publisher that calls `factory` on every subscription and
/// subscribes to the publisher it returns.
///
/// `Defer` is `Clone` whenever the factory is, so a single-use source such as
/// a future can still be cloned into a
/// [`BoxedPublisherClone`](crate::publisher::BoxedPublisherClone) or pushed
/// through a subject.
///
/// ```rust
/// use rxcombine::prelude::*;
///
/// let source = publisher::defer(|| publisher::from_iter(vec![1, 2]));
/// let mut values = vec![];
/// source.clone().subscribe(|v| values.push(v));
/// source.subscribe(|v| values.push(v * 10));
///
/// assert_eq!(values, [1, 2, 10, 20]);
/// ```
pub fn defer<F>(factory: F) -> Defer<F> { Defer(factory) }

#[derive(Clone)]
pub struct Defer<F>(F);

impl<'a, F, P> Publisher<'a> for Defer<F>
where
  F: FnOnce() -> P,
  P: Publisher<'a>,
{
  type Item = P::Item;
  type Err = P::Err;
  type Unsub = P::Unsub;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Self::Item, Self::Err> + 'a,
  {
    (self.0)().actual_subscribe(subscriber)
  }
}
