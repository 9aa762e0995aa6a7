use crate::{
  observer::Observer,
  publisher::Publisher,
  subscriber::Subscriber,
  subscription::LocalSubscription,
};

/// Emits every value of `prefix`, then every value of `source`.
#[derive(Clone)]
pub struct Prepend<S, P> {
  pub(crate) source: S,
  pub(crate) prefix: P,
}

impl<'a, S, P> Publisher<'a> for Prepend<S, P>
where
  S: Publisher<'a> + 'a,
  P: Publisher<'a, Item = S::Item, Err = S::Err>,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = LocalSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Self::Item, Self::Err> + 'a,
  {
    let subscription = subscriber.subscription.clone();
    let prefix_subscription = LocalSubscription::default();
    subscription.add(prefix_subscription.clone());

    tracing::trace!("prepend: subscribing prefix");
    let observer = PrependObserver { source: self.source, downstream: subscriber };
    let prefix = Subscriber::with_subscription(observer, prefix_subscription.clone());
    prefix_subscription.add(self.prefix.actual_subscribe(prefix));
    subscription
  }
}

/// Forwards the prefix and, once it finishes, hands the downstream over to
/// the main publisher.
struct PrependObserver<S, O> {
  source: S,
  downstream: Subscriber<O>,
}

impl<'a, Item, Err, S, O> Observer<Item, Err> for PrependObserver<S, O>
where
  S: Publisher<'a, Item = Item, Err = Err>,
  O: Observer<Item, Err> + 'a,
{
  #[inline]
  fn next(&mut self, value: Item) { self.downstream.next(value) }

  #[inline]
  fn error(self, err: Err) { self.downstream.error(err) }

  fn complete(self) {
    let PrependObserver { source, downstream } = self;
    let subscription = downstream.subscription.clone();
    tracing::trace!("prepend: prefix finished, subscribing main publisher");
    let unsub = source.actual_subscribe(downstream);
    subscription.add(unsub);
  }

  #[inline]
  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}
