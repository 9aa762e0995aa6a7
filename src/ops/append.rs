use crate::{
  observer::Observer,
  publisher::Publisher,
  subscriber::Subscriber,
  subscription::LocalSubscription,
};

/// Emits every value of `source`, then every value of `suffix`.
#[derive(Clone)]
pub struct Append<S, P> {
  pub(crate) source: S,
  pub(crate) suffix: P,
}

impl<'a, S, P> Publisher<'a> for Append<S, P>
where
  S: Publisher<'a>,
  P: Publisher<'a, Item = S::Item, Err = S::Err> + 'a,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = LocalSubscription;

  fn actual_subscribe<O>(self, subscriber: Subscriber<O>) -> Self::Unsub
  where
    O: Observer<Self::Item, Self::Err> + 'a,
  {
    let subscription = subscriber.subscription.clone();
    let source_subscription = LocalSubscription::default();
    subscription.add(source_subscription.clone());

    tracing::trace!("append: subscribing main publisher");
    let observer = AppendObserver { suffix: self.suffix, downstream: subscriber };
    let source = Subscriber::with_subscription(observer, source_subscription.clone());
    source_subscription.add(self.source.actual_subscribe(source));
    subscription
  }
}

struct AppendObserver<P, O> {
  suffix: P,
  downstream: Subscriber<O>,
}

impl<'a, Item, Err, P, O> Observer<Item, Err> for AppendObserver<P, O>
where
  P: Publisher<'a, Item = Item, Err = Err>,
  O: Observer<Item, Err> + 'a,
{
  #[inline]
  fn next(&mut self, value: Item) { self.downstream.next(value) }

  #[inline]
  fn error(self, err: Err) { self.downstream.error(err) }

  fn complete(self) {
    let AppendObserver { suffix, downstream } = self;
    let subscription = downstream.subscription.clone();
    tracing::trace!("append: main publisher finished, subscribing suffix");
    let unsub = suffix.actual_subscribe(downstream);
    subscription.add(unsub);
  }

  #[inline]
  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}
