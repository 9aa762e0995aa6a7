use std::convert::Infallible;

use crate::observer::{Completion, Observer};

/// Observer over a value handler, for publishers that cannot fail.
///
/// The terminal event is ignored; the subscription still closes through the
/// [`Subscriber`](crate::subscriber::Subscriber) wrapping it.
#[derive(Clone)]
pub struct ObserverFn<N>(pub N);

impl<Item, N> Observer<Item, Infallible> for ObserverFn<N>
where
  N: FnMut(Item),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.0)(value) }

  fn error(self, err: Infallible) { match err {} }

  #[inline]
  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// Observer over a value handler and a one-shot completion handler.
pub struct SinkObserver<N, C> {
  next: N,
  on_complete: C,
}

impl<N, C> SinkObserver<N, C> {
  pub fn new(next: N, on_complete: C) -> Self { SinkObserver { next, on_complete } }
}

impl<Item, Err, N, C> Observer<Item, Err> for SinkObserver<N, C>
where
  N: FnMut(Item),
  C: FnOnce(Completion<Err>),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  fn error(self, err: Err) { (self.on_complete)(Completion::Failed(err)) }

  fn complete(self) { (self.on_complete)(Completion::Finished) }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

#[cfg(test)]
mod test {
  use std::{cell::Cell, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn sink_sees_values_then_completion() {
    let mut events = vec![];
    let mut completion = None;
    publisher::from_iter::<_, &str>(["a", "b"])
      .append(publisher::throw_err("late"))
      .sink(|v| events.push(v), |c| completion = Some(c));

    assert_eq!(events, ["a", "b"]);
    assert_eq!(completion, Some(Completion::Failed("late")));
  }

  #[test]
  fn completion_handler_runs_once() {
    let subject = LocalSubject::<i32, ()>::new();
    let count = Rc::new(Cell::new(0));
    let c_count = count.clone();
    subject.clone().sink(|_| {}, move |_| c_count.set(c_count.get() + 1));
    subject.finish();
    subject.finish();
    subject.fail(());

    assert_eq!(count.get(), 1);
  }
}
