//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for a failure), and
//! complete (for successful completion).

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values and exactly one terminal event from a
/// publisher.
pub trait Observer<Item, Err> {
  /// Receive the next value from the publisher
  fn next(&mut self, value: Item);

  /// Handle a failure of the publisher
  ///
  /// This consumes the observer, as no more values can be emitted after a
  /// failure
  fn error(self, err: Err);

  /// Handle successful completion of the publisher
  ///
  /// This consumes the observer, as no more values can be emitted after
  /// completion
  fn complete(self);

  /// Checks if the observer is closed.
  ///
  /// Sources producing several values synchronously (like `from_iter`) use
  /// this to stop early when the subscription is cancelled from inside a
  /// callback.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// Completion
// ============================================================================

/// The terminal event of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Completion<Err> {
  /// The stream ended successfully.
  Finished,
  /// The stream ended with an error.
  Failed(Err),
}

impl<Err> Completion<Err> {
  #[inline]
  pub fn is_finished(&self) -> bool { matches!(self, Completion::Finished) }

  #[inline]
  pub fn is_failed(&self) -> bool { matches!(self, Completion::Failed(_)) }

  /// Deliver this completion to `observer`.
  pub fn notify<Item, O: Observer<Item, Err>>(self, observer: O) {
    match self {
      Completion::Finished => observer.complete(),
      Completion::Failed(err) => observer.error(err),
    }
  }
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Helper trait to enable object-safe Observers (Box<dyn Observer>)
///
/// Standard Observer trait is not object-safe because terminal methods take
/// `self` by value. DynObserver mirrors the interface but adapts it for
/// vtables.
pub trait DynObserver<Item, Err> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }
  fn box_error(self: Box<Self>, err: Err) { self.error(err); }
  fn box_complete(self: Box<Self>) { self.complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// Boxed value observer (single-threaded, no Send bound)
pub type BoxedObserver<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + 'a>;

impl<'a, Item, Err> Observer<Item, Err> for Box<dyn DynObserver<Item, Err> + 'a> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: Err) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}
