use smallvec::SmallVec;

use super::SubscriptionLike;

/// An ordered container of items tagged with a unique, never reused ID.
///
/// Insertion order is preserved, which makes the container usable both for
/// the observers of a subject (delivery order = attachment order) and for a
/// caller-held bag of subscriptions.
///
/// # Examples
///
/// ```rust
/// use rxcombine::subscription::DynamicSubscriptions;
///
/// let mut subs: DynamicSubscriptions<&str> = DynamicSubscriptions::default();
///
/// let a = subs.add("a");
/// let _b = subs.add("b");
/// assert_eq!(subs.len(), 2);
///
/// assert_eq!(subs.remove(a), Some("a"));
/// assert_eq!(subs.remove(a), None);
/// assert_eq!(subs.iter().copied().collect::<Vec<_>>(), vec!["b"]);
/// ```
pub struct DynamicSubscriptions<U> {
  next_id: usize,
  items: SmallVec<[(usize, U); 2]>,
}

impl<U> Default for DynamicSubscriptions<U> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<U> DynamicSubscriptions<U> {
  /// Add an item and return its unique ID.
  #[inline]
  pub fn add(&mut self, item: U) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.items.push((id, item));
    id
  }

  /// Remove an item by ID.
  pub fn remove(&mut self, id: usize) -> Option<U> {
    self.items.iter().position(|(i, _)| *i == id).map(|pos| self.items.remove(pos).1)
  }

  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Keep only the entries for which `f` returns `true`.
  #[inline]
  pub fn retain(&mut self, mut f: impl FnMut(usize, &mut U) -> bool) {
    self.items.retain(|(id, item)| f(*id, item));
  }

  /// Move every entry of `other` behind the entries of `self`, keeping IDs.
  ///
  /// Both containers must come from the same ID sequence, see
  /// [`DynamicSubscriptions::split_off_items`].
  pub fn append(&mut self, other: &mut Self) {
    self.items.extend(other.items.drain(..));
    self.next_id = self.next_id.max(other.next_id);
  }

  /// Take all entries out, leaving an empty container that keeps handing out
  /// fresh IDs.
  pub fn split_off_items(&mut self) -> Self {
    Self { next_id: self.next_id, items: std::mem::take(&mut self.items) }
  }

  /// Drain all items.
  #[inline]
  pub fn drain(&mut self) -> impl Iterator<Item = U> + '_ {
    self.items.drain(..).map(|(_, item)| item)
  }

  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = &U> { self.items.iter().map(|(_, item)| item) }

  #[inline]
  pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut U> {
    self.items.iter_mut().map(|(_, item)| item)
  }
}

impl<U: SubscriptionLike> DynamicSubscriptions<U> {
  /// Unsubscribe all items and clear the container.
  pub fn unsubscribe_all(&mut self) {
    // Release the container before running teardown logic.
    let items: SmallVec<[(usize, U); 2]> = std::mem::take(&mut self.items);
    for (_, mut item) in items {
      item.unsubscribe();
    }
  }
}
