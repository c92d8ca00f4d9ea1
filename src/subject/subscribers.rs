use crate::{observer::Observer, subscription::DynamicSubscriptions};

/// Subscribers container using DynamicSubscriptions for ID-based management.
///
/// Holds the observers of one `Subject` and knows how to broadcast to them.
/// When broadcasting a value, the last observer receives the moved value
/// instead of a clone.
pub struct Subscribers<Ob> {
  pub(crate) inner: DynamicSubscriptions<Ob>,
}

impl<Ob> Default for Subscribers<Ob> {
  fn default() -> Self { Self { inner: DynamicSubscriptions::default() } }
}

impl<Ob> Subscribers<Ob> {
  #[inline]
  pub fn add(&mut self, observer: Ob) -> usize { self.inner.add(observer) }

  #[inline]
  pub fn remove(&mut self, id: usize) -> Option<Ob> { self.inner.remove(id) }

  #[inline]
  pub fn contains(&self, id: usize) -> bool { self.inner.contains(id) }

  #[inline]
  pub fn len(&self) -> usize { self.inner.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.inner.is_empty() }
}

impl<Ob> Subscribers<Ob> {
  /// Broadcast value to all observers, cloning for every observer but the
  /// last.
  pub(crate) fn broadcast_value<Item, Err>(&mut self, value: Item)
  where
    Ob: Observer<Item, Err>,
    Item: Clone,
  {
    let mut iter = self.inner.iter_mut().peekable();
    while let Some(observer) = iter.next() {
      if iter.peek().is_some() {
        observer.next(value.clone());
      } else {
        observer.next(value);
        break;
      }
    }
  }

  /// Broadcast error to all observers and clear the subscriber list.
  pub(crate) fn broadcast_error<Item, Err>(&mut self, err: Err)
  where
    Ob: Observer<Item, Err>,
    Err: Clone,
  {
    let mut iter = self.inner.drain().peekable();
    while let Some(observer) = iter.next() {
      if iter.peek().is_some() {
        observer.error(err.clone());
      } else {
        observer.error(err);
        break;
      }
    }
  }

  /// Broadcast completion to all observers and clear the subscriber list.
  pub(crate) fn broadcast_complete<Item, Err>(&mut self)
  where
    Ob: Observer<Item, Err>,
  {
    for observer in self.inner.drain() {
      observer.complete();
    }
  }
}
