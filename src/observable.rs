//! The `Observable` trait: anything that can be subscribed to.
//!
//! Operators are provided methods on the trait and wrap the source in a
//! struct from [`crate::ops`]. Subscribing threads an observer through every
//! operator down to the source, so the whole chain is statically typed.

use crate::{
  observer::{FnMutObserver, Observer},
  ops::FilterOp,
  subscription::Subscription,
};

pub trait Observable: Sized {
  type Item;
  type Err;
  type Unsub: Subscription;

  /// Attach `observer` to this source. Operators implement this by wrapping
  /// the observer and forwarding to their own source.
  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Self::Item, Self::Err> + 'static;

  /// Subscribe with a closure as the `next` handler.
  fn subscribe<F>(self, next: F) -> Self::Unsub
  where
    F: FnMut(Self::Item) + 'static,
    FnMutObserver<F>: Observer<Self::Item, Self::Err>,
  {
    self.actual_subscribe(FnMutObserver(next))
  }

  /// Subscribe with a full observer.
  fn subscribe_with<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Self::Item, Self::Err> + 'static,
  {
    self.actual_subscribe(observer)
  }

  /// Emit only those items that pass `filter`.
  fn filter<F>(self, filter: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool,
  {
    FilterOp { source: self, filter }
  }
}
