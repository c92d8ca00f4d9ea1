//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use std::convert::Infallible;

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: the consumer of a stream.
pub trait Observer<Item, Err> {
  /// Receive the next value.
  fn next(&mut self, value: Item);

  /// Handle an error. Consumes the observer, nothing can follow an error.
  fn error(self, err: Err);

  /// Handle completion. Consumes the observer, nothing can follow it.
  fn complete(self);

  /// Returns `true` if the observer will not accept more values.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Object-safe mirror of [`Observer`], so observers can be stored as
/// `Box<dyn DynObserver<..>>` inside a subject.
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

/// Boxed observer. Everything in this crate is single-threaded, so there is
/// no `Send` variant.
pub type BoxedObserver<Item, Err> = Box<dyn DynObserver<Item, Err>>;

impl<Item, Err> Observer<Item, Err> for BoxedObserver<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: Err) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

// ============================================================================
// FnMutObserver - Closure adapter
// ============================================================================

/// Closure adapter used by `subscribe(|v| ..)`.
///
/// The closure becomes the `next` handler. Completion is ignored, and errors
/// cannot happen because the error type is `Infallible`.
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<F, Item> Observer<Item, Infallible> for FnMutObserver<F>
where
  F: FnMut(Item),
{
  #[inline]
  fn next(&mut self, v: Item) { (self.0)(v); }

  #[inline]
  fn error(self, _err: Infallible) {}

  #[inline]
  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;

  struct Recorder {
    values: Rc<RefCell<Vec<i32>>>,
    completed: Rc<RefCell<bool>>,
  }

  impl Observer<i32, ()> for Recorder {
    fn next(&mut self, value: i32) { self.values.borrow_mut().push(value); }

    fn error(self, _: ()) {}

    fn complete(self) { *self.completed.borrow_mut() = true; }

    fn is_closed(&self) -> bool { *self.completed.borrow() }
  }

  fn recorder() -> (Recorder, Rc<RefCell<Vec<i32>>>, Rc<RefCell<bool>>) {
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(RefCell::new(false));
    (Recorder { values: values.clone(), completed: completed.clone() }, values, completed)
  }

  #[rxform_macro::test]
  fn boxed_observer_delegates() {
    let (rec, values, completed) = recorder();
    let mut boxed: BoxedObserver<i32, ()> = Box::new(rec);
    boxed.next(1);
    boxed.next(2);
    assert!(!boxed.is_closed());
    boxed.complete();

    assert_eq!(*values.borrow(), vec![1, 2]);
    assert!(*completed.borrow());
  }

  #[rxform_macro::test]
  fn closure_as_observer() {
    let mut count = 0;
    let mut closure_obs = FnMutObserver(|v: i32| {
      count += v;
    });

    closure_obs.next(10);
    closure_obs.next(20);
    assert_eq!(count, 30);
  }
}
