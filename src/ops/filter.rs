use crate::{observable::Observable, observer::Observer};

/// Emit only those items from an Observable that pass a predicate test
///
/// ```
/// use std::{cell::RefCell, convert::Infallible, rc::Rc};
///
/// use rxform::prelude::*;
///
/// let coll = Rc::new(RefCell::new(vec![]));
/// let coll_clone = coll.clone();
///
/// let numbers = Subject::<i32, Infallible>::new();
/// numbers
///   .clone()
///   .filter(|v| *v % 2 == 0)
///   .subscribe(move |v| coll_clone.borrow_mut().push(v));
/// for i in 0..6 {
///   numbers.clone().next(i);
/// }
///
/// // only even numbers received.
/// assert_eq!(*coll.borrow(), vec![0, 2, 4]);
/// ```
pub struct FilterOp<S, F> {
  pub(crate) source: S,
  pub(crate) filter: F,
}

pub struct FilterObserver<O, F> {
  observer: O,
  filter: F,
}

impl<S, F> Observable for FilterOp<S, F>
where
  S: Observable,
  F: FnMut(&S::Item) -> bool + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Self::Item, Self::Err> + 'static,
  {
    self
      .source
      .actual_subscribe(FilterObserver { observer, filter: self.filter })
  }
}

impl<Item, Err, O, F> Observer<Item, Err> for FilterObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.filter)(&value) {
      self.observer.next(value)
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxform_macro::test]
  fn passes_error_through() {
    let subject = Subject::<i32, &'static str>::new();
    let seen = Rc::new(RefCell::new(None));

    struct ErrSink(Rc<RefCell<Option<&'static str>>>);

    impl Observer<i32, &'static str> for ErrSink {
      fn next(&mut self, _: i32) {}

      fn error(self, err: &'static str) { *self.0.borrow_mut() = Some(err); }

      fn complete(self) {}

      fn is_closed(&self) -> bool { false }
    }

    subject
      .clone()
      .filter(|_| true)
      .subscribe_with(ErrSink(seen.clone()));
    subject.clone().error("boom");

    assert_eq!(*seen.borrow(), Some("boom"));
  }
}
