//! Subject: a hot observable that multicasts to many observers.
//!
//! # Re-Entrancy Policy
//!
//! - Emissions (`next`/`error`/`complete`) made from inside one of the
//!   subject's own callbacks are queued. Each queued emission reaches every
//!   observer once the current broadcast returns, in the order it was made.
//! - Subscription mutations are allowed inside callbacks. A `subscribe` made
//!   during a broadcast does not see the in-progress value and becomes active
//!   when the broadcast returns. An `unsubscribe` made during a broadcast
//!   takes effect at the same point.

mod subject_subscription;
mod subscribers;

use std::{cell::Cell, collections::VecDeque, rc::Rc};

pub use subject_subscription::{SubjectSubscription, SubscriptionState};
pub use subscribers::Subscribers;
use subject_subscription::{Deferred, DeferredQueue};

use crate::{
  observable::Observable,
  observer::{BoxedObserver, Observer},
  rc::{MutRc, RcDeref, RcDerefMut},
};

/// An emission that arrived while the subject was broadcasting.
enum Emission<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

/// A local multicast subject. Clones share the same subscriber list.
///
/// ```rust
/// use std::{cell::RefCell, convert::Infallible, rc::Rc};
///
/// use rxform::prelude::*;
///
/// let subject = Subject::<i32, Infallible>::new();
/// let seen = Rc::new(RefCell::new(vec![]));
/// let c_seen = seen.clone();
/// subject.clone().subscribe(move |v| c_seen.borrow_mut().push(v));
///
/// subject.clone().next(1);
/// subject.clone().next(2);
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// ```
pub struct Subject<Item, Err> {
  observers: MutRc<Subscribers<BoxedObserver<Item, Err>>>,
  deferred: DeferredQueue<BoxedObserver<Item, Err>>,
  emissions: MutRc<VecDeque<Emission<Item, Err>>>,
  stopped: Rc<Cell<bool>>,
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self {
    Subject {
      observers: MutRc::own(Subscribers::default()),
      deferred: MutRc::own(Default::default()),
      emissions: MutRc::own(VecDeque::new()),
      stopped: Rc::new(Cell::new(false)),
    }
  }

  /// Get the number of current subscribers.
  pub fn subscriber_count(&self) -> usize { self.observers.rc_deref().len() }

  /// True once `error` or `complete` has been called.
  pub fn is_stopped(&self) -> bool { self.stopped.get() }

  /// Apply subscriber mutations queued while a broadcast was running.
  fn apply_deferred(&self) {
    loop {
      let batch = std::mem::take(&mut *self.deferred.rc_deref_mut());
      if batch.is_empty() {
        return;
      }
      for op in batch {
        match op {
          Deferred::Add { observer, state } => {
            if state.get() == SubscriptionState::Cancelled {
              continue;
            }
            if self.stopped.get() {
              state.set(SubscriptionState::Cancelled);
              observer.complete();
              continue;
            }
            let id = self.observers.rc_deref_mut().add(observer);
            state.set(SubscriptionState::Ready(id));
          }
          Deferred::Remove(id) => {
            let _ob = self.observers.rc_deref_mut().remove(id);
          }
        }
      }
    }
  }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self {
    Self {
      observers: self.observers.clone(),
      deferred: self.deferred.clone(),
      emissions: self.emissions.clone(),
      stopped: self.stopped.clone(),
    }
  }
}

impl<Item, Err> Subject<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  /// Broadcast `emission` now, or queue it if a broadcast is running.
  fn emit(&self, emission: Emission<Item, Err>) {
    match self.observers.try_rc_deref_mut() {
      Some(mut guard) => Self::deliver(&mut guard, emission),
      None => {
        self.emissions.rc_deref_mut().push_back(emission);
        return;
      }
    }
    self.flush_deferred();
  }

  /// Drain queued subscriber mutations and emissions until both are empty.
  fn flush_deferred(&self) {
    loop {
      self.apply_deferred();
      let Some(emission) = self.emissions.rc_deref_mut().pop_front() else {
        return;
      };
      match self.observers.try_rc_deref_mut() {
        Some(mut guard) => Self::deliver(&mut guard, emission),
        None => {
          // An outer broadcast is still running and drains the rest.
          self.emissions.rc_deref_mut().push_front(emission);
          return;
        }
      }
    }
  }

  fn deliver(observers: &mut Subscribers<BoxedObserver<Item, Err>>, emission: Emission<Item, Err>) {
    match emission {
      Emission::Next(value) => observers.broadcast_value::<Item, Err>(value),
      Emission::Error(err) => observers.broadcast_error::<Item, Err>(err),
      Emission::Complete => observers.broadcast_complete::<Item, Err>(),
    }
  }
}

impl<Item, Err> Observer<Item, Err> for Subject<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  fn next(&mut self, value: Item) {
    if self.stopped.get() {
      return;
    }
    self.emit(Emission::Next(value));
  }

  fn error(self, err: Err) {
    if self.stopped.replace(true) {
      return;
    }
    self.emit(Emission::Error(err));
  }

  fn complete(self) {
    if self.stopped.replace(true) {
      return;
    }
    self.emit(Emission::Complete);
  }

  fn is_closed(&self) -> bool { self.stopped.get() }
}

impl<Item: 'static, Err: 'static> Observable for Subject<Item, Err> {
  type Item = Item;
  type Err = Err;
  type Unsub = SubjectSubscription<BoxedObserver<Item, Err>>;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + 'static,
  {
    let state = Rc::new(Cell::new(SubscriptionState::Pending));
    if self.stopped.get() {
      state.set(SubscriptionState::Cancelled);
      observer.complete();
    } else {
      let boxed: BoxedObserver<Item, Err> = Box::new(observer);
      match self.observers.try_rc_deref_mut() {
        Some(mut guard) => state.set(SubscriptionState::Ready(guard.add(boxed))),
        None => self
          .deferred
          .rc_deref_mut()
          .push(Deferred::Add { observer: boxed, state: state.clone() }),
      }
    }

    SubjectSubscription {
      observers: self.observers,
      deferred: self.deferred,
      state,
      stopped: self.stopped,
    }
  }
}
