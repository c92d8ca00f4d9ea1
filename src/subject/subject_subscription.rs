use std::{cell::Cell, rc::Rc};

use smallvec::SmallVec;

use super::subscribers::Subscribers;
use crate::{
  rc::{MutRc, RcDerefMut},
  subscription::Subscription,
};

/// State of the subscription.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SubscriptionState {
  /// Waiting to be added to the subscribers list.
  Pending,
  /// Active with a specific ID in the subscribers list.
  Ready(usize),
  /// Cancelled (unsubscribed), or the subject has terminated.
  Cancelled,
}

/// A subscriber-list mutation that arrived while the subject was
/// broadcasting. Applied once the broadcast returns.
pub(crate) enum Deferred<Ob> {
  Add { observer: Ob, state: Rc<Cell<SubscriptionState>> },
  Remove(usize),
}

pub(crate) type DeferredQueue<Ob> = MutRc<SmallVec<[Deferred<Ob>; 1]>>;

/// Subscription handle for a Subject.
///
/// Holds shared pointers to the subject's observer list and deferred queue,
/// never the subject itself.
pub struct SubjectSubscription<Ob> {
  pub(crate) observers: MutRc<Subscribers<Ob>>,
  pub(crate) deferred: DeferredQueue<Ob>,
  pub(crate) state: Rc<Cell<SubscriptionState>>,
  pub(crate) stopped: Rc<Cell<bool>>,
}

impl<Ob> Subscription for SubjectSubscription<Ob> {
  fn unsubscribe(self) {
    match self.state.get() {
      SubscriptionState::Cancelled => {}
      // The deferred add sees Cancelled and drops the observer.
      SubscriptionState::Pending => self.state.set(SubscriptionState::Cancelled),
      SubscriptionState::Ready(id) => {
        self.state.set(SubscriptionState::Cancelled);
        if let Some(mut guard) = self.observers.try_rc_deref_mut() {
          let _ob = guard.remove(id);
          return;
        }
        self
          .deferred
          .rc_deref_mut()
          .push(Deferred::Remove(id));
      }
    }
  }

  fn is_closed(&self) -> bool {
    self.stopped.get() || self.state.get() == SubscriptionState::Cancelled
  }
}
