//! Subscription handles.
//!
//! A subscription is a control handle returned by `subscribe`. Dropping it
//! does nothing; call `unsubscribe` to detach the observer.

mod boxed;
mod dynamic;

pub use boxed::*;
pub use dynamic::*;

/// Handle to cancel an active subscription.
pub trait Subscription {
  /// Detach the observer. Consumes the handle.
  fn unsubscribe(self);

  /// True once the subscription can no longer deliver values.
  fn is_closed(&self) -> bool;
}

/// The unit subscription is always closed. Returned by sources that finish
/// synchronously.
impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<S: Subscription> Subscription for Option<S> {
  fn unsubscribe(self) {
    if let Some(inner) = self {
      inner.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().is_none_or(Subscription::is_closed) }
}
