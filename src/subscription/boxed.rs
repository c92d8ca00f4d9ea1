use super::Subscription;

/// Helper trait for calling unsubscribe on boxed trait objects
///
/// Since `Subscription::unsubscribe(self)` requires `Sized`, we need this
/// workaround trait to enable `Box<dyn Subscription>` to call unsubscribe.
pub trait BoxedSubscriptionInner {
  fn boxed_unsubscribe(self: Box<Self>);
  fn boxed_is_closed(&self) -> bool;
}

impl<T: Subscription> BoxedSubscriptionInner for T {
  #[inline]
  fn boxed_unsubscribe(self: Box<Self>) { (*self).unsubscribe() }

  #[inline]
  fn boxed_is_closed(&self) -> bool { self.is_closed() }
}

/// A type-erased subscription.
///
/// Lets a change stream keep its upstream subscriptions in plain fields
/// without naming their concrete operator types.
pub struct BoxedSubscription(Box<dyn BoxedSubscriptionInner>);

impl BoxedSubscription {
  #[inline]
  pub fn new(subscription: impl Subscription + 'static) -> Self { Self(Box::new(subscription)) }
}

impl Subscription for BoxedSubscription {
  #[inline]
  fn unsubscribe(self) { self.0.boxed_unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.boxed_is_closed() }
}
