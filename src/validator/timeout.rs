use std::{rc::Rc, time::Duration};

use futures::{
  future::{self, Either, LocalBoxFuture},
  FutureExt,
};
use serde_json::{json, Value};

use super::{Fingerprint, Validator, Verdict};
use crate::error::ValidationError;

type TimerFn = dyn Fn(Duration) -> LocalBoxFuture<'static, ()>;

/// Bounds how long an inner validator may take.
///
/// The crate does not pick a runtime, so the caller supplies the timer:
///
/// ```ignore
/// TimeoutValidator::new(remote_check, Duration::from_secs(2), |after| {
///   Box::pin(tokio::time::sleep(after))
/// })
/// ```
///
/// When the timer fires first the inner future is dropped and the run is
/// rejected with [`ValidationError::TimedOut`].
#[derive(Clone)]
pub struct TimeoutValidator {
  inner: Rc<dyn Validator>,
  after: Duration,
  timer: Rc<TimerFn>,
  fingerprint: Fingerprint,
}

impl TimeoutValidator {
  pub fn new<V, T>(inner: V, after: Duration, timer: T) -> Self
  where
    V: Validator + 'static,
    T: Fn(Duration) -> LocalBoxFuture<'static, ()> + 'static,
  {
    let inner: Rc<dyn Validator> = Rc::new(inner);
    let fingerprint = Fingerprint::new(
      "timeout",
      json!({
        "after_ms": after.as_millis() as u64,
        "kind": inner.fingerprint().kind(),
        "params": inner.fingerprint().params(),
      }),
    );
    fingerprint.cache(inner.fingerprint().is_cached());
    Self { inner, after, timer: Rc::new(timer), fingerprint }
  }
}

impl Validator for TimeoutValidator {
  fn validate(&self, value: &Value, attribute: &str, attributes: &Value) -> Verdict {
    let job = self.inner.validate(value, attribute, attributes);
    let timer = (self.timer)(self.after);
    let attribute = attribute.to_owned();
    let after = self.after;

    future::select(job, timer)
      .map(move |winner| match winner {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => {
          tracing::warn!(attribute = %attribute, ?after, "validator timed out");
          Err(ValidationError::TimedOut { attribute, after })
        }
      })
      .boxed_local()
  }

  fn fingerprint(&self) -> &Fingerprint { &self.fingerprint }
}
