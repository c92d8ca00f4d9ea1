use std::rc::Rc;

use futures::{future, FutureExt};
use serde_json::{json, Value};

use super::{Fingerprint, Validator, Verdict};
use crate::model::Message;

type CheckFn = dyn Fn(&Value, &str, &Value) -> Verdict;

/// A validator backed by a closure.
///
/// Closures cannot be compared, so caching starts disabled: two custom
/// validators are only the same when they are the same instance. Call
/// [`Validator::cache`] to opt in, in which case validators with equal
/// names are treated as interchangeable.
#[derive(Clone)]
pub struct CustomValidator {
  check: Rc<CheckFn>,
  fingerprint: Fingerprint,
}

impl CustomValidator {
  /// A synchronous check. Return `Some(message)` to fail.
  pub fn new<F>(name: &str, check: F) -> Self
  where
    F: Fn(&Value, &str, &Value) -> Option<Message> + 'static,
  {
    Self::from_future(name, move |value: &Value, attribute: &str, attributes: &Value| {
      future::ready(Ok(check(value, attribute, attributes))).boxed_local()
    })
  }

  /// An asynchronous check, for validators that need to wait on I/O.
  pub fn from_future<F>(name: &str, check: F) -> Self
  where
    F: Fn(&Value, &str, &Value) -> Verdict + 'static,
  {
    let fingerprint = Fingerprint::new("custom", json!({ "name": name }));
    fingerprint.cache(false);
    Self { check: Rc::new(check), fingerprint }
  }
}

impl Validator for CustomValidator {
  fn validate(&self, value: &Value, attribute: &str, attributes: &Value) -> Verdict {
    (self.check)(value, attribute, attributes)
  }

  fn fingerprint(&self) -> &Fingerprint { &self.fingerprint }
}
