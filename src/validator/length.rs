use futures::{future, FutureExt};
use serde_json::{json, Value};

use super::{Fingerprint, Validator, Verdict};
use crate::model::Message;

/// Bounds the length of a string (in characters) or an array (in elements).
///
/// Other value kinds, `null` included, pass: pair it with
/// [`PresenceValidator`](super::PresenceValidator) to require a value.
#[derive(Debug, Clone)]
pub struct LengthValidator {
  min: Option<usize>,
  max: Option<usize>,
  too_short: String,
  too_long: String,
  fingerprint: Fingerprint,
}

impl LengthValidator {
  pub fn new() -> Self {
    let mut validator = Self {
      min: None,
      max: None,
      too_short: "{attribute} must be at least {min} characters".into(),
      too_long: "{attribute} must be at most {max} characters".into(),
      fingerprint: Fingerprint::new("length", Value::Null),
    };
    validator.refresh();
    validator
  }

  pub fn min(mut self, min: usize) -> Self {
    self.min = Some(min);
    self.refresh();
    self
  }

  pub fn max(mut self, max: usize) -> Self {
    self.max = Some(max);
    self.refresh();
    self
  }

  pub fn too_short(mut self, message: impl Into<String>) -> Self {
    self.too_short = message.into();
    self.refresh();
    self
  }

  pub fn too_long(mut self, message: impl Into<String>) -> Self {
    self.too_long = message.into();
    self.refresh();
    self
  }

  fn refresh(&mut self) {
    self.fingerprint.set_params(json!({
      "min": self.min,
      "max": self.max,
      "too_short": self.too_short,
      "too_long": self.too_long,
    }));
  }

  fn check(&self, len: usize, attribute: &str) -> Option<Message> {
    if let Some(min) = self.min.filter(|min| len < *min) {
      return Some(
        Message::error(self.too_short.clone())
          .bind("attribute", attribute)
          .bind("min", min),
      );
    }
    if let Some(max) = self.max.filter(|max| len > *max) {
      return Some(
        Message::error(self.too_long.clone())
          .bind("attribute", attribute)
          .bind("max", max),
      );
    }
    None
  }
}

impl Default for LengthValidator {
  fn default() -> Self { Self::new() }
}

impl Validator for LengthValidator {
  fn validate(&self, value: &Value, attribute: &str, _attributes: &Value) -> Verdict {
    let len = match value {
      Value::String(s) => Some(s.chars().count()),
      Value::Array(items) => Some(items.len()),
      _ => None,
    };
    let verdict = len.and_then(|len| self.check(len, attribute));
    future::ready(Ok(verdict)).boxed_local()
  }

  fn fingerprint(&self) -> &Fingerprint { &self.fingerprint }
}
