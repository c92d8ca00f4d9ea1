use futures::{future, FutureExt};
use serde_json::{json, Value};

use super::{Fingerprint, Validator, Verdict};
use crate::model::Message;

const DEFAULT_MESSAGE: &str = "{attribute} cannot be blank";

/// Fails when the value is null, a blank string, or an empty collection.
#[derive(Debug, Clone)]
pub struct PresenceValidator {
  message: String,
  fingerprint: Fingerprint,
}

impl PresenceValidator {
  pub fn new() -> Self { Self::with_message(DEFAULT_MESSAGE) }

  /// `message` may use the `{attribute}` binding.
  pub fn with_message(message: impl Into<String>) -> Self {
    let message = message.into();
    let fingerprint = Fingerprint::new("presence", json!({ "message": message }));
    Self { message, fingerprint }
  }
}

impl Default for PresenceValidator {
  fn default() -> Self { Self::new() }
}

pub(crate) fn is_blank(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::String(s) => s.trim().is_empty(),
    Value::Array(items) => items.is_empty(),
    Value::Object(map) => map.is_empty(),
    Value::Bool(_) | Value::Number(_) => false,
  }
}

impl Validator for PresenceValidator {
  fn validate(&self, value: &Value, attribute: &str, _attributes: &Value) -> Verdict {
    let verdict = is_blank(value).then(|| Message::error(self.message.clone()).bind("attribute", attribute));
    future::ready(Ok(verdict)).boxed_local()
  }

  fn fingerprint(&self) -> &Fingerprint { &self.fingerprint }
}

#[cfg(test)]
mod tests {
  use futures::executor::block_on;
  use serde_json::json;

  use super::*;

  #[rxform_macro::test]
  fn blank_values_fail() {
    let validator = PresenceValidator::new();
    for blank in [json!(null), json!("  "), json!([]), json!({})] {
      let message = block_on(validator.validate(&blank, "name", &json!({}))).unwrap();
      assert_eq!(message.map(|m| m.render()), Some("name cannot be blank".to_owned()));
    }
  }

  #[rxform_macro::test]
  fn present_values_pass() {
    let validator = PresenceValidator::with_message("required");
    for present in [json!("x"), json!(0), json!(false), json!([1])] {
      assert_eq!(block_on(validator.validate(&present, "name", &json!({}))), Ok(None));
    }
  }
}
