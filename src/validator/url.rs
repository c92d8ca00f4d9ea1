use futures::{future, FutureExt};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::{Fingerprint, Validator, Verdict};
use crate::model::Message;

// http(s) scheme, dot-separated host labels without edge hyphens, optional
// port, path, query and fragment.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r"^https?://[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]*[a-zA-Z0-9])?)*(:[0-9]{1,5})?(/[^\s?#]*)?(\?[^\s#]*)?(#\S*)?$",
  )
  .expect("url pattern is a valid regex")
});

/// Fails on strings that are not an `http` or `https` URL. Empty strings and
/// non-string values pass.
#[derive(Debug, Clone)]
pub struct UrlValidator {
  message: String,
  fingerprint: Fingerprint,
}

impl UrlValidator {
  pub fn new() -> Self { Self::with_message("{attribute} must be a valid URL") }

  pub fn with_message(message: impl Into<String>) -> Self {
    let message = message.into();
    let fingerprint = Fingerprint::new("url", json!({ "message": message }));
    Self { message, fingerprint }
  }
}

impl Default for UrlValidator {
  fn default() -> Self { Self::new() }
}

impl Validator for UrlValidator {
  fn validate(&self, value: &Value, attribute: &str, _attributes: &Value) -> Verdict {
    let verdict = match value {
      Value::String(s) if !s.is_empty() && !URL_PATTERN.is_match(s) => Some(
        Message::error(self.message.clone())
          .bind("attribute", attribute)
          .bind("value", s.as_str()),
      ),
      _ => None,
    };
    future::ready(Ok(verdict)).boxed_local()
  }

  fn fingerprint(&self) -> &Fingerprint { &self.fingerprint }
}
