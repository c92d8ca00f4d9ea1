use std::rc::Rc;

use futures::{future::join_all, FutureExt};
use serde_json::{json, Value};

use super::{Fingerprint, Validator, Verdict};

/// Runs every inner validator and reports the first message in declaration
/// order. Every inner validator runs to completion even after one fails. A
/// rejection from any of them rejects the whole chain.
#[derive(Clone)]
pub struct MultiValidator {
  validators: Vec<Rc<dyn Validator>>,
  fingerprint: Fingerprint,
}

impl MultiValidator {
  pub fn new(validators: Vec<Rc<dyn Validator>>) -> Self {
    let params = validators
      .iter()
      .map(|v| json!({ "kind": v.fingerprint().kind(), "params": v.fingerprint().params() }))
      .collect();
    let fingerprint = Fingerprint::new("multi", Value::Array(params));
    fingerprint.cache(
      validators
        .iter()
        .all(|v| v.fingerprint().is_cached()),
    );
    Self { validators, fingerprint }
  }

  pub fn validators(&self) -> &[Rc<dyn Validator>] { &self.validators }
}

impl Validator for MultiValidator {
  fn validate(&self, value: &Value, attribute: &str, attributes: &Value) -> Verdict {
    let jobs = self
      .validators
      .iter()
      .map(|v| v.validate(value, attribute, attributes))
      .collect::<Vec<_>>();

    async move {
      let mut first = None;
      for outcome in join_all(jobs).await {
        if let Some(message) = outcome? {
          first.get_or_insert(message);
        }
      }
      Ok(first)
    }
    .boxed_local()
  }

  fn fingerprint(&self) -> &Fingerprint { &self.fingerprint }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use futures::executor::block_on;
  use serde_json::json;

  use super::*;
  use crate::{
    error::ValidationError,
    model::Message,
    validator::{same_validator, CustomValidator, LengthValidator, PresenceValidator},
  };

  fn shared(validator: impl Validator + 'static) -> Rc<dyn Validator> { Rc::new(validator) }

  #[rxform_macro::test]
  fn first_message_wins() {
    let multi = MultiValidator::new(vec![
      shared(PresenceValidator::with_message("required")),
      shared(LengthValidator::new().min(3).too_short("short")),
    ]);
    let message = block_on(multi.validate(&json!(""), "name", &json!({}))).unwrap();
    assert_eq!(message.map(|m| m.render()), Some("required".into()));

    let message = block_on(multi.validate(&json!("ab"), "name", &json!({}))).unwrap();
    assert_eq!(message.map(|m| m.render()), Some("short".into()));

    assert_eq!(block_on(multi.validate(&json!("abc"), "name", &json!({}))), Ok(None));
  }

  #[rxform_macro::test]
  fn every_validator_runs() {
    let ran = Rc::new(Cell::new(0));
    let counter = |ran: Rc<Cell<i32>>| {
      shared(CustomValidator::new("count", move |_, _, _| {
        ran.set(ran.get() + 1);
        Some(Message::error("no"))
      }))
    };
    let multi = MultiValidator::new(vec![counter(ran.clone()), counter(ran.clone())]);
    let _ = block_on(multi.validate(&json!(1), "n", &json!({})));
    assert_eq!(ran.get(), 2);
  }

  #[rxform_macro::test]
  fn rejection_fails_chain() {
    let multi = MultiValidator::new(vec![
      shared(PresenceValidator::new()),
      shared(CustomValidator::from_future("down", |_, attribute, _| {
        futures::future::ready(Err(ValidationError::rejected(attribute, "down"))).boxed_local()
      })),
    ]);
    let result = block_on(multi.validate(&json!(""), "name", &json!({})));
    assert_eq!(result, Err(ValidationError::rejected("name", "down")));
  }

  #[rxform_macro::test]
  fn identity_follows_members() {
    let build = || MultiValidator::new(vec![shared(PresenceValidator::new()), shared(LengthValidator::new().min(2))]);
    assert!(same_validator(&build(), &build()));

    let with_closure = MultiValidator::new(vec![shared(CustomValidator::new("c", |_, _, _| None))]);
    assert!(!with_closure.fingerprint().is_cached());
  }
}
