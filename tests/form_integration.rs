//! Integration tests for rxform
//!
//! Exercises the form against a recording model, full validation cycles,
//! and change-stream multiplexing across form and model.

use std::{cell::RefCell, convert::Infallible, rc::Rc, time::Duration};

use futures::FutureExt;
use rxform::prelude::*;
use serde_json::{json, Value};

/// A `Record` that logs every attribute list it is asked to validate.
#[derive(Clone)]
struct SpyModel {
  record: Record,
  calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl SpyModel {
  fn new(record: Record) -> Self { Self { record, calls: Rc::new(RefCell::new(vec![])) } }

  fn calls(&self) -> Vec<Vec<String>> { self.calls.borrow().clone() }
}

impl Model for SpyModel {
  fn get(&self, attribute: &str) -> Option<Value> { self.record.get(attribute) }

  fn set(&self, attribute: &str, value: Value) { self.record.set(attribute, value) }

  fn initial_attribute(&self, attribute: &str) -> Option<Value> { self.record.initial_attribute(attribute) }

  fn attributes(&self) -> Value { self.record.attributes() }

  fn set_scenario(&self, scenario: &str) { self.record.set_scenario(scenario) }

  fn scenario(&self) -> String { self.record.scenario() }

  fn validate_attributes(&self, attributes: Vec<String>) -> Validation {
    self.calls.borrow_mut().push(attributes.clone());
    self.record.validate_attributes(attributes)
  }

  fn validate(&self) -> Validation {
    self.calls.borrow_mut().push(self.record.validated_attributes());
    self.record.validate()
  }

  fn has_errors(&self) -> bool { self.record.has_errors() }

  fn is_changed(&self) -> bool { self.record.is_changed() }

  fn is_attribute_changed(&self, attribute: &str) -> bool { self.record.is_attribute_changed(attribute) }

  fn validation_state(&self, attribute: &str) -> Option<ValidationState> {
    self.record.validation_state(attribute)
  }

  fn validated_attributes(&self) -> Vec<String> { self.record.validated_attributes() }

  fn observable(&self) -> Subject<ModelEvent, Infallible> { self.record.observable() }
}

fn signup_record() -> Record {
  Record::builder(json!({ "name": "", "password": "" }))
    .rule("name", PresenceValidator::new())
    .rule(
      "password",
      Rule::chain([Rule::from(PresenceValidator::new()), Rule::from(LengthValidator::new().min(6))]),
    )
    .build()
    .unwrap()
}

fn spy_form() -> (Form<SpyModel>, SpyModel) {
  let spy = SpyModel::new(signup_record());
  (Form::new(spy.clone()), spy)
}

fn collect<O>(source: O) -> Rc<RefCell<Vec<O::Item>>>
where
  O: Observable<Err = Infallible>,
  O::Item: 'static,
{
  let seen = Rc::new(RefCell::new(vec![]));
  let c_seen = seen.clone();
  source.subscribe(move |v| c_seen.borrow_mut().push(v));
  seen
}

#[rxform_macro::test]
fn dirty_set_is_distinct_touched_attributes() {
  let (form, _) = spy_form();
  for (attribute, value) in [("name", "a"), ("password", "b"), ("name", "c"), ("name", "a")] {
    form.set_attribute(attribute, json!(value));
  }
  assert_eq!(form.dirty_attributes(), vec!["name", "password"]);
}

#[rxform_macro::test]
async fn dirty_set_never_shrinks() {
  let (form, _) = spy_form();
  form.set_attribute("name", json!("Ada"));
  form.mark_as_dirty("bio");

  let mut before = form.dirty_attributes();
  for request in [vec![], vec!["password"], vec!["name"], vec!["unknown"]] {
    let _ = form.validate_attributes(request).await;
    let after = form.dirty_attributes();
    assert!(before.iter().all(|a| after.contains(a)));
    before = after;
  }
}

#[rxform_macro::test]
async fn empty_work_set_skips_the_model() {
  let (form, spy) = spy_form();

  assert_eq!(form.validate_attributes(()).await, Ok(true));
  assert_eq!(form.validate_attributes(["name", "password"]).await, Ok(true));
  assert_eq!(form.validate_attributes(None::<&str>).await, Ok(true));

  assert!(spy.calls().is_empty());
}

#[rxform_macro::test]
async fn full_validation_dirties_every_bound_attribute() {
  let (form, _) = spy_form();
  assert!(form.dirty_attributes().is_empty());

  let _ = form.validate().await;

  assert_eq!(form.dirty_attributes(), vec!["name", "password"]);
}

#[rxform_macro::test]
fn stream_delivers_only_matching_form_changes() {
  let (form, _) = spy_form();
  let seen = collect(form.state_stream().watch_form("foo"));

  let feed = |pairs: Vec<(&str, i32)>| {
    form.set_state(pairs.into_iter().map(|(k, v)| (k.to_owned(), json!(v))).collect());
  };
  feed(vec![("foo", 1)]);
  feed(vec![("bar", 1)]);
  feed(vec![("foo", 2), ("bar", 2)]);

  let seen = seen.borrow();
  assert_eq!(seen.len(), 2);
  assert!(matches!(&seen[0], StateChange::Form(change) if change["foo"] == json!(1)));
  assert!(matches!(&seen[1], StateChange::Form(change) if change["foo"] == json!(2)));
}

#[rxform_macro::test]
fn nested_write_creates_missing_parents() {
  let form = Form::new(Record::new(json!({})).unwrap());
  form.set_attribute("a.b", json!(5));
  assert_eq!(form.attribute("a"), Some(json!({ "b": 5 })));
  assert_eq!(form.initial_attribute("a"), None);
}

#[rxform_macro::test]
async fn basic_lifecycle() {
  let form = Form::new(signup_record());

  assert_eq!(form.validate().await, Ok(false));
  assert!(!form.is_form_valid());

  form.set_attribute("name", json!("John"));
  form.set_attribute("password", json!("123qwe"));
  assert_eq!(form.validate().await, Ok(true));
  assert!(form.is_form_valid());
  assert_eq!(form.validation_state("password"), Some(ValidationState::Success));
}

#[rxform_macro::test]
async fn password_rules_report_in_declaration_order() {
  let form = Form::new(signup_record());

  let _ = form.validate().await;
  assert_eq!(
    form.validation_error("password").map(|m| m.render()),
    Some("password cannot be blank".into())
  );

  form.set_attribute("password", json!("x"));
  let _ = form.validate_attributes("password").await;
  assert_eq!(
    form.validation_message("password").map(|m| m.render()),
    Some("password must be at least 6 characters".into())
  );
}

#[rxform_macro::test]
async fn selective_validation() {
  let (form, spy) = spy_form();

  form.set_attributes(json!({ "name": "John" }));
  let _ = form.validate_attributes("name").await;
  let _ = form.validate_attributes(["name", "password"]).await;
  form.set_attribute("password", json!("x"));
  let _ = form.validate_attributes(["name", "password"]).await;

  assert_eq!(spy.calls(), vec![vec!["name"], vec!["name"], vec!["name", "password"]]);
}

#[rxform_macro::test]
fn stream_multiplexing_form_only() {
  let (form, _) = spy_form();
  let seen = collect(form.state_stream().watch_form("a"));

  form.set_attribute("a", json!("model value"));
  form.set("a", json!("form value"));

  assert_eq!(seen.borrow().len(), 1);
  assert!(matches!(&seen.borrow()[0], StateChange::Form(_)));
}

#[rxform_macro::test]
fn stream_multiplexing_both_upstreams() {
  let (form, _) = spy_form();
  let seen = collect(form.state_stream().watch_form("a").watch_model("name"));

  form.set_attribute("password", json!("ignored"));
  form.set_attribute("name", json!("John"));
  form.set("a", json!(1));
  form.set("b", json!(2));

  let kinds = seen
    .borrow()
    .iter()
    .map(|change| match change {
      StateChange::Form(_) => "form",
      StateChange::Model(_) => "model",
      StateChange::Subscribed => "subscribed",
    })
    .collect::<Vec<_>>();
  assert_eq!(kinds, vec!["model", "form"]);
}

#[rxform_macro::test]
async fn validation_transitions_reach_watchers() {
  let form = Form::new(signup_record());
  let stream = form
    .state_stream()
    .emit_on_subscribe()
    .watch_validation("password");
  let seen = collect(stream.clone());

  form.set_attribute("password", json!("123qwe"));
  let _ = form.validate_attributes("password").await;

  let states = seen
    .borrow()
    .iter()
    .map(|change| match change {
      StateChange::Model(ModelEvent::Validated { state, .. }) => Some(state.clone()),
      _ => None,
    })
    .collect::<Vec<_>>();
  assert_eq!(states, vec![None, Some(ValidationState::Pending), Some(ValidationState::Success)]);

  stream.unsubscribe();
  let _ = form.validate_attributes("password").await;
  assert_eq!(seen.borrow().len(), 3);
}

#[rxform_macro::test]
async fn rejection_propagates_from_form() {
  let record = Record::builder(json!({ "email": "" }))
    .rule(
      "email",
      CustomValidator::from_future("remote", |_, attribute, _| {
        let attribute = attribute.to_owned();
        async move { Err(ValidationError::rejected(attribute, "lookup failed")) }.boxed_local()
      }),
    )
    .build()
    .unwrap();
  let form = Form::new(record);

  let outcome = form.validate_attributes_with("email", false).await;

  assert_eq!(outcome, Err(ValidationError::rejected("email", "lookup failed")));
  assert!(matches!(form.validation_state("email"), Some(ValidationState::Error(_))));
  assert_eq!(form.dirty_attributes(), vec!["email"]);
}

#[rxform_macro::test(paused)]
async fn overlapping_validations_last_settle_wins() {
  let record = Record::builder(json!({ "code": "" }))
    .rule(
      "code",
      CustomValidator::from_future("slow_when_short", |value, _, _| {
        let short = value.as_str().is_some_and(|s| s.len() < 3);
        async move {
          let delay = if short { 50 } else { 10 };
          tokio::time::sleep(Duration::from_millis(delay)).await;
          Ok(short.then(|| Message::error("too short")))
        }
        .boxed_local()
      }),
    )
    .build()
    .unwrap();
  let form = Form::new(record);

  form.set_attribute("code", json!("ab"));
  let first = form.validate_attributes("code");
  form.set_attribute("code", json!("abcd"));
  let second = form.validate_attributes("code");

  let (first, second) = futures::join!(first, second);

  assert_eq!(first, Ok(false));
  assert_eq!(second, Ok(true));
  assert!(matches!(form.validation_state("code"), Some(ValidationState::Error(_))));
}

#[rxform_macro::test]
async fn scenario_scoped_rules() {
  let record = Record::builder(json!({ "name": "", "website": "nope" }))
    .rule("name", PresenceValidator::new())
    .rule("website", Rule::from(UrlValidator::new()).on(["profile"]))
    .build()
    .unwrap();
  let form = Form::new(record);

  let _ = form.validate().await;
  assert_eq!(form.dirty_attributes(), vec!["name"]);
  assert_eq!(form.validation_state("website"), None);

  form.set_scenario("profile");
  assert!(form.dirty_attributes().is_empty());
  assert!(form.validation_state("name").is_some());

  assert_eq!(form.validate().await, Ok(false));
  assert!(form.validation_error("website").is_some());
}

#[rxform_macro::test]
fn when_handler_can_write_back_into_the_form() {
  let form = Form::new_with(signup_record(), |form| {
    let handle = form.clone();
    form
      .when("country")
      .subscribe(move |_| handle.set("city", Value::Null));
  });
  let seen = collect(form.observable());

  form.set("country", json!("NO"));

  assert_eq!(form.get("city"), Some(Value::Null));
  let keys = seen
    .borrow()
    .iter()
    .map(|change| change.keys().cloned().collect::<Vec<_>>())
    .collect::<Vec<_>>();
  assert_eq!(keys, vec![vec!["country"], vec!["city"]]);
}

#[rxform_macro::test]
fn model_handler_can_set_a_dependent_attribute() {
  let form = Form::new(Record::new(json!({ "country": "", "city": "Oslo" })).unwrap());
  let handle = form.clone();
  form
    .model()
    .when("country")
    .subscribe(move |_| handle.set_attribute("city", json!("")));

  form.set_attribute("country", json!("SE"));

  assert_eq!(form.attribute("city"), Some(json!("")));
  assert_eq!(form.dirty_attributes(), vec!["city", "country"]);
}

#[rxform_macro::test]
async fn pending_handler_can_start_another_validation() {
  let form = Form::new(signup_record());
  let follow_up: Rc<RefCell<Option<Validation>>> = Rc::new(RefCell::new(None));

  let handle = form.clone();
  let c_follow_up = follow_up.clone();
  form
    .state_stream()
    .watch_pending("password")
    .subscribe(move |_| {
      if c_follow_up.borrow().is_none() {
        let validation = handle.validate_attributes_with("name", false);
        *c_follow_up.borrow_mut() = Some(validation);
      }
    });

  form.set_attribute("password", json!("123qwe"));
  assert_eq!(form.validate_attributes("password").await, Ok(true));

  let validation = follow_up.borrow_mut().take().unwrap();
  assert_eq!(validation.await, Ok(false));
  assert_eq!(form.dirty_attributes(), vec!["password", "name"]);
  assert!(matches!(form.validation_state("name"), Some(ValidationState::Error(_))));
}
