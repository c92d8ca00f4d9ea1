use std::{collections::HashMap, convert::Infallible, rc::Rc};

use futures::{
  future::{self, join_all},
  FutureExt,
};
use serde_json::Value;

use super::{path, Message, Model, ModelEvent, Validation, ValidationState, SCENARIO_DEFAULT};
use crate::{
  error::{ModelError, ValidationError},
  form::Attributes,
  observable::Observable,
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut},
  rule::{resolve_all, ResolvedRules, Rule, Rules},
  subject::Subject,
  validator::{same_validator, Validator},
};

/// A JSON-backed [`Model`].
///
/// Attributes live in a JSON object and are addressed by dot path. Rules
/// are resolved lazily for the active scenario and kept until the scenario
/// changes or a rule is replaced. Clones share the same record.
///
/// ```rust
/// use rxform::prelude::*;
/// use serde_json::json;
///
/// let record = Record::builder(json!({ "name": "" }))
///   .rule("name", PresenceValidator::new())
///   .build()
///   .unwrap();
///
/// let valid = futures::executor::block_on(record.validate());
/// assert_eq!(valid, Ok(false));
/// assert!(record.has_errors());
/// ```
#[derive(Clone)]
pub struct Record {
  inner: MutRc<RecordInner>,
  subject: Subject<ModelEvent, Infallible>,
}

struct RecordInner {
  attributes: Value,
  initial: Value,
  scenario: String,
  rules: Rules,
  resolved: Option<ResolvedRules>,
  states: HashMap<String, ValidationState>,
}

pub struct RecordBuilder {
  attributes: Value,
  rules: Rules,
  scenario: String,
}

impl RecordBuilder {
  pub fn rule(mut self, attribute: impl Into<String>, rule: impl Into<Rule>) -> Self {
    self.rules.insert(attribute.into(), rule.into());
    self
  }

  pub fn rules(mut self, rules: Rules) -> Self {
    self.rules.extend(rules);
    self
  }

  pub fn scenario(mut self, scenario: impl Into<String>) -> Self {
    self.scenario = scenario.into();
    self
  }

  pub fn build(self) -> Result<Record, ModelError> {
    let kind = match &self.attributes {
      Value::Object(_) => None,
      Value::Null => Some("null"),
      Value::Bool(_) => Some("a boolean"),
      Value::Number(_) => Some("a number"),
      Value::String(_) => Some("a string"),
      Value::Array(_) => Some("an array"),
    };
    if let Some(kind) = kind {
      return Err(ModelError::NotAnObject(kind));
    }

    Ok(Record {
      inner: MutRc::own(RecordInner {
        initial: self.attributes.clone(),
        attributes: self.attributes,
        scenario: self.scenario,
        rules: self.rules,
        resolved: None,
        states: HashMap::new(),
      }),
      subject: Subject::new(),
    })
  }
}

impl Record {
  pub fn builder(attributes: Value) -> RecordBuilder {
    RecordBuilder { attributes, rules: Rules::new(), scenario: SCENARIO_DEFAULT.to_owned() }
  }

  /// A record without rules.
  pub fn new(attributes: Value) -> Result<Self, ModelError> { Self::builder(attributes).build() }

  /// Bind `rule` to `attribute`, replacing any previous rule.
  pub fn set_rule(&self, attribute: impl Into<String>, rule: impl Into<Rule>) {
    let attribute = attribute.into();
    let previous = self.validator_for(&attribute);
    let mut inner = self.inner.rc_deref_mut();
    inner.rules.insert(attribute.clone(), rule.into());
    inner.resolved = None;
    let scenario = inner.scenario.clone();
    let current = inner
      .rules
      .get(&attribute)
      .and_then(|rule| rule.resolve(&scenario));
    if !matches!((&previous, &current), (Some(a), Some(b)) if same_validator(&**a, &**b)) {
      inner.states.remove(&attribute);
    }
  }

  /// Drop the resolved rules so the next validation resolves them again.
  /// Use this after a computed rule's inputs change.
  pub fn invalidate_rules(&self) { self.inner.rc_deref_mut().resolved = None; }

  /// Model events that concern `attributes` (or any of their nested
  /// children). An empty list passes every event.
  pub fn when(
    &self, attributes: impl Into<Attributes>,
  ) -> impl Observable<Item = ModelEvent, Err = Infallible> {
    let keys = attributes.into().into_vec();
    self
      .subject
      .clone()
      .filter(move |event: &ModelEvent| keys.is_empty() || keys.iter().any(|key| event.affects(key)))
  }

  fn resolved_rules(&self) -> ResolvedRules {
    let mut inner = self.inner.rc_deref_mut();
    if inner.resolved.is_none() {
      let resolved = resolve_all(&inner.rules, &inner.scenario);
      tracing::debug!(scenario = %inner.scenario, validators = resolved.len(), "resolved rules");
      inner.resolved = Some(resolved);
    }
    inner.resolved.clone().unwrap_or_default()
  }

  fn validator_for(&self, attribute: &str) -> Option<Rc<dyn Validator>> {
    self.resolved_rules().get(attribute).cloned()
  }

  fn settle(&self, attribute: &str, state: ValidationState) {
    self
      .inner
      .rc_deref_mut()
      .states
      .insert(attribute.to_owned(), state.clone());
    self
      .subject
      .clone()
      .next(ModelEvent::Validated { attribute: attribute.to_owned(), state });
  }
}

impl Model for Record {
  fn get(&self, attribute: &str) -> Option<Value> { path::get(&self.inner.rc_deref().attributes, attribute).cloned() }

  fn set(&self, attribute: &str, value: Value) {
    path::set(&mut self.inner.rc_deref_mut().attributes, attribute, value.clone());
    self
      .subject
      .clone()
      .next(ModelEvent::Changed { attribute: attribute.to_owned(), value });
  }

  fn initial_attribute(&self, attribute: &str) -> Option<Value> {
    path::get(&self.inner.rc_deref().initial, attribute).cloned()
  }

  fn attributes(&self) -> Value { self.inner.rc_deref().attributes.clone() }

  fn set_scenario(&self, scenario: &str) {
    if self.is_scenario(scenario) {
      return;
    }
    let before = self.resolved_rules();
    {
      let mut inner = self.inner.rc_deref_mut();
      inner.scenario = scenario.to_owned();
      inner.resolved = None;
    }
    let after = self.resolved_rules();

    self.inner.rc_deref_mut().states.retain(|attribute, _| {
      let keep = matches!(
        (before.get(attribute), after.get(attribute)),
        (Some(a), Some(b)) if same_validator(&**a, &**b)
      );
      if !keep {
        tracing::debug!(%attribute, %scenario, "validation state reset");
      }
      keep
    });
  }

  fn scenario(&self) -> String { self.inner.rc_deref().scenario.clone() }

  fn validate_attributes(&self, attributes: Vec<String>) -> Validation {
    let rules = self.resolved_rules();
    let snapshot = self.attributes();

    let jobs = attributes
      .into_iter()
      .filter_map(|attribute| {
        let validator = rules.get(&attribute)?.clone();
        Some((attribute, validator))
      })
      .collect::<Vec<_>>();
    if jobs.is_empty() {
      return future::ready(Ok(true)).boxed_local();
    }

    let jobs = jobs
      .into_iter()
      .map(|(attribute, validator)| {
        self.settle(&attribute, ValidationState::Pending);
        let value = path::get(&snapshot, &attribute)
          .cloned()
          .unwrap_or(Value::Null);
        let verdict = validator.validate(&value, &attribute, &snapshot);
        let record = self.clone();
        async move {
          let outcome = verdict.await;
          let state = match &outcome {
            Ok(None) => ValidationState::Success,
            Ok(Some(message)) => message.clone().into(),
            Err(err) => {
              tracing::warn!(%attribute, error = %err, "validator rejected");
              ValidationState::Error(Message::error(err.to_string()))
            }
          };
          record.settle(&attribute, state.clone());
          outcome.map(|_| state)
        }
      })
      .collect::<Vec<_>>();

    async move {
      let mut passing = true;
      let mut rejection: Option<ValidationError> = None;
      for outcome in join_all(jobs).await {
        match outcome {
          Ok(state) => passing &= state.is_passing(),
          Err(err) => {
            rejection.get_or_insert(err);
          }
        }
      }
      match rejection {
        Some(err) => Err(err),
        None => Ok(passing),
      }
    }
    .boxed_local()
  }

  fn validate(&self) -> Validation { self.validate_attributes(self.validated_attributes()) }

  fn has_errors(&self) -> bool {
    self
      .inner
      .rc_deref()
      .states
      .values()
      .any(|state| matches!(state, ValidationState::Error(_)))
  }

  fn is_changed(&self) -> bool {
    let inner = self.inner.rc_deref();
    inner.attributes != inner.initial
  }

  fn is_attribute_changed(&self, attribute: &str) -> bool {
    let inner = self.inner.rc_deref();
    path::get(&inner.attributes, attribute) != path::get(&inner.initial, attribute)
  }

  fn validation_state(&self, attribute: &str) -> Option<ValidationState> {
    self.inner.rc_deref().states.get(attribute).cloned()
  }

  fn validated_attributes(&self) -> Vec<String> { self.resolved_rules().keys().cloned().collect() }

  fn observable(&self) -> Subject<ModelEvent, Infallible> { self.subject.clone() }
}
