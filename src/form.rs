//! The form: form-local properties, dirty-attribute tracking and validation
//! scheduling on top of a [`Model`].

mod attributes;

use std::{collections::HashMap, convert::Infallible};

pub use attributes::Attributes;
use futures::{
  future::{self, LocalBoxFuture},
  FutureExt,
};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

pub use crate::model::SCENARIO_DEFAULT;
use crate::{
  error::ValidationError,
  model::{Message, Model, Validation, ValidationState},
  observable::Observable,
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut},
  state_stream::FilteredChangeStream,
  subject::Subject,
};

/// One form mutation: every property written by a single `set`/`set_state`
/// call, with its new value.
pub type FormChange = IndexMap<String, Value>;

/// A form bound to a model.
///
/// `Form` is a handle: clones share properties, the dirty set and the
/// mutation stream. The model is injected and never constructed by the
/// form.
///
/// An attribute becomes dirty when the form writes it, when
/// [`mark_as_dirty`](Form::mark_as_dirty) names it, or when a validation
/// request pulls it in. Passing validation never cleans it; only a
/// scenario change resets the set.
///
/// ```rust
/// use rxform::prelude::*;
/// use serde_json::json;
///
/// let record = Record::builder(json!({ "name": "", "password": "" }))
///   .rule("name", PresenceValidator::new())
///   .build()
///   .unwrap();
/// let form = Form::new(record);
///
/// form.set_attribute("name", json!("Ada"));
/// let valid = futures::executor::block_on(form.validate_attributes("name"));
///
/// assert_eq!(valid, Ok(true));
/// assert_eq!(form.dirty_attributes(), vec!["name"]);
/// ```
pub struct Form<M: Model> {
  inner: MutRc<FormInner>,
  model: M,
  observable: Subject<FormChange, Infallible>,
}

#[derive(Default)]
struct FormInner {
  properties: HashMap<String, Value>,
  dirty_attributes: IndexSet<String>,
}

impl<M: Model> Clone for Form<M> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone(), model: self.model.clone(), observable: self.observable.clone() }
  }
}

impl<M: Model> Form<M> {
  pub fn new(model: M) -> Self {
    Self { inner: MutRc::own(FormInner::default()), model, observable: Subject::new() }
  }

  /// Build a form and run `prepare` on it before handing it out, typically
  /// to wire up `when(..)` handlers.
  pub fn new_with(model: M, prepare: impl FnOnce(&Self)) -> Self {
    let form = Self::new(model);
    prepare(&form);
    form
  }

  pub fn model(&self) -> &M { &self.model }

  /// The raw stream of form property mutations.
  pub fn observable(&self) -> Subject<FormChange, Infallible> { self.observable.clone() }

  /// A fresh filtered change stream over this form and its model.
  pub fn state_stream(&self) -> FilteredChangeStream<M> { FilteredChangeStream::new(self.clone()) }

  /// Form mutations touching any of `properties`. An empty list passes
  /// every mutation.
  pub fn when(&self, properties: impl Into<Attributes>) -> impl Observable<Item = FormChange, Err = Infallible> {
    let properties = properties.into().into_vec();
    self
      .observable()
      .filter(move |change: &FormChange| {
        properties.is_empty() || properties.iter().any(|p| change.contains_key(p))
      })
  }

  // ---- form properties ----

  pub fn set(&self, name: impl Into<String>, value: Value) {
    let mut change = FormChange::new();
    change.insert(name.into(), value);
    self.set_state(change);
  }

  pub fn get(&self, name: &str) -> Option<Value> { self.inner.rc_deref().properties.get(name).cloned() }

  /// Write several properties at once. Subscribers see a single mutation
  /// carrying every key.
  pub fn set_state(&self, changes: FormChange) {
    if changes.is_empty() {
      return;
    }
    {
      let mut inner = self.inner.rc_deref_mut();
      for (name, value) in &changes {
        inner.properties.insert(name.clone(), value.clone());
      }
    }
    self.observable.clone().next(changes);
  }

  // ---- attributes ----

  pub fn mark_as_dirty(&self, attribute: impl Into<String>) {
    let attribute = attribute.into();
    if self
      .inner
      .rc_deref_mut()
      .dirty_attributes
      .insert(attribute.clone())
    {
      tracing::trace!(%attribute, "marked dirty");
    }
  }

  pub fn set_attribute(&self, attribute: &str, value: Value) {
    self.model.set(attribute, value);
    self.mark_as_dirty(attribute);
  }

  /// Write each entry of `values` (an object of attribute to value) and
  /// mark it dirty. Non-object payloads are ignored.
  pub fn set_attributes(&self, values: Value) {
    let Value::Object(values) = values else {
      tracing::warn!("set_attributes expects an object, ignoring");
      return;
    };
    for (attribute, value) in values {
      self.set_attribute(&attribute, value);
    }
  }

  pub fn attribute(&self, attribute: &str) -> Option<Value> { self.model.get(attribute) }

  pub fn initial_attribute(&self, attribute: &str) -> Option<Value> { self.model.initial_attribute(attribute) }

  pub fn attributes(&self) -> Value { self.model.attributes() }

  /// The attribute snapshot. With `use_validation` the whole model is
  /// validated first and `None` comes back when it does not pass.
  pub fn model_attributes(
    &self, use_validation: bool,
  ) -> LocalBoxFuture<'static, Result<Option<Value>, ValidationError>> {
    if !use_validation {
      return future::ready(Ok(Some(self.attributes()))).boxed_local();
    }
    let validation = self.validate();
    let model = self.model.clone();
    async move { Ok(validation.await?.then(|| model.attributes())) }.boxed_local()
  }

  /// Dirty attributes in the order they were first marked.
  pub fn dirty_attributes(&self) -> Vec<String> {
    self
      .inner
      .rc_deref()
      .dirty_attributes
      .iter()
      .cloned()
      .collect()
  }

  // ---- scenarios ----

  /// Switch the model's scenario. An actual change resets the dirty set.
  pub fn set_scenario(&self, scenario: &str) {
    if self.model.is_scenario(scenario) {
      return;
    }
    self.model.set_scenario(scenario);
    self.inner.rc_deref_mut().dirty_attributes.clear();
    tracing::debug!(%scenario, "scenario changed, dirty attributes cleared");
  }

  pub fn scenario(&self) -> String { self.model.scenario() }

  pub fn is_scenario(&self, scenario: &str) -> bool { self.model.is_scenario(scenario) }

  // ---- validation ----

  /// Validate every attribute that has a validator, marking them all dirty.
  pub fn validate(&self) -> Validation {
    for attribute in self.model.validated_attributes() {
      self.mark_as_dirty(attribute);
    }
    self.model.validate()
  }

  /// Validate `attributes` that are dirty, plus everything already dirty.
  pub fn validate_attributes(&self, attributes: impl Into<Attributes>) -> Validation {
    self.validate_attributes_with(attributes, true)
  }

  /// Validate the union of the dirty set and `attributes`.
  ///
  /// With `only_dirty`, requested attributes that are neither dirty nor
  /// changed in the model are dropped first. The union becomes the new dirty
  /// set before the model is asked to validate it. An empty union resolves
  /// to `Ok(true)` without calling the model.
  pub fn validate_attributes_with(&self, attributes: impl Into<Attributes>, only_dirty: bool) -> Validation {
    let mut requested = attributes.into().into_vec();
    if only_dirty {
      requested.retain(|attribute| self.is_attribute_dirty(attribute));
    }

    let work = {
      let mut inner = self.inner.rc_deref_mut();
      inner.dirty_attributes.extend(requested);
      inner
        .dirty_attributes
        .iter()
        .cloned()
        .collect::<Vec<_>>()
    };

    if work.is_empty() {
      tracing::debug!("nothing to validate");
      return future::ready(Ok(true)).boxed_local();
    }
    tracing::debug!(attributes = ?work, "validating");
    self.model.validate_attributes(work)
  }

  // ---- queries ----

  pub fn is_form_dirty(&self) -> bool { !self.inner.rc_deref().dirty_attributes.is_empty() }

  pub fn is_form_valid(&self) -> bool { !self.model.has_errors() }

  pub fn is_form_changed(&self) -> bool { self.model.is_changed() }

  pub fn is_attribute_dirty(&self, attribute: &str) -> bool {
    self
      .inner
      .rc_deref()
      .dirty_attributes
      .contains(attribute)
      || self.model.is_attribute_changed(attribute)
  }

  pub fn is_attribute_changed(&self, attribute: &str) -> bool { self.model.is_attribute_changed(attribute) }

  pub fn validation_state(&self, attribute: &str) -> Option<ValidationState> {
    self.model.validation_state(attribute)
  }

  pub fn validation_error(&self, attribute: &str) -> Option<Message> { self.model.validation_error(attribute) }

  pub fn validation_warning(&self, attribute: &str) -> Option<Message> {
    self.model.validation_warning(attribute)
  }

  pub fn validation_message(&self, attribute: &str) -> Option<Message> {
    self.model.validation_message(attribute)
  }
}
