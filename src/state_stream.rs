//! A filtered, multiplexed view of a form and its model.
//!
//! [`FilteredChangeStream`] merges form property mutations and model events
//! into one observable of [`StateChange`]. Upstreams are attached lazily: a
//! stream only listens to the form after a `watch_form` call and to the
//! model after one of the model `watch_*` calls.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxform::prelude::*;
//! use serde_json::json;
//!
//! let form = Form::new(Record::new(json!({})).unwrap());
//! let seen = Rc::new(RefCell::new(vec![]));
//! let c_seen = seen.clone();
//!
//! form
//!   .state_stream()
//!   .watch_form(["loading"])
//!   .subscribe(move |change| c_seen.borrow_mut().push(change));
//!
//! form.set("loading", json!(true));
//! form.set("unrelated", json!(1));
//! assert_eq!(seen.borrow().len(), 1);
//! ```

use std::convert::Infallible;

use indexmap::IndexSet;

use crate::{
  form::{Attributes, Form, FormChange},
  model::{Model, ModelEvent, StateKinds},
  observable::Observable,
  observer::{BoxedObserver, Observer},
  rc::{MutRc, RcDeref, RcDerefMut},
  subject::{Subject, SubjectSubscription},
  subscription::{BoxedSubscription, Subscription},
};

/// One notification from a [`FilteredChangeStream`].
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
  /// Sent once to a new subscriber when `emit_on_subscribe` is on.
  Subscribed,
  Form(FormChange),
  Model(ModelEvent),
}

#[derive(Default)]
struct StreamState {
  watch_list: IndexSet<String>,
  form_subscription: Option<BoxedSubscription>,
  model_subscription: Option<BoxedSubscription>,
  model_mutations: bool,
  validation_kinds: StateKinds,
  emit_on_subscribe: bool,
  disposed: bool,
}

impl StreamState {
  fn watches(&self, mut affected: impl FnMut(&str) -> bool) -> bool {
    self.watch_list.is_empty() || self.watch_list.iter().any(|key| affected(key))
  }

  fn passes_form(&self, change: &FormChange) -> bool { self.watches(|key| change.contains_key(key)) }

  fn passes_model(&self, event: &ModelEvent) -> bool {
    let enabled = match event {
      ModelEvent::Changed { .. } => self.model_mutations,
      ModelEvent::Validated { state, .. } => self.validation_kinds.contains(state.kind()),
    };
    enabled && self.watches(|key| event.affects(key))
  }
}

/// A per-caller change stream over a [`Form`] and its model.
///
/// Obtained from [`Form::state_stream`]. Clones share one stream, so the
/// builder-style `watch_*` methods can be chained and the result kept for
/// a later `unsubscribe`.
///
/// The watch-list only ever grows. While it is empty every event of an
/// attached upstream passes. Model events also need their kind enabled:
/// mutations by [`watch_model`](Self::watch_model), validation transitions
/// by `watch_validation` or one of its narrowed variants.
pub struct FilteredChangeStream<M: Model> {
  form: Form<M>,
  subject: Subject<StateChange, Infallible>,
  state: MutRc<StreamState>,
}

impl<M: Model> Clone for FilteredChangeStream<M> {
  fn clone(&self) -> Self {
    Self { form: self.form.clone(), subject: self.subject.clone(), state: self.state.clone() }
  }
}

impl<M: Model> FilteredChangeStream<M> {
  pub fn new(form: Form<M>) -> Self {
    Self { form, subject: Subject::new(), state: MutRc::own(StreamState::default()) }
  }

  /// Deliver [`StateChange::Subscribed`] to each new subscriber.
  pub fn emit_on_subscribe(self) -> Self {
    self.state.rc_deref_mut().emit_on_subscribe = true;
    self
  }

  /// Forward form mutations touching `properties`.
  pub fn watch_form(self, properties: impl Into<Attributes>) -> Self {
    if self.extend_watch_list(properties.into()) {
      self.attach_form();
    }
    self
  }

  /// Forward model attribute writes touching `attributes`.
  pub fn watch_model(self, attributes: impl Into<Attributes>) -> Self {
    if self.extend_watch_list(attributes.into()) {
      self.state.rc_deref_mut().model_mutations = true;
      self.attach_model();
    }
    self
  }

  /// Forward every validation transition of `attributes`.
  pub fn watch_validation(self, attributes: impl Into<Attributes>) -> Self {
    self.watch_kinds(attributes, StateKinds::ALL)
  }

  /// Forward transitions of `attributes` into success or warning.
  pub fn watch_valid(self, attributes: impl Into<Attributes>) -> Self {
    self.watch_kinds(attributes, StateKinds::VALID)
  }

  pub fn watch_success(self, attributes: impl Into<Attributes>) -> Self {
    self.watch_kinds(attributes, StateKinds::SUCCESS)
  }

  pub fn watch_warning(self, attributes: impl Into<Attributes>) -> Self {
    self.watch_kinds(attributes, StateKinds::WARNING)
  }

  pub fn watch_pending(self, attributes: impl Into<Attributes>) -> Self {
    self.watch_kinds(attributes, StateKinds::PENDING)
  }

  pub fn watch_error(self, attributes: impl Into<Attributes>) -> Self {
    self.watch_kinds(attributes, StateKinds::ERROR)
  }

  /// The keys this stream filters on, in insertion order.
  pub fn watch_list(&self) -> Vec<String> { self.state.rc_deref().watch_list.iter().cloned().collect() }

  pub fn is_disposed(&self) -> bool { self.state.rc_deref().disposed }

  fn watch_kinds(self, attributes: impl Into<Attributes>, kinds: StateKinds) -> Self {
    if self.extend_watch_list(attributes.into()) {
      self.state.rc_deref_mut().validation_kinds |= kinds;
      self.attach_model();
    }
    self
  }

  /// Returns false when the stream is already disposed.
  fn extend_watch_list(&self, keys: Attributes) -> bool {
    let mut state = self.state.rc_deref_mut();
    if state.disposed {
      tracing::warn!("watch request on a disposed change stream, ignoring");
      return false;
    }
    state.watch_list.extend(keys.into_vec());
    true
  }

  fn attach_form(&self) {
    if self.state.rc_deref().form_subscription.is_some() {
      return;
    }
    let state = self.state.clone();
    let subject = self.subject.clone();
    let subscription = self
      .form
      .observable()
      .subscribe(move |change: FormChange| {
        let passes = state.rc_deref().passes_form(&change);
        if passes {
          subject.clone().next(StateChange::Form(change));
        } else {
          tracing::trace!(keys = ?change.keys().collect::<Vec<_>>(), "form change filtered out");
        }
      });
    self.state.rc_deref_mut().form_subscription = Some(BoxedSubscription::new(subscription));
    tracing::debug!("change stream attached to form");
  }

  fn attach_model(&self) {
    if self.state.rc_deref().model_subscription.is_some() {
      return;
    }
    let state = self.state.clone();
    let subject = self.subject.clone();
    let subscription = self
      .form
      .model()
      .observable()
      .subscribe(move |event: ModelEvent| {
        let passes = state.rc_deref().passes_model(&event);
        if passes {
          subject.clone().next(StateChange::Model(event));
        } else {
          tracing::trace!(attribute = event.attribute(), "model event filtered out");
        }
      });
    self.state.rc_deref_mut().model_subscription = Some(BoxedSubscription::new(subscription));
    tracing::debug!("change stream attached to model");
  }

  /// Detach from the upstreams and complete every subscriber. Terminal.
  fn dispose(&self) {
    let (form, model) = {
      let mut state = self.state.rc_deref_mut();
      if state.disposed {
        return;
      }
      state.disposed = true;
      (state.form_subscription.take(), state.model_subscription.take())
    };
    form.unsubscribe();
    model.unsubscribe();
    self.subject.clone().complete();
    tracing::debug!("change stream disposed");
  }
}

impl<M: Model> Observable for FilteredChangeStream<M> {
  type Item = StateChange;
  type Err = Infallible;
  type Unsub = SubjectSubscription<BoxedObserver<StateChange, Infallible>>;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<StateChange, Infallible> + 'static,
  {
    let greet = {
      let state = self.state.rc_deref();
      state.emit_on_subscribe && !state.disposed
    };
    if greet {
      observer.next(StateChange::Subscribed);
    }
    self.subject.actual_subscribe(observer)
  }
}

impl<M: Model> Subscription for FilteredChangeStream<M> {
  fn unsubscribe(self) { self.dispose() }

  fn is_closed(&self) -> bool { self.is_disposed() }
}
