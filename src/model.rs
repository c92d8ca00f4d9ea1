//! The data model a [`Form`](crate::form::Form) is bound to.
//!
//! A form never owns the validation logic of its attributes. It talks to a
//! [`Model`], which knows how to read and write attributes, which validators
//! apply in the current scenario, and which publishes its own
//! [`ModelEvent`]s. [`Record`] is the in-crate implementation backed by a
//! JSON object.

pub mod path;
mod record;
mod state;

use std::convert::Infallible;

use futures::future::LocalBoxFuture;
pub use record::{Record, RecordBuilder};
use serde_json::Value;
pub use state::{Message, Severity, StateKinds, ValidationState};

use crate::{error::ValidationError, subject::Subject};

/// The scenario a model starts in.
pub const SCENARIO_DEFAULT: &str = "default";

/// A pending validation batch. Resolves to `Ok(true)` when every validated
/// attribute passes.
pub type Validation = LocalBoxFuture<'static, Result<bool, ValidationError>>;

/// Notifications published by a model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
  /// An attribute was written.
  Changed { attribute: String, value: Value },
  /// An attribute's validation state moved.
  Validated { attribute: String, state: ValidationState },
}

impl ModelEvent {
  pub fn attribute(&self) -> &str {
    match self {
      Self::Changed { attribute, .. } | Self::Validated { attribute, .. } => attribute,
    }
  }

  /// Does this event concern `key`? A nested attribute `a.b.c` also affects
  /// `a.b` and `a`.
  pub fn affects(&self, key: &str) -> bool {
    let attribute = self.attribute();
    attribute == key || path::ancestors(attribute).any(|ancestor| ancestor == key)
  }
}

/// Capabilities a form needs from its model.
///
/// Implementations are cheap handles: cloning one must yield another view of
/// the same model.
pub trait Model: Clone + 'static {
  /// Read an attribute by dot path.
  fn get(&self, attribute: &str) -> Option<Value>;

  /// Write an attribute by dot path, creating missing parents.
  fn set(&self, attribute: &str, value: Value);

  /// The value the attribute had when the model was built.
  fn initial_attribute(&self, attribute: &str) -> Option<Value>;

  /// Snapshot of every attribute.
  fn attributes(&self) -> Value;

  fn set_scenario(&self, scenario: &str);

  fn scenario(&self) -> String;

  fn is_scenario(&self, scenario: &str) -> bool { self.scenario() == scenario }

  /// Run the validators bound to `attributes`. Attributes without a
  /// validator are skipped.
  fn validate_attributes(&self, attributes: Vec<String>) -> Validation;

  /// Run every validator of the current scenario.
  fn validate(&self) -> Validation;

  fn has_errors(&self) -> bool;

  fn is_changed(&self) -> bool;

  fn is_attribute_changed(&self, attribute: &str) -> bool;

  /// `None` until the attribute has been validated.
  fn validation_state(&self, attribute: &str) -> Option<ValidationState>;

  fn validation_error(&self, attribute: &str) -> Option<Message> {
    match self.validation_state(attribute)? {
      ValidationState::Error(message) => Some(message),
      _ => None,
    }
  }

  fn validation_warning(&self, attribute: &str) -> Option<Message> {
    match self.validation_state(attribute)? {
      ValidationState::Warning(message) => Some(message),
      _ => None,
    }
  }

  fn validation_message(&self, attribute: &str) -> Option<Message> {
    self
      .validation_state(attribute)?
      .message()
      .cloned()
  }

  /// Attributes that have a validator in the current scenario.
  fn validated_attributes(&self) -> Vec<String>;

  /// The model's event stream.
  fn observable(&self) -> Subject<ModelEvent, Infallible>;
}
