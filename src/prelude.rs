//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Errors
pub use crate::error::{ModelError, ValidationError};
// Form
pub use crate::form::{Attributes, Form, FormChange, SCENARIO_DEFAULT};
// Model
pub use crate::model::{
  Message, Model, ModelEvent, Record, RecordBuilder, Severity, StateKinds, Validation, ValidationState,
};
// Reactive core
pub use crate::observable::Observable;
pub use crate::observer::Observer;
// Rules
pub use crate::rule::{Rule, Rules};
// Change streams
pub use crate::state_stream::{FilteredChangeStream, StateChange};
// Subject
pub use crate::subject::*;
// Subscription
pub use crate::subscription::*;
// Validators
pub use crate::validator::{
  same_validator, CustomValidator, Fingerprint, LengthValidator, MultiValidator, PresenceValidator,
  TimeoutValidator, UrlValidator, Validator, Verdict,
};
