//! # rxform: reactive form state
//!
//! Dirty-attribute tracking, async validation scheduling and filtered change
//! streams for forms bound to a data model.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxform::prelude::*;
//! use serde_json::json;
//!
//! let record = Record::builder(json!({ "name": "", "password": "" }))
//!   .rule("name", PresenceValidator::new())
//!   .rule("password", LengthValidator::new().min(6))
//!   .build()
//!   .unwrap();
//! let form = Form::new(record);
//!
//! // Only touched attributes are validated.
//! form.set_attribute("name", json!("Ada"));
//! let valid = futures::executor::block_on(form.validate_attributes(["name", "password"]));
//! assert_eq!(valid, Ok(true));
//!
//! // `validate` pulls in every attribute that has a validator.
//! let valid = futures::executor::block_on(form.validate());
//! assert_eq!(valid, Ok(false));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Form`] | Form properties, the dirty set and validation scheduling |
//! | [`Model`] | What a form needs from its data model |
//! | [`Record`] | JSON-backed model with scenario-scoped rules |
//! | [`FilteredChangeStream`] | Form and model events filtered by a watch-list |
//! | [`Validator`] | One attribute check, resolving to an optional message |
//!
//! Everything is single-threaded: handles are `Rc`-based and validation
//! futures are `LocalBoxFuture`s, runnable on any local executor.
//!
//! Logging goes through `tracing`; install a subscriber to see it.
//!
//! [`Form`]: form::Form
//! [`Model`]: model::Model
//! [`Record`]: model::Record
//! [`FilteredChangeStream`]: state_stream::FilteredChangeStream
//! [`Validator`]: validator::Validator

pub mod error;
pub mod form;
pub mod model;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod rule;
pub mod state_stream;
pub mod subject;
pub mod subscription;
pub mod validator;

pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
