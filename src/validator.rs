//! Attribute validators.
//!
//! A [`Validator`] inspects one attribute value and resolves to `Ok(None)`
//! when it passes, `Ok(Some(message))` when it does not, or `Err(..)` when the
//! validator itself could not do its work. Validators are shared as
//! `Rc<dyn Validator>` so one instance can be bound to several attributes.

mod custom;
mod length;
mod multi;
mod presence;
mod timeout;
mod url;

use std::{
  cell::Cell,
  collections::hash_map::DefaultHasher,
  hash::{Hash, Hasher},
};

pub use custom::CustomValidator;
use futures::future::LocalBoxFuture;
pub use length::LengthValidator;
pub use multi::MultiValidator;
pub use presence::PresenceValidator;
use serde_json::Value;
pub use timeout::TimeoutValidator;
pub use url::UrlValidator;

use crate::{error::ValidationError, model::Message};

/// The pending outcome of a single validator run.
pub type Verdict = LocalBoxFuture<'static, Result<Option<Message>, ValidationError>>;

pub trait Validator {
  /// Check `value`, the current value of `attribute`. `attributes` is a
  /// snapshot of the whole model for cross-field rules.
  fn validate(&self, value: &Value, attribute: &str, attributes: &Value) -> Verdict;

  /// Identity of this validator's configuration.
  fn fingerprint(&self) -> &Fingerprint;

  /// Enable or disable identity caching, see [`Fingerprint::cache`].
  fn cache(&self, enabled: bool) { self.fingerprint().cache(enabled) }
}

/// Are `a` and `b` interchangeable?
///
/// The same instance always is. Distinct instances are when their
/// fingerprints match.
pub fn same_validator(a: &dyn Validator, b: &dyn Validator) -> bool {
  std::ptr::addr_eq(a, b) || a.fingerprint().matches(b.fingerprint())
}

/// A validator's kind plus its declared parameters, with a memoized digest.
///
/// Two fingerprints match when their kinds are equal, both have caching
/// enabled, and their parameters are deeply equal. With caching disabled a
/// fingerprint matches nothing, so a validator carrying opaque state (a
/// closure, say) is never mistaken for another.
#[derive(Debug, Clone)]
pub struct Fingerprint {
  kind: &'static str,
  params: Value,
  cached: Cell<bool>,
  digest: Cell<Option<u64>>,
}

impl Fingerprint {
  pub fn new(kind: &'static str, params: Value) -> Self {
    Self { kind, params, cached: Cell::new(true), digest: Cell::new(None) }
  }

  pub fn kind(&self) -> &'static str { self.kind }

  pub fn params(&self) -> &Value { &self.params }

  /// Replace the declared parameters. Drops the memoized digest.
  pub fn set_params(&mut self, params: Value) {
    self.params = params;
    self.digest.set(None);
  }

  /// Toggle caching. Always drops the memoized digest.
  pub fn cache(&self, enabled: bool) {
    self.digest.set(None);
    self.cached.set(enabled);
  }

  pub fn is_cached(&self) -> bool { self.cached.get() }

  pub fn digest(&self) -> u64 {
    if let Some(digest) = self.digest.get() {
      return digest;
    }
    let mut hasher = DefaultHasher::new();
    self.kind.hash(&mut hasher);
    self.params.to_string().hash(&mut hasher);
    let digest = hasher.finish();
    self.digest.set(Some(digest));
    digest
  }

  pub fn matches(&self, other: &Fingerprint) -> bool {
    self.kind == other.kind
      && self.is_cached()
      && other.is_cached()
      && self.digest() == other.digest()
      && self.params == other.params
  }
}
