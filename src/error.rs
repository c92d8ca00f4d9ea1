use std::time::Duration;

/// Why a validation batch did not produce a boolean outcome.
///
/// A validator that merely finds the value invalid is not an error: it
/// resolves with a message and the batch resolves to `Ok(false)`. These
/// variants are for validators whose own work failed.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
  #[error("validation of `{attribute}` was rejected: {reason}")]
  Rejected { attribute: String, reason: String },

  #[error("validation of `{attribute}` did not settle within {after:?}")]
  TimedOut { attribute: String, after: Duration },
}

impl ValidationError {
  pub fn rejected(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::Rejected { attribute: attribute.into(), reason: reason.into() }
  }

  /// The attribute whose validator failed.
  pub fn attribute(&self) -> &str {
    match self {
      Self::Rejected { attribute, .. } | Self::TimedOut { attribute, .. } => attribute,
    }
  }
}

/// Errors raised while building a model.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
  #[error("model attributes must be a JSON object, got {0}")]
  NotAnObject(&'static str),
}
