use indexmap::IndexMap;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
  Error,
  Warning,
}

/// A validator's verdict text.
///
/// `template` may contain `{name}` placeholders that `render` fills from
/// `bindings`. String bindings are inserted verbatim, anything else as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
  pub template: String,
  pub bindings: IndexMap<String, Value>,
  pub severity: Severity,
}

impl Message {
  pub fn error(template: impl Into<String>) -> Self {
    Self { template: template.into(), bindings: IndexMap::new(), severity: Severity::Error }
  }

  pub fn warning(template: impl Into<String>) -> Self {
    Self { template: template.into(), bindings: IndexMap::new(), severity: Severity::Warning }
  }

  pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.bindings.insert(name.into(), value.into());
    self
  }

  pub fn render(&self) -> String {
    self
      .bindings
      .iter()
      .fold(self.template.clone(), |text, (name, value)| {
        let value = match value {
          Value::String(s) => s.clone(),
          other => other.to_string(),
        };
        text.replace(&format!("{{{name}}}"), &value)
      })
  }
}

impl std::fmt::Display for Message {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.render()) }
}

/// Outcome of validating one attribute. "Not yet validated" is the absence
/// of a state.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationState {
  Pending,
  Success,
  Warning(Message),
  Error(Message),
}

impl ValidationState {
  /// Success and warnings both let the form pass.
  pub fn is_passing(&self) -> bool { matches!(self, Self::Success | Self::Warning(_)) }

  pub fn kind(&self) -> StateKinds {
    match self {
      Self::Pending => StateKinds::PENDING,
      Self::Success => StateKinds::SUCCESS,
      Self::Warning(_) => StateKinds::WARNING,
      Self::Error(_) => StateKinds::ERROR,
    }
  }

  pub fn message(&self) -> Option<&Message> {
    match self {
      Self::Warning(message) | Self::Error(message) => Some(message),
      Self::Pending | Self::Success => None,
    }
  }
}

impl From<Message> for ValidationState {
  fn from(message: Message) -> Self {
    match message.severity {
      Severity::Error => Self::Error(message),
      Severity::Warning => Self::Warning(message),
    }
  }
}

/// A set of validation state kinds, used by change streams to pick which
/// transitions to forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateKinds(u8);

impl StateKinds {
  pub const NONE: Self = Self(0);
  pub const PENDING: Self = Self(1);
  pub const SUCCESS: Self = Self(1 << 1);
  pub const WARNING: Self = Self(1 << 2);
  pub const ERROR: Self = Self(1 << 3);
  pub const VALID: Self = Self(Self::SUCCESS.0 | Self::WARNING.0);
  pub const ALL: Self = Self(Self::PENDING.0 | Self::VALID.0 | Self::ERROR.0);

  #[inline]
  pub fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 && other.0 != 0 }

  #[inline]
  pub fn is_empty(self) -> bool { self.0 == 0 }
}

impl std::ops::BitOr for StateKinds {
  type Output = Self;
  fn bitor(self, rhs: Self) -> Self { Self(self.0 | rhs.0) }
}

impl std::ops::BitOrAssign for StateKinds {
  fn bitor_assign(&mut self, rhs: Self) { self.0 |= rhs.0; }
}
