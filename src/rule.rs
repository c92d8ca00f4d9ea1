//! Declarative binding of validators to attributes.
//!
//! A [`Rule`] is resolved against the active scenario into at most one
//! validator per attribute. Resolution happens once per scenario and the
//! result is cached by the model.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::validator::{MultiValidator, Validator};

/// Attribute name to rule, in declaration order.
pub type Rules = IndexMap<String, Rule>;

/// The resolved form of [`Rules`] for one scenario.
pub type ResolvedRules = IndexMap<String, Rc<dyn Validator>>;

#[derive(Clone)]
pub enum Rule {
  Single(Rc<dyn Validator>),
  /// Picks a rule from the scenario name. `None` leaves the attribute
  /// unvalidated in that scenario.
  Computed(Rc<dyn Fn(&str) -> Option<Rule>>),
  /// Every rule that survives resolution runs, first message wins.
  Chain(Vec<Rule>),
  /// Only active in the listed scenarios.
  Scoped { scenarios: Vec<String>, rule: Box<Rule> },
}

impl Rule {
  pub fn computed(pick: impl Fn(&str) -> Option<Rule> + 'static) -> Self { Self::Computed(Rc::new(pick)) }

  pub fn chain(rules: impl IntoIterator<Item = Rule>) -> Self { Self::Chain(rules.into_iter().collect()) }

  /// Restrict this rule to `scenarios`.
  pub fn on<I, S>(self, scenarios: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self::Scoped { scenarios: scenarios.into_iter().map(Into::into).collect(), rule: Box::new(self) }
  }

  pub fn resolve(&self, scenario: &str) -> Option<Rc<dyn Validator>> {
    match self {
      Self::Single(validator) => Some(validator.clone()),
      Self::Computed(pick) => pick(scenario)?.resolve(scenario),
      Self::Scoped { scenarios, rule } => {
        if scenarios.iter().any(|s| s == scenario) {
          rule.resolve(scenario)
        } else {
          None
        }
      }
      Self::Chain(rules) => {
        let mut validators = rules
          .iter()
          .filter_map(|rule| rule.resolve(scenario))
          .collect::<Vec<_>>();
        match validators.len() {
          0 => None,
          1 => validators.pop(),
          _ => {
            let multi: Rc<dyn Validator> = Rc::new(MultiValidator::new(validators));
            Some(multi)
          }
        }
      }
    }
  }
}

impl<V: Validator + 'static> From<V> for Rule {
  fn from(validator: V) -> Self { Self::Single(Rc::new(validator)) }
}

impl From<Rc<dyn Validator>> for Rule {
  fn from(validator: Rc<dyn Validator>) -> Self { Self::Single(validator) }
}

impl From<Vec<Rule>> for Rule {
  fn from(rules: Vec<Rule>) -> Self { Self::Chain(rules) }
}

/// Resolve every rule for `scenario`, dropping attributes left without a
/// validator.
pub fn resolve_all(rules: &Rules, scenario: &str) -> ResolvedRules {
  rules
    .iter()
    .filter_map(|(attribute, rule)| Some((attribute.clone(), rule.resolve(scenario)?)))
    .collect()
}
