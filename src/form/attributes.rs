/// A list of attribute (or property) names.
///
/// Anything name-like converts into it: a single `&str` or `String`, arrays,
/// slices and vectors of them, an `Option` of any of those, or `()` for
/// "nothing". Order is kept and duplicates are allowed; consumers
/// de-duplicate where it matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<String>);

impl Attributes {
  pub fn into_vec(self) -> Vec<String> { self.0 }
}

impl From<()> for Attributes {
  fn from(_: ()) -> Self { Self::default() }
}

impl From<&str> for Attributes {
  fn from(name: &str) -> Self { Self(vec![name.to_owned()]) }
}

impl From<String> for Attributes {
  fn from(name: String) -> Self { Self(vec![name]) }
}

impl From<&String> for Attributes {
  fn from(name: &String) -> Self { Self(vec![name.clone()]) }
}

impl From<Vec<String>> for Attributes {
  fn from(names: Vec<String>) -> Self { Self(names) }
}

impl From<Vec<&str>> for Attributes {
  fn from(names: Vec<&str>) -> Self { Self(names.into_iter().map(str::to_owned).collect()) }
}

impl From<&[&str]> for Attributes {
  fn from(names: &[&str]) -> Self { Self(names.iter().map(|n| (*n).to_owned()).collect()) }
}

impl From<&[String]> for Attributes {
  fn from(names: &[String]) -> Self { Self(names.to_vec()) }
}

impl<const N: usize> From<[&str; N]> for Attributes {
  fn from(names: [&str; N]) -> Self { Self(names.into_iter().map(str::to_owned).collect()) }
}

impl<const N: usize> From<[String; N]> for Attributes {
  fn from(names: [String; N]) -> Self { Self(names.into()) }
}

impl<T: Into<Attributes>> From<Option<T>> for Attributes {
  fn from(names: Option<T>) -> Self { names.map_or_else(Self::default, Into::into) }
}
