//! Dot-path access into nested JSON objects: `"nested.value"` addresses
//! `{"nested": {"value": ..}}`.

use serde_json::{Map, Value};

pub fn segments(path: &str) -> impl Iterator<Item = &str> { path.split('.') }

/// Every proper prefix of `path`, longest first: `a.b.c` yields `a.b`, `a`.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
  path
    .char_indices()
    .rev()
    .filter(|(_, c)| *c == '.')
    .map(move |(i, _)| &path[..i])
}

pub fn get<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
  segments(path).try_fold(root, |node, key| node.as_object()?.get(key))
}

/// Write `value` at `path`, creating missing intermediate objects. An
/// intermediate that exists but is not an object is replaced by one.
pub fn set(root: &mut Value, path: &str, value: Value) {
  let mut keys = segments(path).peekable();
  let mut node = root;
  while let Some(key) = keys.next() {
    if !node.is_object() {
      *node = Value::Object(Map::new());
    }
    let Value::Object(map) = node else { unreachable!("normalized to an object above") };
    if keys.peek().is_none() {
      map.insert(key.to_owned(), value);
      return;
    }
    node = map
      .entry(key.to_owned())
      .or_insert_with(|| Value::Object(Map::new()));
  }
}
