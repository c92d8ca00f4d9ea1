use smallvec::SmallVec;

/// A container of items keyed by a monotonically increasing ID.
///
/// Subjects keep their observers here: `add` hands back the ID that the
/// subscription later uses to remove exactly its own observer, and iteration
/// follows insertion order so observers are notified in subscription order.
///
/// ```rust
/// use rxform::subscription::DynamicSubscriptions;
///
/// let mut subs: DynamicSubscriptions<&str> = DynamicSubscriptions::default();
/// let first = subs.add("first");
/// let second = subs.add("second");
/// assert_eq!(subs.remove(first), Some("first"));
/// assert!(subs.contains(second));
/// assert_eq!(subs.len(), 1);
/// ```
pub struct DynamicSubscriptions<U> {
  next_id: usize,
  items: SmallVec<[(usize, U); 2]>,
}

impl<U> Default for DynamicSubscriptions<U> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<U> DynamicSubscriptions<U> {
  /// Add an item and return its unique ID.
  #[inline]
  pub fn add(&mut self, item: U) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.items.push((id, item));
    id
  }

  /// Remove an item by ID.
  pub fn remove(&mut self, id: usize) -> Option<U> {
    self
      .items
      .iter()
      .position(|(i, _)| *i == id)
      .map(|pos| self.items.remove(pos).1)
  }

  #[inline]
  pub fn contains(&self, id: usize) -> bool { self.items.iter().any(|(i, _)| *i == id) }

  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Drain all items.
  #[inline]
  pub fn drain(&mut self) -> impl Iterator<Item = U> + '_ {
    self.items.drain(..).map(|(_, item)| item)
  }

  #[inline]
  pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut U> {
    self.items.iter_mut().map(|(_, item)| item)
  }
}
