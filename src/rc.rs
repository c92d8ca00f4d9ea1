//! Shared mutable handles.
//!
//! Everything in this crate lives on one thread, so shared state is an
//! `Rc<RefCell<T>>`. `MutRc` wraps that pair and the `RcDeref`/`RcDerefMut`
//! traits give uniform borrow access, including a non-panicking
//! `try_rc_deref_mut` used to detect re-entrant access during emission.

use std::{
  cell::{Ref, RefCell, RefMut},
  rc::Rc,
};

pub trait RcDeref {
  type Target<'a>
  where
    Self: 'a;
  #[allow(clippy::needless_lifetimes)]
  fn rc_deref<'a>(&'a self) -> Self::Target<'a>;
}

pub trait RcDerefMut {
  type Target<'a>
  where
    Self: 'a;
  #[allow(clippy::needless_lifetimes)]
  fn rc_deref_mut<'a>(&'a self) -> Self::Target<'a>;

  /// Like `rc_deref_mut`, but returns `None` instead of panicking when the
  /// value is already borrowed.
  #[allow(clippy::needless_lifetimes)]
  fn try_rc_deref_mut<'a>(&'a self) -> Option<Self::Target<'a>>;
}

#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }
}

impl<T> From<T> for MutRc<T> {
  #[inline]
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T> RcDeref for MutRc<T> {
  type Target<'a>
    = Ref<'a, T>
  where
    Self: 'a;

  #[inline]
  #[allow(clippy::needless_lifetimes)]
  fn rc_deref<'a>(&'a self) -> Self::Target<'a> { self.0.borrow() }
}

impl<T> RcDerefMut for MutRc<T> {
  type Target<'a>
    = RefMut<'a, T>
  where
    Self: 'a;

  #[inline]
  #[allow(clippy::needless_lifetimes)]
  fn rc_deref_mut<'a>(&'a self) -> Self::Target<'a> { self.0.borrow_mut() }

  #[inline]
  #[allow(clippy::needless_lifetimes)]
  fn try_rc_deref_mut<'a>(&'a self) -> Option<Self::Target<'a>> { self.0.try_borrow_mut().ok() }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}
