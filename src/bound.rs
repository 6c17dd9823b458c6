//! Sentinel-aware keys.
//!
//! The list is delimited by two permanent sentinel nodes. [`Bound`] gives
//! those sentinels keys that compare below and above every real key without
//! reserving any value of `K` for the purpose.

use core::cmp::Ordering;

/// A node key extended with the two sentinel bounds.
///
/// The derived order is positional: `Head < Key(_) < Tail`, and two real
/// keys compare through `K`'s own order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Bound<K> {
  /// The key of the head sentinel, less than every real key.
  Head,
  /// A real key.
  Key(K),
  /// The key of the tail sentinel, greater than every real key.
  Tail,
}

impl<K> Bound<K> {
  /// Compares this bound against a real key.
  #[inline]
  pub(crate) fn cmp_key(&self, key: &K) -> Ordering
  where
    K: Ord,
  {
    match self {
      Self::Head => Ordering::Less,
      Self::Key(this) => this.cmp(key),
      Self::Tail => Ordering::Greater,
    }
  }

  /// Returns the real key, or [`None`] for a sentinel.
  #[inline]
  pub(crate) const fn as_key(&self) -> Option<&K> {
    match self {
      Self::Key(key) => Some(key),
      Self::Head | Self::Tail => None,
    }
  }
}
