//! Public interface.

use core::fmt::Debug;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use core::panic::RefUnwindSafe;
use core::panic::UnwindSafe;

use crate::list::Iter;
use crate::list::List;

/// A lock-free sorted set of keys.
///
/// All operations are safe to call concurrently from any number of threads
/// through a shared reference, and none of them ever blocks: a stalled or
/// preempted thread cannot prevent any other thread from completing its own
/// operation.
///
/// # Examples
///
/// ```
/// use oset::OSet;
///
/// let set: OSet<u64> = OSet::new();
///
/// assert!(set.insert(3));
/// assert!(set.insert(1));
/// assert!(!set.insert(3));
///
/// assert!(set.contains(&1));
/// assert!(set.remove(&1));
/// assert!(!set.contains(&1));
///
/// assert_eq!(set.len(), 1);
/// ```
///
/// # Consistency
///
/// Every operation takes effect at a single atomic instruction, so any
/// interleaving of concurrent calls is equivalent to some sequential order.
/// For insertion that instruction is the compare-and-swap publishing the
/// node; for removal it is the compare-and-swap setting the deletion mark,
/// which happens *before* the node physically leaves the chain.
///
/// # Memory
///
/// Removed keys are not freed until the set itself is dropped. This trades
/// memory for a reclamation-free design: traversals never need to guard the
/// nodes they walk over, and a node address can never be recycled under a
/// pending compare-and-swap. Workloads that remove unboundedly many keys
/// from a long-lived set will grow without bound.
pub struct OSet<K> {
  list: List<K>,
}

impl<K> OSet<K> {
  /// Creates an empty set.
  pub fn new() -> Self {
    Self { list: List::new() }
  }

  /// Returns the number of keys in the set.
  ///
  /// Under concurrent updates the value is a snapshot that may be stale by
  /// the time it is read.
  #[inline]
  pub fn len(&self) -> usize {
    self.list.len()
  }

  /// Returns `true` if the set contains no keys.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.list.is_empty()
  }

  /// Returns `true` if the set contains `key`.
  ///
  /// # Examples
  ///
  /// ```
  /// use oset::OSet;
  ///
  /// let set: OSet<u64> = OSet::new();
  ///
  /// set.insert(7);
  ///
  /// assert!(set.contains(&7));
  /// assert!(!set.contains(&8));
  /// ```
  #[inline]
  pub fn contains(&self, key: &K) -> bool
  where
    K: Ord,
  {
    self.list.contains(key)
  }

  /// Adds `key` to the set.
  ///
  /// Returns `true` if the key was inserted, or `false` if it was already
  /// present. When several threads insert the same key concurrently,
  /// exactly one of them observes `true`.
  ///
  /// # Examples
  ///
  /// ```
  /// use oset::OSet;
  ///
  /// let set: OSet<u64> = OSet::new();
  ///
  /// assert!(set.insert(7));
  /// assert!(!set.insert(7));
  /// ```
  #[inline]
  pub fn insert(&self, key: K) -> bool
  where
    K: Ord,
  {
    self.list.insert(key)
  }

  /// Removes `key` from the set.
  ///
  /// Returns `true` if the key was removed, or `false` if it was not
  /// present. When several threads remove the same key concurrently,
  /// exactly one of them observes `true`.
  ///
  /// # Examples
  ///
  /// ```
  /// use oset::OSet;
  ///
  /// let set: OSet<u64> = OSet::new();
  ///
  /// set.insert(7);
  ///
  /// assert!(set.remove(&7));
  /// assert!(!set.remove(&7));
  /// ```
  #[inline]
  pub fn remove(&self, key: &K) -> bool
  where
    K: Ord,
  {
    self.list.remove(key)
  }

  /// Returns an iterator over the keys in sorted order.
  ///
  /// The iterator is weakly consistent: keys untouched for its whole
  /// lifetime are yielded exactly once, while concurrent insertions and
  /// removals may or may not be observed.
  ///
  /// # Examples
  ///
  /// ```
  /// use oset::OSet;
  ///
  /// let set: OSet<u64> = OSet::new();
  ///
  /// for key in [3, 1, 2] {
  ///   set.insert(key);
  /// }
  ///
  /// let keys: Vec<u64> = set.iter().copied().collect();
  ///
  /// assert_eq!(keys, [1, 2, 3]);
  /// ```
  #[inline]
  pub fn iter(&self) -> Iter<'_, K> {
    self.list.iter()
  }

  #[inline]
  pub(crate) fn raw(&self) -> &List<K> {
    &self.list
  }
}

impl<K> Default for OSet<K> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl<K: Debug> Debug for OSet<K> {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_set().entries(self.iter()).finish()
  }
}

impl<K: Ord> FromIterator<K> for OSet<K> {
  fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
    let set: Self = Self::new();

    for key in iter {
      set.insert(key);
    }

    set
  }
}

impl<'a, K> IntoIterator for &'a OSet<K> {
  type Item = &'a K;
  type IntoIter = Iter<'a, K>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<K: UnwindSafe> UnwindSafe for OSet<K> {}
impl<K: RefUnwindSafe> RefUnwindSafe for OSet<K> {}
