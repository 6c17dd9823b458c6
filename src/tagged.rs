//! Tagged node references.
//!
//! Every `next` field in the list is a single machine word holding a node
//! address together with one bit of out-of-band state: the *mark*. A set
//! mark means the owning node is logically deleted. Packing both into one
//! word lets a single compare-and-swap observe and update the pair
//! indivisibly, which is what the whole deletion protocol hangs on.
//!
//! The mark lives in bit 0 of the address. Node allocations are at least
//! word aligned, so that bit is never meaningful in a real address; this is
//! asserted at compile time in [`Node::alloc`](crate::node::Node::alloc).

use core::fmt::Debug;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::node::Node;
use crate::sync::atomic::AtomicUsize;
use crate::sync::atomic::Ordering;

/// The mark bit, stolen from the low bit of the node address.
const MARK: usize = 0b1;

// -----------------------------------------------------------------------------
// Tagged Reference
// -----------------------------------------------------------------------------

/// A word-sized (node address, mark) pair.
pub(crate) struct Tagged<K> {
  bits: usize,
  marker: PhantomData<*mut Node<K>>,
}

impl<K> Tagged<K> {
  #[inline]
  const fn from_bits(bits: usize) -> Self {
    Self {
      bits,
      marker: PhantomData,
    }
  }

  /// Creates an unmarked reference to `node`.
  #[inline]
  pub(crate) fn new(node: NonNull<Node<K>>) -> Self {
    let bits: usize = node.as_ptr() as usize;

    debug_assert!(bits & MARK == 0, "misaligned node allocation");

    Self::from_bits(bits)
  }

  /// Returns `true` if the mark bit is set.
  ///
  /// In a word loaded from `node.next`, the mark denotes that *`node`* is
  /// logically deleted, not its successor.
  #[inline]
  pub(crate) const fn is_marked(self) -> bool {
    self.bits & MARK != 0
  }

  /// Returns the same reference with the mark bit set.
  #[inline]
  pub(crate) const fn marked(self) -> Self {
    Self::from_bits(self.bits | MARK)
  }

  /// Returns the same reference with the mark bit cleared.
  #[inline]
  pub(crate) const fn unmarked(self) -> Self {
    Self::from_bits(self.bits & !MARK)
  }

  /// Returns the node address with the mark bit stripped.
  #[inline]
  pub(crate) fn as_ptr(self) -> *mut Node<K> {
    (self.bits & !MARK) as *mut Node<K>
  }

  /// Dereferences the (unmarked) node address.
  ///
  /// # Safety
  ///
  /// The reference must have been created from a published or owned node,
  /// and the node must stay allocated for `'a`. Within this crate that
  /// holds for any node observed through a live list borrow: the list frees
  /// nodes only on drop and leaks whatever it unlinks before that.
  #[inline]
  pub(crate) unsafe fn as_ref<'a>(self) -> &'a Node<K> {
    debug_assert!(!self.as_ptr().is_null(), "null tagged reference");

    // SAFETY: Guaranteed by the caller contract above.
    unsafe { &*self.as_ptr() }
  }
}

#[expect(
  clippy::expl_impl_clone_on_copy,
  reason = "a derive would require `K: Clone`"
)]
impl<K> Clone for Tagged<K> {
  #[inline]
  fn clone(&self) -> Self {
    *self
  }
}

impl<K> Copy for Tagged<K> {}

impl<K> PartialEq for Tagged<K> {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.bits == other.bits
  }
}

impl<K> Eq for Tagged<K> {}

impl<K> Debug for Tagged<K> {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("Tagged")
      .field("ptr", &self.as_ptr())
      .field("marked", &self.is_marked())
      .finish()
  }
}

// -----------------------------------------------------------------------------
// Atomic Cell
// -----------------------------------------------------------------------------

/// An atomic cell holding a [`Tagged`] reference.
///
/// All loads and compare-and-swaps operate on the full (address, mark) word
/// at once; there is no way to update the address and the mark separately.
#[repr(transparent)]
pub(crate) struct AtomicTagged<K> {
  bits: AtomicUsize,
  marker: PhantomData<*mut Node<K>>,
}

impl<K> AtomicTagged<K> {
  /// Creates a cell holding the null reference.
  #[inline]
  pub(crate) fn null() -> Self {
    Self {
      bits: AtomicUsize::new(0),
      marker: PhantomData,
    }
  }

  /// Loads the current (address, mark) word.
  #[inline]
  pub(crate) fn load(&self, order: Ordering) -> Tagged<K> {
    Tagged::from_bits(self.bits.load(order))
  }

  /// Stores a word unconditionally.
  ///
  /// Used only before a node is published; afterwards every update goes
  /// through [`compare_exchange`](Self::compare_exchange).
  #[inline]
  pub(crate) fn store(&self, value: Tagged<K>, order: Ordering) {
    self.bits.store(value.bits, order);
  }

  /// Compares-and-swaps the full word.
  #[inline]
  pub(crate) fn compare_exchange(
    &self,
    current: Tagged<K>,
    new: Tagged<K>,
    success: Ordering,
    failure: Ordering,
  ) -> Result<Tagged<K>, Tagged<K>> {
    self
      .bits
      .compare_exchange(current.bits, new.bits, success, failure)
      .map(Tagged::from_bits)
      .map_err(Tagged::from_bits)
  }
}
