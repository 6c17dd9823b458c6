//! List nodes.

use core::ptr::NonNull;

use crate::bound::Bound;
use crate::tagged::AtomicTagged;

/// A node of the list: a key and an atomically tagged successor reference.
///
/// `key` is written once, before publication, and never mutated. `next` is
/// the only field ever contended: it is written non-atomically exactly once
/// (also before publication) and by compare-and-swap from then on.
///
/// Every node takes at least a full cache line, so two neighboring
/// allocations never share one and a compare-and-swap on one node's `next`
/// does not invalidate the line a concurrent walk is reading through. The
/// per-architecture line lengths mirror
/// [`CachePadded`](crate::padded::CachePadded).
#[cfg_attr(
  any(
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "powerpc64",
  ),
  repr(align(128))
)]
#[cfg_attr(target_arch = "s390x", repr(align(256)))]
#[cfg_attr(
  not(any(
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "powerpc64",
    target_arch = "s390x",
  )),
  repr(align(64))
)]
pub(crate) struct Node<K> {
  pub(crate) next: AtomicTagged<K>,
  pub(crate) key: Bound<K>,
}

impl<K> Node<K> {
  /// Allocates an unpublished node with a null successor.
  ///
  /// The allocation is owned by the caller until it is published with a
  /// successful compare-and-swap on some `next` field; after that it is
  /// owned by the list and freed on drop, or leaked if it is unlinked
  /// first.
  pub(crate) fn alloc(key: Bound<K>) -> NonNull<Self> {
    // The mark is stored in bit 0 of node addresses.
    const { assert!(align_of::<Self>() >= 2) };

    let node: Box<Self> = Box::new(Self {
      next: AtomicTagged::null(),
      key,
    });

    // SAFETY: `Box::into_raw` never returns null.
    unsafe { NonNull::new_unchecked(Box::into_raw(node)) }
  }

  /// Frees a node allocated by [`alloc`](Self::alloc).
  ///
  /// # Safety
  ///
  /// The node must never have been published, or the caller must otherwise
  /// have exclusive access to it, and it must not be freed again.
  pub(crate) unsafe fn dealloc(node: NonNull<Self>) {
    // SAFETY: The pointer came from `Box::into_raw` in `alloc` and the
    // caller guarantees exclusive access.
    drop(unsafe { Box::from_raw(node.as_ptr()) });
  }
}
