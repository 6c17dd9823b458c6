//! Core list implementation.
//!
//! A sorted singly-linked list between two permanent sentinel nodes, with
//! lock-free insertion and two-phase (mark, then unlink) deletion. All
//! cross-thread communication happens through atomic loads and single-word
//! compare-and-swaps on `next` fields; no operation ever blocks another.
//!
//! Physically unlinked nodes are never freed while the list is alive. That
//! leak is what keeps every traversal safe without hazard pointers or
//! epochs, and it is also why a stale compare-and-swap can never succeed
//! against a recycled address.

use core::cmp::Ordering::Equal;
use core::cmp::Ordering::Less;
use core::hint;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::bound::Bound;
use crate::node::Node;
use crate::padded::CachePadded;
use crate::sync::atomic::AtomicUsize;
use crate::sync::atomic::Ordering::AcqRel;
use crate::sync::atomic::Ordering::Acquire;
use crate::sync::atomic::Ordering::Relaxed;
use crate::sync::atomic::Ordering::Release;
use crate::tagged::AtomicTagged;
use crate::tagged::Tagged;

// -----------------------------------------------------------------------------
// Position
// -----------------------------------------------------------------------------

/// A consistent snapshot of the insertion/removal point for one key.
///
/// `prev` is the `next` field that pointed at `curr` when the snapshot was
/// taken, `curr` is the first node whose key is not less than the target,
/// and `next` is `curr`'s successor as observed at the same time. Both
/// `curr` and `next` are unmarked words.
pub(crate) struct Position<'a, K> {
  pub(crate) prev: &'a AtomicTagged<K>,
  pub(crate) curr: Tagged<K>,
  pub(crate) next: Tagged<K>,
  pub(crate) found: bool,
}

// -----------------------------------------------------------------------------
// List State
// -----------------------------------------------------------------------------

pub(crate) struct List<K> {
  /// Element count, maintained at the linearization points.
  count: CachePadded<AtomicUsize>,
  /// The head sentinel; traversal always starts at its `next` field.
  head: CachePadded<NonNull<Node<K>>>,
}

// SAFETY: The list owns its nodes, so sending it sends the keys.
unsafe impl<K: Send> Send for List<K> {}

// SAFETY: All shared mutation goes through the atomic `next` words; shared
// readers additionally hand out `&K` through iteration, hence `K: Sync`.
unsafe impl<K: Send + Sync> Sync for List<K> {}

impl<K> List<K> {
  pub(crate) fn new() -> Self {
    let tail: NonNull<Node<K>> = Node::alloc(Bound::Tail);
    let head: NonNull<Node<K>> = Node::alloc(Bound::Head);

    // SAFETY: `head` is unpublished; we have the only reference to it.
    unsafe { head.as_ref() }.next.store(Tagged::new(tail), Relaxed);

    Self {
      count: CachePadded::new(AtomicUsize::new(0)),
      head: CachePadded::new(head),
    }
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.count.load(Relaxed)
  }

  #[inline]
  pub(crate) fn is_empty(&self) -> bool {
    self.len() == 0
  }

  #[inline]
  fn sentinel(&self) -> &Node<K> {
    // SAFETY: The head sentinel stays allocated until drop.
    unsafe { self.head.as_ref() }
  }

  /// One traversal attempt from the head sentinel.
  ///
  /// Returns [`None`] when interference is detected: the `prev -> curr`
  /// edge read by the walk no longer holds, or the node owning `prev` has
  /// been marked. Either way nothing read so far can be trusted and the
  /// caller must start over from the head.
  ///
  /// Marked nodes encountered along the way are helped out of the chain
  /// with a single compare-and-swap each; a lost helping race is not
  /// interference, the walk simply re-reads `prev` and carries on.
  fn walk(&self, key: &K) -> Option<Position<'_, K>>
  where
    K: Ord,
  {
    let mut prev: &AtomicTagged<K> = &self.sentinel().next;
    let mut curr: Tagged<K> = prev.load(Acquire);

    loop {
      // A mark in the word we routed through means the node owning `prev`
      // is itself logically deleted.
      if curr.is_marked() {
        return None;
      }

      // SAFETY: `curr` was read from a reachable `next` field and nodes
      // stay allocated for the lifetime of the list borrow.
      let node: &Node<K> = unsafe { curr.as_ref() };
      let next: Tagged<K> = node.next.load(Acquire);

      if prev.load(Acquire) != curr {
        return None;
      }

      if next.is_marked() {
        // `curr` is logically deleted: finish the unlink on behalf of
        // whoever marked it. Losing this race means someone else repaired
        // the chain first, so keep walking from `prev` either way.
        let _ = prev.compare_exchange(curr, next.unmarked(), Release, Relaxed);
        curr = prev.load(Acquire);
        continue;
      }

      match node.key.cmp_key(key) {
        Less => {
          prev = &node.next;
          curr = next;
        }
        ordering => {
          return Some(Position {
            prev,
            curr,
            next,
            found: ordering == Equal,
          });
        }
      }
    }
  }

  /// Finds the position for `key`, restarting until a consistent snapshot
  /// is obtained.
  pub(crate) fn locate(&self, key: &K) -> Position<'_, K>
  where
    K: Ord,
  {
    loop {
      if let Some(position) = self.walk(key) {
        return position;
      }
    }
  }

  /// Finds the position for `key`, reporting interference to the caller
  /// instead of restarting.
  pub(crate) fn try_locate(&self, key: &K) -> Option<Position<'_, K>>
  where
    K: Ord,
  {
    self.walk(key)
  }

  #[inline]
  pub(crate) fn contains(&self, key: &K) -> bool
  where
    K: Ord,
  {
    self.locate(key).found
  }

  pub(crate) fn insert(&self, key: K) -> bool
  where
    K: Ord,
  {
    let node: NonNull<Node<K>> = Node::alloc(Bound::Key(key));

    // SAFETY: `node` is unpublished; we hold the only reference to it.
    let node_ref: &Node<K> = unsafe { node.as_ref() };

    let Some(key) = node_ref.key.as_key() else {
      // SAFETY: `node` was allocated above with a real key.
      unsafe { hint::unreachable_unchecked() }
    };

    loop {
      let position: Position<'_, K> = self.locate(key);

      if position.found {
        // Lost to an insert of the same key. The node was never
        // published, so it can simply be freed.
        // SAFETY: Still unpublished, still exclusively ours.
        unsafe { Node::dealloc(node) };
        return false;
      }

      // Link the node ahead of its successor before publication; the
      // winning compare-and-swap below is what makes it visible, fully
      // initialized, to every other thread.
      node_ref.next.store(position.curr, Relaxed);

      if position
        .prev
        .compare_exchange(position.curr, Tagged::new(node), Release, Relaxed)
        .is_ok()
      {
        self.count.fetch_add(1, Relaxed);
        return true;
      }
    }
  }

  /// Phase 1 of deletion: sets the mark on `position.curr`.
  ///
  /// This is the single step at which the element stops being a member of
  /// the set. Returns `false` without side effect when the position has
  /// gone stale: the `prev -> curr` edge no longer holds (in particular,
  /// when the predecessor has itself been marked), or `curr.next` changed
  /// since the position was taken. The caller must then re-locate.
  pub(crate) fn mark(&self, position: &Position<'_, K>) -> bool {
    debug_assert!(position.found, "marking an absent key");

    if position.prev.load(Acquire) != position.curr {
      return false;
    }

    // SAFETY: `position.curr` is a published node; nodes stay allocated
    // for the lifetime of the list borrow.
    let node: &Node<K> = unsafe { position.curr.as_ref() };

    if node
      .next
      .compare_exchange(position.next, position.next.marked(), AcqRel, Relaxed)
      .is_err()
    {
      return false;
    }

    self.count.fetch_sub(1, Relaxed);

    true
  }

  /// Phase 2 of deletion: swings `position.prev` past the marked node.
  ///
  /// Failure is not an error; the logical deletion already took effect in
  /// [`mark`](Self::mark) and any later walk that trips over the marked
  /// node will finish the unlink instead.
  pub(crate) fn unlink(&self, position: &Position<'_, K>) -> bool {
    position
      .prev
      .compare_exchange(position.curr, position.next, Release, Relaxed)
      .is_ok()
  }

  pub(crate) fn remove(&self, key: &K) -> bool
  where
    K: Ord,
  {
    loop {
      let position: Position<'_, K> = self.locate(key);

      if !position.found {
        return false;
      }

      if !self.mark(&position) {
        // Contention on the node or its predecessor; take a fresh
        // snapshot and try again.
        continue;
      }

      self.unlink(&position);

      return true;
    }
  }

  pub(crate) fn iter(&self) -> Iter<'_, K> {
    Iter {
      curr: self.sentinel().next.load(Acquire),
      marker: PhantomData,
    }
  }
}

impl<K> Drop for List<K> {
  fn drop(&mut self) {
    // Exclusive access: free the sentinels and every node still reachable
    // between them, marked or not. Nodes unlinked before this point have
    // already been leaked.
    let mut curr: *mut Node<K> = self.head.as_ptr();

    while !curr.is_null() {
      // SAFETY: Every reachable node was allocated by `Node::alloc` and
      // is freed exactly once by this walk.
      let node: Box<Node<K>> = unsafe { Box::from_raw(curr) };

      curr = node.next.load(Relaxed).as_ptr();
    }
  }
}

// -----------------------------------------------------------------------------
// Iterator
// -----------------------------------------------------------------------------

/// A weakly-consistent iterator over the keys of an [`OSet`].
///
/// Yields the unmarked keys in sorted order. Elements inserted or removed
/// concurrently with the traversal may or may not be observed; elements
/// untouched while the iterator is alive are always observed exactly once.
///
/// [`OSet`]: crate::public::OSet
pub struct Iter<'a, K> {
  curr: Tagged<K>,
  marker: PhantomData<&'a List<K>>,
}

impl<'a, K> Iterator for Iter<'a, K> {
  type Item = &'a K;

  fn next(&mut self) -> Option<&'a K> {
    loop {
      // SAFETY: `curr` is reachable from the list borrowed for `'a` and
      // no node is freed while that borrow lives.
      let node: &'a Node<K> = unsafe { self.curr.as_ref() };
      let next: Tagged<K> = node.next.load(Acquire);

      match &node.key {
        Bound::Tail => return None,
        Bound::Key(key) if !next.is_marked() => {
          self.curr = next;
          return Some(key);
        }
        // Logically deleted (or the head sentinel): skip without yielding.
        _ => self.curr = next.unmarked(),
      }
    }
  }
}
