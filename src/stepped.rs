//! Step-at-a-time deletion.
//!
//! Deletion decomposes into three machine steps: find the node, set its
//! mark, swing the predecessor past it. [`DeleteOp`] exposes those steps
//! individually so that a test can drive several deletions against the same
//! set in any chosen order and observe exactly where each one takes effect
//! or gets pushed back by another.
//!
//! A driven deletion behaves like [`OSet::remove`] stretched out in time:
//! the element disappears at the mark step, a failed mark sends the
//! operation back to locate, and steps issued out of phase do nothing.
//!
//! ```
//! use oset::OSet;
//! use oset::stepped::DeleteOp;
//! use oset::stepped::Phase;
//! use oset::stepped::Step;
//!
//! let set: OSet<u64> = OSet::new();
//!
//! for key in [100, 200, 300, 500] {
//!   set.insert(key);
//! }
//!
//! let mut op: DeleteOp<'_, u64> = DeleteOp::new(&set, 200);
//!
//! assert_eq!(op.locate(), Step::Complete);
//!
//! // The element disappears at the mark, not at the unlink.
//! assert_eq!(op.mark(), Step::Complete);
//! assert!(!set.contains(&200));
//!
//! assert_eq!(op.unlink(), Step::Complete);
//! assert_eq!(op.phase(), Phase::Done);
//! ```

use crate::list::List;
use crate::list::Position;
use crate::public::OSet;

// -----------------------------------------------------------------------------
// Phase
// -----------------------------------------------------------------------------

/// The next step a [`DeleteOp`] is waiting to take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
  /// Waiting to find the target node.
  Locate,
  /// Found; waiting to set the mark.
  Mark,
  /// Marked; waiting to swing the predecessor past the node.
  Unlink,
  /// Finished, successfully or not.
  Done,
}

// -----------------------------------------------------------------------------
// Step
// -----------------------------------------------------------------------------

/// The outcome of driving one step of a [`DeleteOp`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
  /// The step did its work and the operation advanced a phase.
  Complete,
  /// A concurrent operation got in the way; the operation is back in
  /// [`Phase::Locate`] and must be located again.
  Retry,
  /// The key is not in the set; the operation is done.
  Absent,
  /// The step does not match the current phase and was a no-op.
  Skipped,
}

// -----------------------------------------------------------------------------
// Stepped Deletion
// -----------------------------------------------------------------------------

/// A deletion of one key, driven one step at a time by the caller.
///
/// See the [module documentation](self) for an example.
pub struct DeleteOp<'a, K> {
  list: &'a List<K>,
  key: K,
  phase: Phase,
  position: Option<Position<'a, K>>,
}

impl<'a, K> DeleteOp<'a, K> {
  /// Creates a deletion of `key` from `set`, in [`Phase::Locate`].
  pub fn new(set: &'a OSet<K>, key: K) -> Self {
    Self {
      list: set.raw(),
      key,
      phase: Phase::Locate,
      position: None,
    }
  }

  /// Returns the current phase.
  #[inline]
  pub fn phase(&self) -> Phase {
    self.phase
  }

  /// Returns the key being deleted.
  #[inline]
  pub fn key(&self) -> &K {
    &self.key
  }

  /// Step 1: one traversal attempt for the key.
  ///
  /// Unlike [`OSet::remove`], a traversal invalidated by concurrent
  /// updates is not silently restarted; it surfaces as [`Step::Retry`] so
  /// the caller decides when the next attempt runs.
  pub fn locate(&mut self) -> Step
  where
    K: Ord,
  {
    if self.phase != Phase::Locate {
      return Step::Skipped;
    }

    let Some(position) = self.list.try_locate(&self.key) else {
      return Step::Retry;
    };

    if !position.found {
      self.phase = Phase::Done;
      return Step::Absent;
    }

    self.position = Some(position);
    self.phase = Phase::Mark;

    Step::Complete
  }

  /// Step 2: sets the mark, logically deleting the element.
  ///
  /// On success this is the point at which the key leaves the set. On
  /// failure the located position has gone stale and the operation drops
  /// back to [`Phase::Locate`].
  pub fn mark(&mut self) -> Step {
    if self.phase != Phase::Mark {
      return Step::Skipped;
    }

    // The position was stored when `locate` returned `Complete`.
    let Some(position) = self.position.as_ref() else {
      return Step::Skipped;
    };

    if self.list.mark(position) {
      self.phase = Phase::Unlink;
      return Step::Complete;
    }

    self.position = None;
    self.phase = Phase::Locate;

    Step::Retry
  }

  /// Step 3: swings the predecessor past the marked node.
  ///
  /// Always completes: if the compare-and-swap fails, a concurrent
  /// traversal has already repaired the chain on this operation's behalf,
  /// and there is nothing left to do.
  pub fn unlink(&mut self) -> Step {
    if self.phase != Phase::Unlink {
      return Step::Skipped;
    }

    if let Some(position) = self.position.take() {
      self.list.unlink(&position);
    }

    self.phase = Phase::Done;

    Step::Complete
  }
}
