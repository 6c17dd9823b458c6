use std::ptr::NonNull;
use std::sync::atomic::Ordering::Relaxed;

use crate::bound::Bound;
use crate::node::Node;
use crate::tagged::AtomicTagged;
use crate::tagged::Tagged;

#[test]
fn test_null_is_unmarked() {
  let null: Tagged<u64> = AtomicTagged::null().load(Relaxed);

  assert!(!null.is_marked());
  assert!(null.as_ptr().is_null());
}

#[test]
fn test_mark_round_trip() {
  let node: NonNull<Node<u64>> = Node::alloc(Bound::Key(7));
  let tagged: Tagged<u64> = Tagged::new(node);

  assert!(!tagged.is_marked());
  assert!(tagged.marked().is_marked());
  assert!(!tagged.marked().unmarked().is_marked());

  // The mark never disturbs the address.
  assert_eq!(tagged.marked().as_ptr(), node.as_ptr());
  assert_eq!(tagged.marked().unmarked(), tagged);

  // SAFETY: Allocated above, never published.
  unsafe { Node::dealloc(node) };
}

#[test]
fn test_marked_and_unmarked_words_differ() {
  let node: NonNull<Node<u64>> = Node::alloc(Bound::Key(7));
  let tagged: Tagged<u64> = Tagged::new(node);

  assert_ne!(tagged, tagged.marked());

  // SAFETY: Allocated above, never published.
  unsafe { Node::dealloc(node) };
}

#[test]
fn test_atomic_compare_exchange_full_word() {
  let node: NonNull<Node<u64>> = Node::alloc(Bound::Key(7));
  let tagged: Tagged<u64> = Tagged::new(node);
  let cell: AtomicTagged<u64> = AtomicTagged::null();

  cell.store(tagged, Relaxed);

  // The marked word is not the unmarked word.
  assert!(
    cell
      .compare_exchange(tagged.marked(), tagged, Relaxed, Relaxed)
      .is_err()
  );

  assert!(
    cell
      .compare_exchange(tagged, tagged.marked(), Relaxed, Relaxed)
      .is_ok()
  );

  assert!(cell.load(Relaxed).is_marked());

  // SAFETY: Allocated above, never published.
  unsafe { Node::dealloc(node) };
}
