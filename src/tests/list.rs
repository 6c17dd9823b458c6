use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering::Relaxed;

use crate::public::OSet;

#[test]
fn test_new_is_empty() {
  let set: OSet<u64> = OSet::new();

  assert_eq!(set.len(), 0);
  assert!(set.is_empty());
  assert!(set.iter().next().is_none());
}

#[test]
fn test_insert_reports_novelty() {
  let set: OSet<u64> = OSet::new();

  assert!(set.insert(7));
  assert!(!set.insert(7));

  assert_eq!(set.len(), 1);
}

#[test]
fn test_iter_is_sorted() {
  let set: OSet<u64> = OSet::new();

  for key in [500, 100, 400, 200, 300] {
    assert!(set.insert(key));
  }

  let keys: Vec<u64> = set.iter().copied().collect();

  assert_eq!(keys, [100, 200, 300, 400, 500]);
}

#[test]
fn test_contains() {
  let set: OSet<u64> = OSet::new();

  set.insert(100);
  set.insert(300);

  assert!(set.contains(&100));
  assert!(set.contains(&300));

  // Neither below, between, nor above.
  assert!(!set.contains(&50));
  assert!(!set.contains(&200));
  assert!(!set.contains(&400));
}

#[test]
fn test_remove() {
  let set: OSet<u64> = OSet::new();

  for key in [100, 200, 300] {
    set.insert(key);
  }

  assert!(set.remove(&200));
  assert!(!set.remove(&200));
  assert!(!set.remove(&999));

  assert_eq!(set.len(), 2);
  assert!(!set.contains(&200));

  let keys: Vec<u64> = set.iter().copied().collect();

  assert_eq!(keys, [100, 300]);
}

#[test]
fn test_remove_endpoints() {
  let set: OSet<u64> = OSet::new();

  for key in [100, 200, 300] {
    set.insert(key);
  }

  assert!(set.remove(&100));
  assert!(set.remove(&300));

  let keys: Vec<u64> = set.iter().copied().collect();

  assert_eq!(keys, [200]);
}

#[test]
fn test_reinsert_after_remove() {
  let set: OSet<u64> = OSet::new();

  assert!(set.insert(7));
  assert!(set.remove(&7));
  assert!(set.insert(7));

  assert!(set.contains(&7));
  assert_eq!(set.len(), 1);
}

#[test]
fn test_drain_to_empty() {
  let set: OSet<u64> = OSet::new();

  for key in 0..64 {
    set.insert(key);
  }

  for key in 0..64 {
    assert!(set.remove(&key));
  }

  assert!(set.is_empty());
  assert!(set.iter().next().is_none());
}

#[test]
fn test_from_iter() {
  let set: OSet<u64> = [3, 1, 2, 3].into_iter().collect();

  let keys: Vec<u64> = set.iter().copied().collect();

  assert_eq!(keys, [1, 2, 3]);
  assert_eq!(set.len(), 3);
}

#[test]
fn test_debug() {
  let set: OSet<u64> = [2, 1].into_iter().collect();

  assert_eq!(format!("{set:?}"), "{1, 2}");
}

#[test]
fn test_drop_frees_present_keys_only() {
  static DROPS: AtomicU32 = AtomicU32::new(0);

  #[derive(PartialEq, Eq, PartialOrd, Ord)]
  struct Key(u32);

  impl Drop for Key {
    fn drop(&mut self) {
      DROPS.fetch_add(1, Relaxed);
    }
  }

  let set: OSet<Key> = OSet::new();

  for value in 0..8 {
    set.insert(Key(value));
  }

  // Losing inserts drop their key immediately.
  set.insert(Key(3));
  assert_eq!(DROPS.load(Relaxed), 1);

  // A removed key is leaked once its node is unlinked; the +1 here is the
  // probe temporary, not the stored key.
  set.remove(&Key(5));
  assert_eq!(DROPS.load(Relaxed), 2);

  // Dropping the set frees exactly the seven keys still in the chain.
  drop(set);
  assert_eq!(DROPS.load(Relaxed), 9);
}
