//! A lock-free sorted set over a marked linked list.
//!
//! `oset` provides [`OSet`], a concurrent ordered set of keys backed by a
//! sorted singly-linked list. Insertions and removals are single-word
//! compare-and-swaps; lookups and iteration are plain atomic traversals. No
//! operation ever blocks, and a stalled thread cannot hold up any other.
//!
//! # Overview
//!
//! Removal happens in two phases. A *mark* bit packed into the low bit of a
//! node's successor word logically deletes the node in one atomic step;
//! physically splicing the node out of the chain is a separate step that any
//! thread may finish on the deleter's behalf. Traversals treat a marked node
//! as already gone and help unlink it in passing.
//!
//! # Usage
//!
//! ```
//! use oset::OSet;
//!
//! let set: OSet<u64> = OSet::new();
//!
//! // Insert returns whether the key was new
//! assert!(set.insert(30));
//! assert!(set.insert(10));
//! assert!(!set.insert(30));
//!
//! // Lookups and removals by reference
//! assert!(set.contains(&10));
//! assert!(set.remove(&10));
//! assert!(!set.remove(&10));
//!
//! // Iteration is sorted
//! let keys: Vec<u64> = set.iter().copied().collect();
//! assert_eq!(keys, [30]);
//! ```
//!
//! # Concurrency
//!
//! All operations on [`OSet`] are thread-safe and lock-free. Multiple
//! threads can concurrently insert, remove, and look up keys without
//! blocking.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::thread;
//!
//! use oset::OSet;
//!
//! let set: Arc<OSet<u64>> = Arc::new(OSet::new());
//!
//! let handles: Vec<_> = (0..4)
//!   .map(|thread_id| {
//!     let set = Arc::clone(&set);
//!     thread::spawn(move || {
//!       for i in 0..100 {
//!         set.insert(thread_id * 1000 + i);
//!         set.remove(&(thread_id * 1000 + i));
//!       }
//!     })
//!   })
//!   .collect();
//!
//! for handle in handles {
//!   handle.join().unwrap();
//! }
//! ```
//!
//! ## Memory Reclamation
//!
//! There is none: nodes removed from the set are leaked until the set itself
//! is dropped. That keeps every traversal safe without epochs or hazard
//! pointers and rules out address reuse under pending compare-and-swaps, at
//! the cost of memory growth proportional to the number of removals. See the
//! [`OSet`] type documentation for the implications.
//!
//! # Stepped Deletion
//!
//! The [`stepped`] module exposes deletion one machine step at a time, so
//! tests can drive chosen interleavings of concurrent deletions
//! deterministically instead of hoping a thread scheduler finds them.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod bound;
mod list;
mod node;
mod padded;
mod public;
mod tagged;
mod utils;

pub mod stepped;

#[cfg(all(test, not(any(loom, shuttle))))]
mod tests;

pub(crate) use crate::utils::sync;

pub mod implementation {
  #![doc = include_str!("../IMPLEMENTATION.md")]
}

pub use self::list::Iter;
pub use self::public::OSet;
