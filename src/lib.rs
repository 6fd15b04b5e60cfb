#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

//! Open-addressing hash table.
//!
//! # lptable::HashTable
//! A single-threaded hash table that stores its entries directly in a slot array, resolves
//! collisions by linear probing, deletes with tombstones, and doubles its capacity whenever an
//! insertion would raise the load factor above `0.6`.
//!
//! ```
//! use lptable::HashTable;
//!
//! let mut table: HashTable<&str, u32> = HashTable::new();
//!
//! assert!(!table.add("a", 1));
//! assert!(table.add("a", 2));
//! assert_eq!(table.get("a"), Some(&2));
//! assert!(table.remove("a"));
//! assert!(!table.contains_key("a"));
//! ```
//!
//! Mutation requires `&mut HashTable`; sharing a table across threads requires an external lock
//! around the whole table.

mod error;
pub use error::Error;

pub mod hash_table;
pub use hash_table::{HashTable, SlotState, INITIAL_CAPACITY, MAX_LOAD_FACTOR};

pub use equivalent::Equivalent;

#[cfg(feature = "serde")]
mod serde;
