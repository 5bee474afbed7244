//! A general-purpose container and memory-management library.
//!
//! Five tightly coupled subsystems: an ordered-tree engine ([`tree`]) that
//! backs a red-black tree and a binary heap, a separate-chaining hash table
//! with incremental rehashing ([`hash`]), a growable vector with sort/search
//! primitives ([`vector`]), intrusive-style doubly and singly linked lists
//! ([`list`]), and smart-pointer ownership primitives ([`ptr`]). [`Map`] and
//! [`Array`] are facades built from the above.

pub mod config;
pub mod error;
pub mod hash;
pub mod list;
pub mod ptr;
pub mod tree;
pub mod vector;

mod array;
mod map;

pub use array::Array;
pub use config::HashTableConfig;
pub use error::{Error, Result};
pub use hash::HashTable;
pub use list::{DList, SList};
pub use map::Map;
pub use ptr::{GuardedPtr, SharedPtr, UniquePtr, WeakPtr};
pub use tree::{BinaryHeap, RbTree};
pub use vector::Vector;
