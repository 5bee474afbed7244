//! Separate-chaining hash table with incremental, epoch-based rehashing.
//!
//! A resize never migrates every bucket up front. It flips a table-wide
//! epoch flag, stashes the new hash function/bucket count as "pending",
//! and leaves each bucket's own epoch flag stale. Subsequent operations
//! clean a handful of buckets on the way past (lookup cleans the bucket
//! under the old hash, the bucket under the new hash, and one more off
//! the watermark) until `clean >= pending.count`, at which point the
//! pending hash becomes the current one.

mod func;

use std::ops::ControlFlow;

pub use func::{div_hash, mul_hash, HashFn, KeyHash};

use crate::config::{GrowthPolicy, HashTableConfig};
use crate::error::{Error, Result};

struct HashNode<K, V> {
    key: K,
    value: V,
    next: Option<Box<HashNode<K, V>>>,
}

struct Bucket<K, V> {
    head: Option<Box<HashNode<K, V>>>,
    epoch: bool,
}

impl<K, V> Bucket<K, V> {
    fn new(epoch: bool) -> Self {
        Self { head: None, epoch }
    }
}

#[derive(Clone, Copy)]
struct Pending {
    hash_fn: HashFn,
    count: usize,
    clean: usize,
}

fn bucket_index(hash_fn: HashFn, key_hash: u64, modulus: usize) -> usize {
    let i = hash_fn(key_hash, modulus);
    assert!(
        i < modulus,
        "hash function returned bucket {} out of range for {} buckets",
        i,
        modulus
    );
    i
}

/// A hash table mapping `K` to `V`. Must be given an initial bucket count
/// (via [`HashTable::new`] or [`HashTable::with_config`]) before use.
pub struct HashTable<K, V> {
    buckets: Vec<Bucket<K, V>>,
    /// Bucket count under `hash_fn`, `h->bucket.count` in the reference
    /// design. Buckets at or beyond this index but within `buckets.len()`
    /// exist but aren't live until a resize promotes them.
    active: usize,
    table_epoch: bool,
    hash_fn: Option<HashFn>,
    pending: Option<Pending>,
    size: usize,
    config: HashTableConfig,
}

impl<K: KeyHash + Eq, V> HashTable<K, V> {
    pub fn new() -> Self {
        Self::with_config(HashTableConfig::default())
    }

    pub fn with_config(config: HashTableConfig) -> Self {
        let mut table = Self {
            buckets: Vec::new(),
            active: 0,
            table_epoch: false,
            hash_fn: None,
            pending: None,
            size: 0,
            config,
        };
        let initial = table.config.initial_buckets().max(1);
        table.resize(initial, None);
        table
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// `size / target bucket count`, where the target is the pending
    /// count while a rehash is in progress.
    pub fn load_factor(&self) -> f64 {
        let target = self.pending.map(|p| p.count).unwrap_or(self.active);
        self.size as f64 / target as f64
    }

    fn try_grow_capacity(&mut self, requested: usize) -> Result<()> {
        if requested <= self.buckets.len() {
            return Ok(());
        }
        let target = match self.config.growth() {
            GrowthPolicy::Doubling => requested.max(self.buckets.len() * 2),
            GrowthPolicy::Exact => requested,
        };
        self.buckets
            .try_reserve(target - self.buckets.len())
            .map_err(|_| Error::AllocationFailed { requested: target })?;
        let epoch = self.table_epoch;
        self.buckets
            .resize_with(target, move || Bucket::new(epoch));
        Ok(())
    }

    /// Grows to (or changes the hash function for) `count` buckets. A
    /// no-op if `count` already matches the active bucket count and no
    /// new hash function is supplied. The very first resize (before any
    /// hash function is set) takes effect immediately; every later one
    /// schedules an incremental rehash. Fails without touching the table
    /// if growing the bucket vector can't allocate; never shrinks the
    /// vector itself (see [`Self::shrink_to_fit`]), so a shrinking
    /// resize always succeeds here and the old buckets beyond the new
    /// active range are drained by the incremental rehash instead.
    pub fn try_resize(&mut self, count: usize, hash_fn: Option<HashFn>) -> Result<()> {
        if count == 0 {
            return Ok(());
        }

        self.try_grow_capacity(count)?;

        let hash_changed = matches!(hash_fn, Some(h) if Some(h) != self.hash_fn);
        if self.hash_fn.is_some() && count == self.active && !hash_changed {
            return Ok(());
        }

        self.rehash();

        self.table_epoch = !self.table_epoch;
        // Only buckets beyond the current active range are newly coming
        // into use and need marking under the new epoch; a shrinking
        // resize introduces no such buckets; the ones falling out of the
        // active range are drained down into the smaller range by the
        // incremental rehash itself (see `clean_bucket`), not here.
        if count > self.active {
            for bucket in &mut self.buckets[self.active..count] {
                bucket.head = None;
                bucket.epoch = self.table_epoch;
            }
        }

        let new_hash_fn = hash_fn.or(self.hash_fn).unwrap_or(mul_hash);

        if self.hash_fn.is_none() {
            self.hash_fn = Some(new_hash_fn);
            self.active = count;
        } else {
            self.pending = Some(Pending {
                hash_fn: new_hash_fn,
                count,
                clean: 0,
            });
        }
        Ok(())
    }

    /// Forced variant of [`Self::try_resize`]: an allocation failure is a
    /// silent no-op here, since this table's growth is optional, unlike
    /// [`crate::Vector::resize`], which aborts on failure.
    pub fn resize(&mut self, count: usize, hash_fn: Option<HashFn>) {
        let _ = self.try_resize(count, hash_fn);
    }

    pub fn shrink_to_fit(&mut self) {
        self.rehash();
        let target = self.active;
        if self.buckets.len() > target {
            self.buckets.truncate(target);
            self.buckets.shrink_to_fit();
        }
    }

    /// Forces any in-progress rehash to completion.
    pub fn rehash(&mut self) {
        if self.pending.is_some() {
            self.rehash_step(usize::MAX);
        }
    }

    fn rehash_step(&mut self, mut n: usize) {
        let mut pending = match self.pending {
            Some(p) => p,
            None => return,
        };

        while pending.clean < self.active && self.buckets[pending.clean].epoch == self.table_epoch
        {
            pending.clean += 1;
        }

        while pending.clean < self.active && n > 0 {
            self.clean_bucket(pending.clean, pending);
            pending.clean += 1;
            n -= 1;
        }

        if pending.clean >= self.active {
            self.active = pending.count;
            self.hash_fn = Some(pending.hash_fn);
            self.pending = None;
        } else {
            self.pending = Some(pending);
        }
    }

    fn clean_bucket(&mut self, idx: usize, pending: Pending) {
        if self.buckets[idx].epoch == self.table_epoch {
            return;
        }

        let mut chain = self.buckets[idx].head.take();
        while let Some(mut node) = chain {
            chain = node.next.take();
            let key_hash = node.key.key_hash();
            let new_idx = bucket_index(pending.hash_fn, key_hash, pending.count);
            node.next = self.buckets[new_idx].head.take();
            self.buckets[new_idx].head = Some(node);
        }
        self.buckets[idx].epoch = self.table_epoch;
    }

    /// Resolves `key_hash` to its current bucket, cleaning along the way
    /// if a rehash is in progress.
    fn locate_bucket(&mut self, key_hash: u64) -> usize {
        let hash_fn = self
            .hash_fn
            .expect("hash table must be given an initial bucket count before use");
        let idx = bucket_index(hash_fn, key_hash, self.active);

        if let Some(pending) = self.pending {
            let pending_idx = bucket_index(pending.hash_fn, key_hash, pending.count);
            self.clean_bucket(idx, pending);
            self.clean_bucket(pending_idx, pending);
            self.rehash_step(1);
            pending_idx
        } else {
            idx
        }
    }

    /// Inserts `key`/`value`. Does not check for an existing equal key,
    /// matching [`crate::Map`], which layers uniqueness on top of the
    /// ordered tree rather than here.
    pub fn insert(&mut self, key: K, value: V) {
        let key_hash = key.key_hash();
        let idx = self.locate_bucket(key_hash);
        let node = Box::new(HashNode {
            key,
            value,
            next: self.buckets[idx].head.take(),
        });
        self.buckets[idx].head = Some(node);
        self.size += 1;
    }

    pub fn find(&mut self, key: &K) -> Option<&V> {
        let key_hash = key.key_hash();
        let idx = self.locate_bucket(key_hash);
        let mut cur = self.buckets[idx].head.as_deref();
        while let Some(node) = cur {
            if &node.key == key {
                return Some(&node.value);
            }
            cur = node.next.as_deref();
        }
        None
    }

    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let key_hash = key.key_hash();
        let idx = self.locate_bucket(key_hash);
        let mut cur = self.buckets[idx].head.as_deref_mut();
        while let Some(node) = cur {
            if &node.key == key {
                return Some(&mut node.value);
            }
            cur = node.next.as_deref_mut();
        }
        None
    }

    pub fn contains_key(&mut self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn erase(&mut self, key: &K) -> Option<V> {
        let key_hash = key.key_hash();
        let idx = self.locate_bucket(key_hash);
        let bucket = &mut self.buckets[idx];

        if bucket.head.as_ref().map_or(false, |n| &n.key == key) {
            let mut node = bucket.head.take().unwrap();
            bucket.head = node.next.take();
            self.size -= 1;
            return Some(node.value);
        }

        let mut cur = bucket.head.as_mut();
        while let Some(node) = cur {
            if node.next.as_ref().map_or(false, |n| &n.key == key) {
                let mut removed = node.next.take().unwrap();
                node.next = removed.next.take();
                self.size -= 1;
                return Some(removed.value);
            }
            cur = node.next.as_mut();
        }
        None
    }

    /// Visits every element. Forces any pending rehash to completion
    /// first, matching the reference design's `foreach`.
    pub fn foreach<B>(
        &mut self,
        mut visit: impl FnMut(&K, &V) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        self.rehash();
        for bucket in &self.buckets[..self.active] {
            let mut cur = bucket.head.as_deref();
            while let Some(node) = cur {
                visit(&node.key, &node.value)?;
                cur = node.next.as_deref();
            }
        }
        ControlFlow::Continue(())
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.active = 0;
        self.hash_fn = None;
        self.pending = None;
        self.size = 0;
    }
}

impl<K: KeyHash + Eq, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
