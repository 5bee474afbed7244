//! A growable, contiguous sequence with in-place sort/search primitives.
//!
//! Backed by [`Vec`] for allocation. The sort/search/reverse algorithms
//! below are implemented from scratch over the resulting slice, since
//! those algorithms (and their dispatch) are what this module is testing,
//! not a replacement for `slice::sort`.

use std::cmp::Ordering;

use rand::Rng;

use crate::error::{Error, Result};

/// Selects which in-place sort `Vector::sort` runs. All four produce a
/// non-decreasing order under `T: Ord`; they differ in pivot choice (or,
/// for `Heap`, in algorithm entirely) and therefore in worst-case
/// behavior and benchmark profile.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SortAlgorithm {
    /// Hoare partition, pivot is always the first element.
    Quick,
    /// Hoare partition, pivot chosen uniformly at random.
    QuickRandom,
    /// Hoare partition, pivot is the median of first/middle/last.
    QuickMedian,
    Heap,
}

impl SortAlgorithm {
    fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(SortAlgorithm::Quick),
            1 => Some(SortAlgorithm::QuickRandom),
            2 => Some(SortAlgorithm::QuickMedian),
            3 => Some(SortAlgorithm::Heap),
            _ => None,
        }
    }
}

impl Default for SortAlgorithm {
    fn default() -> Self {
        SortAlgorithm::Quick
    }
}

/// Sorts `s` using the algorithm selected by a raw, possibly out-of-range
/// selector, falling back to [`SortAlgorithm::Quick`] when `raw` doesn't
/// name a known algorithm.
pub fn sort_with_fallback<T: Ord>(s: &mut [T], raw: u32) {
    sort_slice(s, SortAlgorithm::from_raw(raw).unwrap_or_default());
}

pub(crate) fn sort_slice<T: Ord>(s: &mut [T], algorithm: SortAlgorithm) {
    match algorithm {
        SortAlgorithm::Quick => quicksort(s, pivot_first),
        SortAlgorithm::QuickRandom => quicksort(s, pivot_random),
        SortAlgorithm::QuickMedian => quicksort(s, pivot_median_of_three),
        SortAlgorithm::Heap => heapsort(s),
    }
}

fn pivot_first<T>(_s: &[T]) -> usize {
    0
}

fn pivot_random<T>(s: &[T]) -> usize {
    rand::thread_rng().gen_range(0, s.len())
}

fn pivot_median_of_three<T: Ord>(s: &[T]) -> usize {
    let last = s.len() - 1;
    let mid = last / 2;
    let mut candidates = [0usize, mid, last];
    candidates.sort_by(|&a, &b| s[a].cmp(&s[b]));
    candidates[1]
}

/// Hoare partition around `s[pivot_idx]`. Tracks the pivot by index
/// (rather than copying its value out) so `T` need not be `Clone`;
/// whenever a swap lands on the pivot's current slot, the tracked index
/// follows it.
fn hoare_partition<T: Ord>(s: &mut [T], mut pivot_idx: usize) -> usize {
    let mut i = -1isize;
    let mut j = s.len() as isize;
    loop {
        loop {
            i += 1;
            if s[i as usize] >= s[pivot_idx] {
                break;
            }
        }
        loop {
            j -= 1;
            if s[j as usize] <= s[pivot_idx] {
                break;
            }
        }
        if i >= j {
            return j as usize;
        }
        s.swap(i as usize, j as usize);
        if pivot_idx as isize == i {
            pivot_idx = j as usize;
        } else if pivot_idx as isize == j {
            pivot_idx = i as usize;
        }
    }
}

fn quicksort<T: Ord>(s: &mut [T], pick_pivot: fn(&[T]) -> usize) {
    if s.len() <= 1 {
        return;
    }
    let pivot_idx = pick_pivot(s);
    let split = hoare_partition(s, pivot_idx);
    let (left, right) = s.split_at_mut(split + 1);
    quicksort(left, pick_pivot);
    quicksort(right, pick_pivot);
}

fn sift_down<T: Ord>(s: &mut [T], mut root: usize, end: usize) {
    loop {
        let left = 2 * root + 1;
        if left >= end {
            break;
        }
        let right = left + 1;
        let child = if right < end && s[right] > s[left] {
            right
        } else {
            left
        };
        if s[child] <= s[root] {
            break;
        }
        s.swap(root, child);
        root = child;
    }
}

fn heapsort<T: Ord>(s: &mut [T]) {
    let n = s.len();
    if n < 2 {
        return;
    }
    for i in (0..n / 2).rev() {
        sift_down(s, i, n);
    }
    for end in (1..n).rev() {
        s.swap(0, end);
        sift_down(s, 0, end);
    }
}

fn reverse_slice<T>(s: &mut [T]) {
    let mut i = 0usize;
    let mut j = s.len().saturating_sub(1);
    while i < j {
        s.swap(i, j);
        i += 1;
        j -= 1;
    }
}

/// A growable sequence. `at`/`at_mut` panic on an out-of-range index, the
/// same precondition-violation-aborts contract as the rest of this crate.
pub struct Vector<T> {
    buf: Vec<T>,
}

impl<T> Vector<T> {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn at(&self, index: usize) -> &T {
        &self.buf[index]
    }

    pub fn at_mut(&mut self, index: usize) -> &mut T {
        &mut self.buf[index]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buf
    }

    /// Probes for enough capacity before committing; leaves the vector
    /// unchanged on failure rather than aborting.
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.buf
            .try_reserve(additional)
            .map_err(|_| Error::AllocationFailed {
                requested: self.buf.len() + additional,
            })
    }

    /// Forced growth: aborts on allocation failure.
    pub fn reserve(&mut self, additional: usize) {
        self.try_reserve(additional)
            .expect("vector reserve must succeed");
    }

    pub fn shrink_to_fit(&mut self) {
        self.buf.shrink_to_fit();
    }

    /// Aborts if `cap` would shrink below the live element count.
    pub fn set_capacity(&mut self, cap: usize) {
        assert!(
            cap >= self.buf.len(),
            "cannot shrink vector capacity below its live element count"
        );
        if cap > self.buf.capacity() {
            self.reserve(cap - self.buf.len());
        }
    }

    pub fn push(&mut self, value: T) {
        self.buf.push(value);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.buf.pop()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.buf, &mut other.buf);
    }

    /// Reverses the live elements in place.
    pub fn reverse(&mut self) {
        reverse_slice(&mut self.buf);
    }

    /// Linear scan for the first element equal to `value`.
    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.buf.iter().position(|v| v == value)
    }

    /// Binary search. Requires the vector already be sorted ascending.
    pub fn search(&self, value: &T) -> Option<usize>
    where
        T: Ord,
    {
        let mut lo = 0isize;
        let mut hi = self.buf.len() as isize - 1;
        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            match self.buf[mid as usize].cmp(value) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid - 1,
                Ordering::Equal => return Some(mid as usize),
            }
        }
        None
    }

    pub fn sort(&mut self, algorithm: SortAlgorithm)
    where
        T: Ord,
    {
        sort_slice(&mut self.buf, algorithm);
    }
}

impl<T: Default + Clone> Vector<T> {
    /// Probes for capacity first; on failure, leaves the vector unchanged.
    pub fn try_resize(&mut self, new_len: usize) -> Result<()> {
        if new_len > self.buf.len() {
            self.try_reserve(new_len - self.buf.len())?;
        }
        self.buf.resize(new_len, T::default());
        Ok(())
    }

    /// Forced growth: aborts on allocation failure.
    pub fn resize(&mut self, new_len: usize) {
        self.try_resize(new_len).expect("vector resize must succeed");
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.buf.extend(iter);
    }
}

impl<T> std::iter::FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            buf: Vec::from_iter(iter),
        }
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}
