//! Binary heap over the same node substrate as the tree, navigated by a
//! bit-walk over the slot id rather than by comparator descent.

use std::ops::ControlFlow;
use std::ptr::NonNull;

use super::bintree::BinTree;
use super::node::{Direction, Event, Link, Node};

type HeapNode<T> = Node<T, ()>;

/// Position of the highest set bit, or `None` if zero.
#[inline]
fn fls(x: usize) -> Option<u32> {
    if x == 0 {
        None
    } else {
        Some(usize::BITS - 1 - x.leading_zeros())
    }
}

/// A max-heap: `pop` always returns the greatest remaining element. Shape
/// is a complete binary tree; a node's slot id is the breadth-first index
/// at which it would sit in an array-backed heap, but the tree is stored
/// as linked nodes so that `push`/`pop` never invalidate element pointers
/// held elsewhere: a slot is relocated by relinking its node, never by
/// copying its value into another node.
pub struct BinaryHeap<T: Ord> {
    tree: BinTree<T, ()>,
}

impl<T: Ord> BinaryHeap<T> {
    pub fn new() -> Self {
        Self {
            tree: BinTree::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    pub fn peek(&self) -> Option<&T> {
        self.tree.root.map(|n| unsafe { &(*n.as_ptr()).value })
    }

    /// Walks from the root to the slot at breadth-first index `id`, by
    /// reading the bits of `id + 1` below its top set bit as a left
    /// (0) / right (1) path.
    unsafe fn nav(&self, id: usize) -> NonNull<HeapNode<T>> {
        let target = id + 1;
        let top = fls(target).expect("id + 1 is never zero");
        let mut node = self.tree.root.expect("nav requires a non-empty heap");
        let mut bit = top;
        while bit > 0 {
            bit -= 1;
            let go_right = (target >> bit) & 1 == 1;
            node = if go_right {
                (*node.as_ptr()).right
            } else {
                (*node.as_ptr()).left
            }
            .expect("slot id out of range for current shape");
        }
        node
    }

    pub fn push(&mut self, value: T) {
        let id = self.tree.count;
        let node = Node::new_boxed(value, ());

        if id == 0 {
            self.tree.root = Some(node);
        } else {
            let parent_id = (id - 1) / 2;
            unsafe {
                let parent = self.nav(parent_id);
                (*node.as_ptr()).parent = Some(parent);
                if id % 2 == 1 {
                    (*parent.as_ptr()).left = Some(node);
                } else {
                    (*parent.as_ptr()).right = Some(node);
                }
            }
        }
        self.tree.count += 1;
        self.sift_up(node);
    }

    /// Promotes `node` toward the root while it compares greater than its
    /// parent, by swapping it with its parent in the link structure.
    fn sift_up(&mut self, node: NonNull<HeapNode<T>>) {
        unsafe {
            let mut node = node;
            while let Some(parent) = (*node.as_ptr()).parent {
                if (*node.as_ptr()).value <= (*parent.as_ptr()).value {
                    break;
                }
                self.promote_child(node);
                // node is now in parent's former slot; loop re-reads its
                // (new) parent, the former grandparent.
            }
        }
    }

    /// Swaps `c` with its parent in the link structure: `c` takes its
    /// parent's place (and the parent's *other* child), the parent becomes
    /// one of `c`'s children and keeps `c`'s other original child. Unlike a
    /// BST rotation, this doesn't reattach either node's subtree to the
    /// wrong side, so the breadth-first slot id each node occupies is
    /// preserved swapped between the two, which is what [`Self::nav`]
    /// depends on. Mirrors `heap_promote_child` in the reference design
    /// link-for-link.
    unsafe fn promote_child(&mut self, c: NonNull<HeapNode<T>>) {
        let p = (*c.as_ptr())
            .parent
            .expect("promote_child requires c to have a parent");

        match (*p.as_ptr()).parent {
            None => self.tree.root = Some(c),
            Some(pp) => {
                if (*pp.as_ptr()).left == Some(p) {
                    (*pp.as_ptr()).left = Some(c);
                } else {
                    (*pp.as_ptr()).right = Some(c);
                }
            }
        }

        if let Some(cl) = (*c.as_ptr()).left {
            (*cl.as_ptr()).parent = Some(p);
        }
        if let Some(cr) = (*c.as_ptr()).right {
            (*cr.as_ptr()).parent = Some(p);
        }
        if let Some(pr) = (*p.as_ptr()).right {
            (*pr.as_ptr()).parent = Some(c);
        }
        if let Some(pl) = (*p.as_ptr()).left {
            (*pl.as_ptr()).parent = Some(c);
        }

        (*c.as_ptr()).parent = (*p.as_ptr()).parent;
        (*p.as_ptr()).parent = Some(c);

        if (*p.as_ptr()).left == Some(c) {
            let c_left = (*c.as_ptr()).left;
            let c_right = (*c.as_ptr()).right;
            let p_right = (*p.as_ptr()).right;

            (*p.as_ptr()).left = c_left;
            (*c.as_ptr()).left = Some(p);
            (*c.as_ptr()).right = p_right;
            (*p.as_ptr()).right = c_right;
        } else {
            let c_left = (*c.as_ptr()).left;
            let c_right = (*c.as_ptr()).right;
            let p_left = (*p.as_ptr()).left;

            (*p.as_ptr()).right = c_right;
            (*c.as_ptr()).right = Some(p);
            (*c.as_ptr()).left = p_left;
            (*p.as_ptr()).left = c_left;
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        let root = self.tree.root?;
        let last_id = self.tree.count - 1;

        unsafe {
            let last = self.nav(last_id);

            if last == root {
                self.tree.root = None;
            } else {
                let last_parent = (*last.as_ptr())
                    .parent
                    .expect("non-root last node has a parent");
                if (*last_parent.as_ptr()).left == Some(last) {
                    (*last_parent.as_ptr()).left = None;
                } else {
                    (*last_parent.as_ptr()).right = None;
                }

                let root_left = (*root.as_ptr()).left;
                let root_right = (*root.as_ptr()).right;
                (*last.as_ptr()).parent = None;
                (*last.as_ptr()).left = if root_left == Some(last) {
                    None
                } else {
                    root_left
                };
                (*last.as_ptr()).right = if root_right == Some(last) {
                    None
                } else {
                    root_right
                };
                if let Some(l) = (*last.as_ptr()).left {
                    (*l.as_ptr()).parent = Some(last);
                }
                if let Some(r) = (*last.as_ptr()).right {
                    (*r.as_ptr()).parent = Some(last);
                }
                self.tree.root = Some(last);
                self.sift_down(last);
            }

            self.tree.count -= 1;
            let (value, ()) = Node::into_parts(root);
            Some(value)
        }
    }

    /// Sinks `node` while some child compares greater, preferring the
    /// greater child when both qualify. Implemented as repeated
    /// parent/child link swaps so the relocated node never loses its
    /// identity or its subtree.
    fn sift_down(&mut self, node: NonNull<HeapNode<T>>) {
        unsafe {
            let node = node;
            loop {
                let left = (*node.as_ptr()).left;
                let right = (*node.as_ptr()).right;

                let promote_right = match (left, right) {
                    (None, None) => break,
                    (Some(_), None) => false,
                    (None, Some(_)) => true,
                    (Some(l), Some(r)) => (*r.as_ptr()).value > (*l.as_ptr()).value,
                };

                let child = if promote_right { right } else { left }.unwrap();
                if (*child.as_ptr()).value <= (*node.as_ptr()).value {
                    break;
                }

                self.promote_child(child);
                // node keeps its identity, now a child of `child`; loop
                // continues comparing it against its new children.
            }
        }
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn foreach<B>(
        &self,
        dir: Direction,
        visit: impl FnMut(&T, Event) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        self.tree.foreach(dir, visit)
    }

    pub fn height(&self) -> Option<(usize, usize)> {
        self.tree.height()
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }
}

impl<T: Ord> Default for BinaryHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Extend<T> for BinaryHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T: Ord> std::iter::FromIterator<T> for BinaryHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}
