//! The unbalanced binary-search-tree substrate shared by [`crate::RbTree`]
//! and [`crate::BinaryHeap`].

use std::ops::ControlFlow;
use std::ptr::NonNull;

use super::node::{Direction, Event, Link, Node};

/// Result of [`BinTree::erase_node`].
///
/// `z` (the argument) is always left detached from the tree after this
/// call and is the caller's to reclaim. When `z` has two children, though,
/// the node that's actually relocated is its in-order successor, which
/// keeps its own identity and is repainted to `z`'s slot. `color_node` is
/// that successor (or `z` itself, in the zero/one-child case), the node
/// whose *pre-call* color governs whether the red-black specialization
/// needs a fix-up, and which the caller should repaint to `z`'s original
/// color. `x`/`x_parent` mark where the fix-up walk starts (a synthetic
/// `None` child still needs `x_parent` to know where it structurally sits).
pub(crate) struct Erased<T, A> {
    pub(crate) color_node: NonNull<Node<T, A>>,
    pub(crate) x: Link<T, A>,
    pub(crate) x_parent: Link<T, A>,
}

pub(crate) struct BinTree<T, A> {
    pub(crate) root: Link<T, A>,
    pub(crate) count: usize,
}

impl<T: Ord, A> BinTree<T, A> {
    pub(crate) fn new() -> Self {
        Self {
            root: None,
            count: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    /// Inserts an already-allocated, detached node. Ties route right (the
    /// tree is not a set).
    pub(crate) fn insert_node(&mut self, node: NonNull<Node<T, A>>) {
        unsafe {
            let mut parent: Link<T, A> = None;
            let mut cur = self.root;
            let mut go_left = false;

            while let Some(c) = cur {
                parent = Some(c);
                if (*node.as_ptr()).value < (*c.as_ptr()).value {
                    go_left = true;
                    cur = (*c.as_ptr()).left;
                } else {
                    go_left = false;
                    cur = (*c.as_ptr()).right;
                }
            }

            (*node.as_ptr()).parent = parent;
            match parent {
                None => self.root = Some(node),
                Some(p) => {
                    if go_left {
                        (*p.as_ptr()).left = Some(node);
                    } else {
                        (*p.as_ptr()).right = Some(node);
                    }
                }
            }
            self.count += 1;
        }
    }

    pub(crate) fn find(&self, value: &T) -> Link<T, A> {
        self.find_by(|v| value.cmp(v))
    }

    /// Like [`Self::find`] but the query need not be a `T` itself: `cmp`
    /// is handed each visited node's value and must return the query's
    /// ordering relative to it (`Less` to bear left, `Greater` to bear
    /// right). Lets a facade like [`crate::Map`] search by key alone
    /// without constructing a full element.
    pub(crate) fn find_by(&self, mut cmp: impl FnMut(&T) -> std::cmp::Ordering) -> Link<T, A> {
        unsafe {
            let mut cur = self.root;
            while let Some(c) = cur {
                match cmp(&(*c.as_ptr()).value) {
                    std::cmp::Ordering::Less => cur = (*c.as_ptr()).left,
                    std::cmp::Ordering::Greater => cur = (*c.as_ptr()).right,
                    std::cmp::Ordering::Equal => return Some(c),
                }
            }
            None
        }
    }

    /// Replaces `u`'s slot (root or a parent's child pointer) with `v`,
    /// and reparents `v` to `u`'s former parent. Does not touch `u` itself.
    unsafe fn transplant(&mut self, u: NonNull<Node<T, A>>, v: Link<T, A>) {
        match (*u.as_ptr()).parent {
            None => self.root = v,
            Some(p) => {
                if (*p.as_ptr()).left == Some(u) {
                    (*p.as_ptr()).left = v;
                } else {
                    (*p.as_ptr()).right = v;
                }
            }
        }
        if let Some(vv) = v {
            (*vv.as_ptr()).parent = (*u.as_ptr()).parent;
        }
    }

    /// Standard BST deletion of `z`. `z` itself is always left detached
    /// from the tree (and from the count) by the time this returns; the
    /// caller owns its memory from here. See [`Erased`] for what the
    /// return value means.
    pub(crate) fn erase_node(&mut self, z: NonNull<Node<T, A>>) -> Erased<T, A> {
        unsafe {
            let z_left = (*z.as_ptr()).left;
            let z_right = (*z.as_ptr()).right;

            let (color_node, x, x_parent) = if z_left.is_none() {
                let x_parent = (*z.as_ptr()).parent;
                self.transplant(z, z_right);
                (z, z_right, x_parent)
            } else if z_right.is_none() {
                let x_parent = (*z.as_ptr()).parent;
                self.transplant(z, z_left);
                (z, z_left, x_parent)
            } else {
                let mut y = z_right.unwrap();
                while let Some(l) = (*y.as_ptr()).left {
                    y = l;
                }

                let x = (*y.as_ptr()).right;
                let x_parent;

                if (*y.as_ptr()).parent == Some(z) {
                    x_parent = Some(y);
                } else {
                    x_parent = (*y.as_ptr()).parent;
                    self.transplant(y, x);
                    (*y.as_ptr()).right = z_right;
                    (*(*y.as_ptr()).right.unwrap().as_ptr()).parent = Some(y);
                }

                self.transplant(z, Some(y));
                (*y.as_ptr()).left = z_left;
                (*(*y.as_ptr()).left.unwrap().as_ptr()).parent = Some(y);

                (y, x, x_parent)
            };

            self.count -= 1;
            Erased {
                color_node,
                x,
                x_parent,
            }
        }
    }

    /// `rotate(x, left=true)` is a left rotation (right child comes up);
    /// `left=false` is the mirror-image right rotation. A single primitive
    /// parameterized by direction, replacing the `left`/`right`
    /// accessor-function-pointer pair.
    pub(crate) fn rotate(&mut self, x: NonNull<Node<T, A>>, left: bool) {
        unsafe {
            let y = if left {
                (*x.as_ptr()).right
            } else {
                (*x.as_ptr()).left
            }
            .expect("rotate requires the pivoted-on child to exist");

            let inner = if left {
                (*y.as_ptr()).left
            } else {
                (*y.as_ptr()).right
            };

            if left {
                (*x.as_ptr()).right = inner;
            } else {
                (*x.as_ptr()).left = inner;
            }
            if let Some(i) = inner {
                (*i.as_ptr()).parent = Some(x);
            }

            (*y.as_ptr()).parent = (*x.as_ptr()).parent;
            match (*x.as_ptr()).parent {
                None => self.root = Some(y),
                Some(p) => {
                    if (*p.as_ptr()).left == Some(x) {
                        (*p.as_ptr()).left = Some(y);
                    } else {
                        (*p.as_ptr()).right = Some(y);
                    }
                }
            }

            if left {
                (*y.as_ptr()).left = Some(x);
            } else {
                (*y.as_ptr()).right = Some(x);
            }
            (*x.as_ptr()).parent = Some(y);
        }
    }

    /// Visits every node depth-first, invoking `visit` with an [`Event`]
    /// tag. Returns early (propagating the break value) on the first
    /// `ControlFlow::Break`.
    pub(crate) fn foreach<B>(
        &self,
        dir: Direction,
        mut visit: impl FnMut(&T, Event) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        unsafe fn go<T, A, B>(
            node: Link<T, A>,
            dir: Direction,
            visit: &mut impl FnMut(&T, Event) -> ControlFlow<B>,
        ) -> ControlFlow<B> {
            let n = match node {
                Some(n) => n,
                None => return ControlFlow::Continue(()),
            };

            let (first, second) = match dir {
                Direction::Fwd => ((*n.as_ptr()).left, (*n.as_ptr()).right),
                Direction::Rev => ((*n.as_ptr()).right, (*n.as_ptr()).left),
            };

            if first.is_none() && second.is_none() {
                return visit(&(*n.as_ptr()).value, Event::Leaf);
            }

            visit(&(*n.as_ptr()).value, Event::Pre)?;
            go(first, dir, visit)?;
            visit(&(*n.as_ptr()).value, Event::Mid)?;
            go(second, dir, visit)?;
            visit(&(*n.as_ptr()).value, Event::Post)
        }

        unsafe { go(self.root, dir, &mut visit) }
    }

    /// Returns `(min, max)` leaf-to-root path length across all leaves.
    pub(crate) fn height(&self) -> Option<(usize, usize)> {
        unsafe fn depth<T, A>(mut n: NonNull<Node<T, A>>) -> usize {
            let mut d = 0;
            while let Some(p) = unsafe { (*n.as_ptr()).parent } {
                n = p;
                d += 1;
            }
            d
        }

        unsafe fn collect_leaves<T, A>(node: Link<T, A>, out: &mut Vec<NonNull<Node<T, A>>>) {
            if let Some(n) = node {
                let (l, r) = ((*n.as_ptr()).left, (*n.as_ptr()).right);
                if l.is_none() && r.is_none() {
                    out.push(n);
                } else {
                    collect_leaves(l, out);
                    collect_leaves(r, out);
                }
            }
        }

        let mut leaves = Vec::new();
        unsafe {
            collect_leaves(self.root, &mut leaves);
        }
        if leaves.is_empty() {
            return None;
        }

        let mut min = usize::MAX;
        let mut max = 0usize;
        for leaf in leaves {
            let d = unsafe { depth(leaf) };
            min = min.min(d);
            max = max.max(d);
        }
        Some((min, max))
    }

    /// Drops every node, calling `T`'s destructor via ordinary `Drop`.
    /// Nodes are freed in post-order / leaf order, the callback-eligible
    /// events in the source's `clear`.
    pub(crate) fn clear(&mut self) {
        unsafe fn drop_subtree<T, A>(node: Link<T, A>) {
            if let Some(n) = node {
                let (l, r) = ((*n.as_ptr()).left, (*n.as_ptr()).right);
                drop_subtree(l);
                drop_subtree(r);
                let _ = Node::into_parts(n);
            }
        }
        unsafe {
            drop_subtree(self.root);
        }
        self.root = None;
        self.count = 0;
    }

    pub(crate) fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.root, &mut other.root);
        std::mem::swap(&mut self.count, &mut other.count);
        unsafe {
            if let Some(r) = self.root {
                (*r.as_ptr()).parent = None;
            }
            if let Some(r) = other.root {
                (*r.as_ptr()).parent = None;
            }
        }
    }
}

impl<T: Ord, A> Drop for BinTree<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}
