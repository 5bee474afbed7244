//! Red-black specialization over [`BinTree`].

use std::ops::ControlFlow;
use std::ptr::NonNull;

use super::bintree::BinTree;
use super::node::{Direction, Event, Link, Node};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

type RbNode<T> = Node<T, Color>;

fn color_of<T>(link: Link<T, Color>) -> Color {
    match link {
        None => Color::Black,
        Some(n) => unsafe { (*n.as_ptr()).aux },
    }
}

unsafe fn set_color<T>(link: Link<T, Color>, color: Color) {
    if let Some(n) = link {
        (*n.as_ptr()).aux = color;
    }
}

unsafe fn parent_of<T>(n: NonNull<RbNode<T>>) -> Link<T, Color> {
    (*n.as_ptr()).parent
}

unsafe fn is_left_child<T>(n: NonNull<RbNode<T>>, parent: NonNull<RbNode<T>>) -> bool {
    (*parent.as_ptr()).left == Some(n)
}

/// A red-black tree: a self-balancing binary search tree guaranteeing
/// O(log n) insert/find/erase and a height within a factor of 2 of the
/// theoretical minimum.
pub struct RbTree<T: Ord> {
    tree: BinTree<T, Color>,
}

impl<T: Ord> RbTree<T> {
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

    pub fn find(&self, value: &T) -> Option<&T> {
        self.tree
            .find(value)
            .map(|n| unsafe { &(*n.as_ptr()).value })
    }

    /// Searches by an arbitrary comparator against the query rather than
    /// requiring a full `T`, see [`BinTree::find_by`].
    pub fn find_by(&self, cmp: impl FnMut(&T) -> std::cmp::Ordering) -> Option<&T> {
        self.tree
            .find_by(cmp)
            .map(|n| unsafe { &(*n.as_ptr()).value })
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Inserts `value`. Ties route right, so inserting an equal value
    /// again adds a second node rather than replacing the first.
    pub fn insert(&mut self, value: T) {
        let node = Node::new_boxed(value, Color::Red);
        self.tree.insert_node(node);
        self.fix_after_insert(node);
    }

    fn fix_after_insert(&mut self, mut z: NonNull<RbNode<T>>) {
        unsafe {
            loop {
                let parent = match parent_of(z) {
                    Some(p) if color_of(Some(p)) == Color::Red => p,
                    _ => break,
                };
                // parent is red, so parent is not the root and has a parent.
                let grandparent = parent_of(parent).expect("red node must have a grandparent");

                if is_left_child(parent, grandparent) {
                    let uncle = (*grandparent.as_ptr()).right;
                    if color_of(uncle) == Color::Red {
                        set_color(Some(parent), Color::Black);
                        set_color(uncle, Color::Black);
                        set_color(Some(grandparent), Color::Red);
                        z = grandparent;
                        continue;
                    }

                    let mut parent = parent;
                    if (*parent.as_ptr()).right == Some(z) {
                        z = parent;
                        self.tree.rotate(z, true);
                        parent = parent_of(z).unwrap();
                    }
                    set_color(Some(parent), Color::Black);
                    set_color(Some(grandparent), Color::Red);
                    self.tree.rotate(grandparent, false);
                    break;
                } else {
                    let uncle = (*grandparent.as_ptr()).left;
                    if color_of(uncle) == Color::Red {
                        set_color(Some(parent), Color::Black);
                        set_color(uncle, Color::Black);
                        set_color(Some(grandparent), Color::Red);
                        z = grandparent;
                        continue;
                    }

                    let mut parent = parent;
                    if (*parent.as_ptr()).left == Some(z) {
                        z = parent;
                        self.tree.rotate(z, false);
                        parent = parent_of(z).unwrap();
                    }
                    set_color(Some(parent), Color::Black);
                    set_color(Some(grandparent), Color::Red);
                    self.tree.rotate(grandparent, true);
                    break;
                }
            }

            set_color(self.tree.root, Color::Black);
        }
    }

    /// Removes and returns the stored value equal to `value`, if present.
    pub fn erase(&mut self, value: &T) -> Option<T> {
        let z = self.tree.find(value)?;
        Some(self.erase_found(z))
    }

    /// Like [`Self::erase`] but located via an arbitrary comparator, see
    /// [`Self::find_by`].
    pub fn erase_by(&mut self, cmp: impl FnMut(&T) -> std::cmp::Ordering) -> Option<T> {
        let z = self.tree.find_by(cmp)?;
        Some(self.erase_found(z))
    }

    fn erase_found(&mut self, z: NonNull<RbNode<T>>) -> T {
        let original_color = unsafe { (*z.as_ptr()).aux };

        let erased = self.tree.erase_node(z);
        unsafe {
            (*erased.color_node.as_ptr()).aux = original_color;
        }

        if original_color == Color::Black {
            self.fix_after_erase(erased.x, erased.x_parent);
        }
        unsafe {
            set_color(self.tree.root, Color::Black);
        }

        let (value, _) = unsafe { Node::into_parts(z) };
        value
    }

    /// CLRS RB-DELETE-FIXUP, walking from `x` (possibly a "doubly black"
    /// `None` standing in place of a leaf) toward the root.
    fn fix_after_erase(&mut self, mut x: Link<T, Color>, mut x_parent: Link<T, Color>) {
        unsafe {
            while x != self.tree.root && color_of(x) == Color::Black {
                let parent = match x_parent {
                    Some(p) => p,
                    None => break,
                };

                if x == (*parent.as_ptr()).left {
                    let mut w = (*parent.as_ptr())
                        .right
                        .expect("x's sibling cannot be None: x's subtree is black-deficient");

                    if color_of(Some(w)) == Color::Red {
                        set_color(Some(w), Color::Black);
                        set_color(Some(parent), Color::Red);
                        self.tree.rotate(parent, true);
                        w = (*parent.as_ptr()).right.unwrap();
                    }

                    if color_of((*w.as_ptr()).left) == Color::Black
                        && color_of((*w.as_ptr()).right) == Color::Black
                    {
                        set_color(Some(w), Color::Red);
                        x = Some(parent);
                        x_parent = parent_of(parent);
                    } else {
                        if color_of((*w.as_ptr()).right) == Color::Black {
                            set_color((*w.as_ptr()).left, Color::Black);
                            set_color(Some(w), Color::Red);
                            self.tree.rotate(w, false);
                            w = (*parent.as_ptr()).right.unwrap();
                        }
                        set_color(Some(w), color_of(Some(parent)));
                        set_color(Some(parent), Color::Black);
                        set_color((*w.as_ptr()).right, Color::Black);
                        self.tree.rotate(parent, true);
                        x = self.tree.root;
                        x_parent = None;
                    }
                } else {
                    let mut w = (*parent.as_ptr())
                        .left
                        .expect("x's sibling cannot be None: x's subtree is black-deficient");

                    if color_of(Some(w)) == Color::Red {
                        set_color(Some(w), Color::Black);
                        set_color(Some(parent), Color::Red);
                        self.tree.rotate(parent, false);
                        w = (*parent.as_ptr()).left.unwrap();
                    }

                    if color_of((*w.as_ptr()).right) == Color::Black
                        && color_of((*w.as_ptr()).left) == Color::Black
                    {
                        set_color(Some(w), Color::Red);
                        x = Some(parent);
                        x_parent = parent_of(parent);
                    } else {
                        if color_of((*w.as_ptr()).left) == Color::Black {
                            set_color((*w.as_ptr()).right, Color::Black);
                            set_color(Some(w), Color::Red);
                            self.tree.rotate(w, true);
                            w = (*parent.as_ptr()).left.unwrap();
                        }
                        set_color(Some(w), color_of(Some(parent)));
                        set_color(Some(parent), Color::Black);
                        set_color((*w.as_ptr()).left, Color::Black);
                        self.tree.rotate(parent, false);
                        x = self.tree.root;
                        x_parent = None;
                    }
                }
            }

            set_color(x, Color::Black);
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

    /// `(min, max)` leaf depth. Red-black balance guarantees `max <= 2 *
    /// min` (property used in the balance tests below).
    pub fn height(&self) -> Option<(usize, usize)> {
        self.tree.height()
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }
}

impl<T: Ord> Default for RbTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Extend<T> for RbTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> std::iter::FromIterator<T> for RbTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::thread_rng;

    fn black_height<T>(tree: &RbTree<T>) -> usize
    where
        T: Ord,
    {
        unsafe fn walk<T>(n: Link<T, Color>) -> usize {
            match n {
                None => 1,
                Some(p) => {
                    let add = if color_of(Some(p)) == Color::Black {
                        1
                    } else {
                        0
                    };
                    walk((*p.as_ptr()).left) + add
                }
            }
        }
        unsafe { walk(tree.tree.root) }
    }

    fn check_invariants<T: Ord + std::fmt::Debug>(tree: &RbTree<T>) {
        assert_eq!(color_of(tree.tree.root), Color::Black, "root must be black");

        unsafe fn check<T>(n: Link<T, Color>) -> usize {
            let node = match n {
                None => return 1,
                Some(node) => node,
            };
            if color_of(Some(node)) == Color::Red {
                assert_eq!(
                    color_of((*node.as_ptr()).left),
                    Color::Black,
                    "red node must have black children"
                );
                assert_eq!(
                    color_of((*node.as_ptr()).right),
                    Color::Black,
                    "red node must have black children"
                );
            }
            let lh = check((*node.as_ptr()).left);
            let rh = check((*node.as_ptr()).right);
            assert_eq!(lh, rh, "black height must match on both sides");
            lh + if color_of(Some(node)) == Color::Black {
                1
            } else {
                0
            }
        }
        unsafe {
            check(tree.tree.root);
        }

        if let Some((min, max)) = tree.height() {
            let n = tree.len();
            let bound = 2.0 * ((n + 1) as f64).log2();
            assert!(
                (max as f64) <= bound.ceil() + 1.0,
                "max height {} exceeds 2*log2(n+1) bound for n={}",
                max,
                n
            );
            assert!(max <= 2 * min.max(1), "max height more than double min height");
        }
    }

    #[test]
    fn insert_and_find() {
        let mut t = RbTree::new();
        for i in 0..50 {
            t.insert(i);
        }
        check_invariants(&t);
        for i in 0..50 {
            assert!(t.contains(&i));
        }
        assert!(!t.contains(&50));
    }

    #[test]
    fn insert_erase_scenario_s1() {
        let mut t: RbTree<i32> = (0..99).collect();
        check_invariants(&t);
        assert_eq!(t.len(), 99);

        let mut order: Vec<i32> = (0..99).collect();
        order.shuffle(&mut thread_rng());

        for v in order {
            let erased = t.erase(&v);
            assert_eq!(erased, Some(v));
            check_invariants(&t);
        }
        assert!(t.is_empty());
        assert_eq!(black_height(&t), 1);
    }

    #[test]
    fn erase_missing_is_noop() {
        let mut t: RbTree<i32> = (0..10).collect();
        assert_eq!(t.erase(&100), None);
        assert_eq!(t.len(), 10);
    }

    #[test]
    fn foreach_forward_is_sorted() {
        let t: RbTree<i32> = vec![5, 3, 8, 1, 4, 7, 9].into_iter().collect();
        let mut out = Vec::new();
        t.foreach(Direction::Fwd, |v, _| {
            out.push(*v);
            ControlFlow::<()>::Continue(())
        });
        let mut sorted = out.clone();
        sorted.sort();
        assert_eq!(out, sorted);
    }
}
