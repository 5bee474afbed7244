use std::ptr::NonNull;

pub(crate) type Link<T, A> = Option<NonNull<Node<T, A>>>;

/// A binary-tree node. `A` is auxiliary per-node state: `()` for the plain
/// substrate and the heap, [`crate::tree::rbtree::Color`] for the red-black
/// specialization.
pub(crate) struct Node<T, A> {
    pub(crate) parent: Link<T, A>,
    pub(crate) left: Link<T, A>,
    pub(crate) right: Link<T, A>,
    pub(crate) aux: A,
    pub(crate) value: T,
}

impl<T, A> Node<T, A> {
    pub(crate) fn new_boxed(value: T, aux: A) -> NonNull<Node<T, A>> {
        let boxed = Box::new(Node {
            parent: None,
            left: None,
            right: None,
            aux,
            value,
        });
        unsafe { NonNull::new_unchecked(Box::into_raw(boxed)) }
    }

    /// Reclaims a detached node, returning its payload and auxiliary state.
    ///
    /// # Safety
    /// `ptr` must point at a node that was allocated by [`Node::new_boxed`]
    /// and is no longer reachable from any tree.
    pub(crate) unsafe fn into_parts(ptr: NonNull<Node<T, A>>) -> (T, A) {
        let boxed = Box::from_raw(ptr.as_ptr());
        (boxed.value, boxed.aux)
    }
}

/// Traversal direction for [`crate::tree::bintree::BinTree::foreach`],
/// replacing the `left`/`right` accessor-function-pointer pair the source
/// uses to write one routine for both directions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Fwd,
    Rev,
}

/// Which phase of a node's visit a `foreach` callback is being invoked for.
/// Leaf nodes receive only [`Event::Leaf`]; internal nodes receive
/// `Pre`, `Mid` (between the two subtree visits), and `Post`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Event {
    Pre,
    Mid,
    Post,
    Leaf,
}
