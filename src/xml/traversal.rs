/*!
 * Generic depth-first pre-order traversal.
 *
 * The walker only knows the abstract [`Tree`] interface and keeps its own
 * worklist, so it holds no borrow of the tree between steps. A decoder can
 * therefore own both the document and a half-finished walk, and pull one
 * node at a time. A walk cannot be rewound; start a new one instead.
 */

/// Minimal view of a tree the walker and the path queries need
pub trait Tree {
    /// Cheap handle to a node
    type Node: Copy;

    /// Child handles in document order
    fn children(&self, node: Self::Node) -> &[Self::Node];

    /// Element name, `None` for non-element nodes
    fn tag(&self, node: Self::Node) -> Option<&str>;

    /// Attribute value by exact name
    fn attr(&self, node: Self::Node, name: &str) -> Option<&str>;
}

/// Pre-order walker driven by an explicit stack
#[derive(Debug, Clone)]
pub struct DepthFirst<N> {
    stack: Vec<N>,
}

impl<N: Copy> DepthFirst<N> {
    /// Start a walk at `root`; the root itself is the first node returned
    pub fn new(root: N) -> Self {
        Self { stack: vec![root] }
    }

    /// Advance the walk by one node
    pub fn next_node<T: Tree<Node = N>>(&mut self, tree: &T) -> Option<N> {
        let node = self.stack.pop()?;
        // Reversed so the first child is popped next
        self.stack.extend(tree.children(node).iter().rev().copied());
        Some(node)
    }

    /// Whether the walk has nothing left to visit
    pub fn is_finished(&self) -> bool {
        self.stack.is_empty()
    }

    /// Borrowing iterator over the remaining walk
    pub fn iter<T: Tree<Node = N>>(self, tree: &T) -> Iter<'_, T> {
        Iter { tree, walk: self }
    }
}

/// Iterator adapter returned by [`DepthFirst::iter`]
pub struct Iter<'a, T: Tree> {
    tree: &'a T,
    walk: DepthFirst<T::Node>,
}

impl<T: Tree> Iterator for Iter<'_, T> {
    type Item = T::Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next_node(self.tree)
    }
}
