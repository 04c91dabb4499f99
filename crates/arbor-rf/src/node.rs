use std::fmt;

use crate::label::Label;

/// Zero-based attribute column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct AttributeIndex(usize);

impl AttributeIndex {
    /// Create a new attribute index from a zero-based column position.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based attribute column index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AttributeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in a decision tree.
///
/// Each decision node owns its two children outright; the tree is never
/// mutated after it is grown.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// A terminal node carrying the predicted label.
    Leaf {
        /// Predicted class.
        label: Label,
    },
    /// An interior equality test on one attribute.
    Decision {
        /// Attribute tested at this node.
        attribute: AttributeIndex,
        /// Samples whose value at `attribute` equals this go left.
        value: String,
        /// Subtree for samples matching `value`.
        left: Box<Node>,
        /// Subtree for every other sample.
        right: Box<Node>,
    },
}

impl Node {
    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Follow decisions from this node down to a leaf and return its label.
    ///
    /// `sample` must be long enough for every attribute referenced below
    /// this node; see [`Node::max_attribute`].
    pub(crate) fn route<S: AsRef<str>>(&self, sample: &[S]) -> Label {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { label } => return *label,
                Node::Decision {
                    attribute,
                    value,
                    left,
                    right,
                } => {
                    node = if sample[attribute.index()].as_ref() == value {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Return the largest attribute index referenced in this subtree.
    ///
    /// `None` for a lone leaf.
    #[must_use]
    pub fn max_attribute(&self) -> Option<usize> {
        match self {
            Node::Leaf { .. } => None,
            Node::Decision {
                attribute,
                left,
                right,
                ..
            } => [Some(attribute.index()), left.max_attribute(), right.max_attribute()]
                .into_iter()
                .flatten()
                .max(),
        }
    }

    /// Return the depth of this subtree. A leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Decision { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Return the number of nodes in this subtree (decisions and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Decision { left, right, .. } => 1 + left.n_nodes() + right.n_nodes(),
        }
    }

    /// Return the number of leaves in this subtree.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Decision { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}
