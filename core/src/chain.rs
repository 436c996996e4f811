//! The chain tree: accepted argument shapes for a command family.
//!
//! A [`ChainTree`] is built once at registration time and is read-only for
//! every resolution that follows: [`add_child`](ChainTree::add_child) and
//! friends take `&mut self`, while the resolver only ever borrows the tree
//! immutably, so the read path needs no synchronization.
//!
//! Nodes live in an arena indexed by [`NodeId`]; children are only ever
//! appended and parents are plain back-indices, so the tree is finite and
//! acyclic by construction. Structural validation (`can_extend` against the
//! parent, pairwise `can_coexist` against every existing sibling) runs at
//! [`add_child`](ChainTree::add_child) time and rejects ambiguous
//! registrations immediately with a [`ChainError`].
//!
//! # Examples
//!
//! ```
//! use command_chain_core::{ChainTree, Literal, NoArgs, Numeric};
//!
//! let mut tree: ChainTree<()> = ChainTree::new();
//! let set = tree.add_child(tree.root(), Literal::new("set")).unwrap();
//! let value = tree.add_child(set, Numeric).unwrap();
//! let leaf = tree.add_child(value, NoArgs).unwrap();
//! tree.set_description(leaf, "set the counter").unwrap();
//!
//! assert_eq!(tree.path_description(leaf).as_deref(), Some("set [#] (none)"));
//! ```

use std::fmt;

use serde::Serialize;

use crate::error::{BoxedError, ChainError};
use crate::matcher::Matcher;
use crate::value::ArgValue;

/// Error type produced by bound handlers.
pub type HandlerError = BoxedError;

/// A command handler bound to a leaf of the chain tree.
///
/// Invoked at most once per resolution call, only after matching has fully
/// and unambiguously succeeded. Implemented for any compatible closure.
pub trait Handler<C>: Send + Sync {
    fn invoke(&self, context: &mut C, args: &[ArgValue]) -> Result<(), HandlerError>;
}

impl<C, F> Handler<C> for F
where
    F: Fn(&mut C, &[ArgValue]) -> Result<(), HandlerError> + Send + Sync,
{
    fn invoke(&self, context: &mut C, args: &[ArgValue]) -> Result<(), HandlerError> {
        self(context, args)
    }
}

/// Index of a node within its [`ChainTree`]'s arena.
///
/// Only valid for the tree that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub(crate) usize);

/// One node of the chain tree: a matcher (absent only at the root), ordered
/// children, an optional bound handler, and an optional help description.
pub struct ChainNode<C> {
    matcher: Option<Box<dyn Matcher<C>>>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    handler: Option<Box<dyn Handler<C>>>,
    description: Option<String>,
}

impl<C> ChainNode<C> {
    /// The node's matcher; `None` only at the root.
    pub fn matcher(&self) -> Option<&dyn Matcher<C>> {
        self.matcher.as_deref()
    }

    /// Child node ids in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The parent node id; `None` only at the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The bound handler, if any.
    pub fn handler(&self) -> Option<&dyn Handler<C>> {
        self.handler.as_deref()
    }

    /// The help description, if set.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl<C> fmt::Debug for ChainNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainNode")
            .field("matcher", &self.matcher.as_deref().map(|m| m.describe()))
            .field("children", &self.children)
            .field("has_handler", &self.handler.is_some())
            .field("description", &self.description)
            .finish()
    }
}

/// A tree of accepted argument chains, one per command family.
pub struct ChainTree<C> {
    nodes: Vec<ChainNode<C>>,
}

impl<C> ChainTree<C> {
    /// Creates a tree containing only the matcher-less root.
    pub fn new() -> Self {
        Self {
            nodes: vec![ChainNode {
                matcher: None,
                parent: None,
                children: Vec::new(),
                handler: None,
                description: None,
            }],
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a child wrapping `matcher` beneath `parent`.
    ///
    /// Validates structure at call time: the parent's matcher must accept
    /// being extended (terminal matchers refuse), and the new matcher must
    /// coexist with every existing sibling in both directions.
    ///
    /// # Errors
    ///
    /// [`ChainError::UnknownNode`] if `parent` is not in this tree,
    /// [`ChainError::CannotExtend`] if the parent matcher is terminal, and
    /// [`ChainError::CannotCoexist`] on a structurally ambiguous sibling
    /// pair.
    pub fn add_child<M>(&mut self, parent: NodeId, matcher: M) -> Result<NodeId, ChainError>
    where
        M: Matcher<C> + 'static,
    {
        let boxed: Box<dyn Matcher<C>> = Box::new(matcher);

        let parent_node = self
            .nodes
            .get(parent.0)
            .ok_or(ChainError::UnknownNode(parent))?;

        if let Some(parent_matcher) = parent_node.matcher.as_deref() {
            if !parent_matcher.can_extend(boxed.as_ref()) {
                return Err(ChainError::CannotExtend {
                    parent: parent_matcher.describe(),
                    child: boxed.describe(),
                });
            }
        }

        for &sibling_id in &parent_node.children {
            let Some(sibling) = self.nodes[sibling_id.0].matcher.as_deref() else {
                continue;
            };
            if !sibling.can_coexist(boxed.as_ref()) || !boxed.can_coexist(sibling) {
                return Err(ChainError::CannotCoexist {
                    matcher: boxed.describe(),
                    sibling: sibling.describe(),
                });
            }
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(ChainNode {
            matcher: Some(boxed),
            parent: Some(parent),
            children: Vec::new(),
            handler: None,
            description: None,
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Binds a handler to `node`, replacing any existing one.
    pub fn set_handler<H>(&mut self, node: NodeId, handler: H) -> Result<(), ChainError>
    where
        H: Handler<C> + 'static,
    {
        let node_ref = self
            .nodes
            .get_mut(node.0)
            .ok_or(ChainError::UnknownNode(node))?;
        node_ref.handler = Some(Box::new(handler));
        Ok(())
    }

    /// Sets the help description of `node`.
    pub fn set_description(
        &mut self,
        node: NodeId,
        description: impl Into<String>,
    ) -> Result<(), ChainError> {
        let node_ref = self
            .nodes
            .get_mut(node.0)
            .ok_or(ChainError::UnknownNode(node))?;
        node_ref.description = Some(description.into());
        Ok(())
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&ChainNode<C>> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The chain's path description: every matcher's `describe()` from the
    /// root down to `node`, joined with spaces. `None` for an unknown id.
    pub fn path_description(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node.0)?;
        let mut parts = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let node_ref = &self.nodes[id.0];
            if let Some(matcher) = node_ref.matcher.as_deref() {
                parts.push(matcher.describe());
            }
            current = node_ref.parent;
        }
        parts.reverse();
        Some(parts.join(" "))
    }

    /// Internal accessor for ids minted by this tree.
    pub(crate) fn get(&self, id: NodeId) -> &ChainNode<C> {
        &self.nodes[id.0]
    }
}

impl<C> Default for ChainTree<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ChainTree<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainTree")
            .field("nodes", &self.nodes)
            .finish()
    }
}
