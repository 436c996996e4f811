//! Frontier-based chain resolution.
//!
//! Both entry points drive the same breadth-first expansion over a frontier
//! of `(node, state)` pairs, cloning the branch state for every child
//! attempted so sibling branches explore independently.
//!
//! **Execute mode** ([`resolve`] / [`execute`]) prunes each round in
//! lock-step: only candidates at the round's best priority survive, so a
//! specific match anywhere in the round eliminates generic matches even
//! across unrelated subtrees. A candidate completes when it reaches a leaf
//! with no tokens left; completed candidates are dominance-filtered by
//! priority, and resolution succeeds only when exactly one remains.
//!
//! **Help mode** ([`help`]) skips the cross-round pruning, since every
//! reachable continuation must be shown, and when a branch runs out of
//! tokens at a non-leaf it flattens the entire subtree below, emitting every
//! descendant leaf. This is what lets a bare prefix list all of its valid
//! continuations.
//!
//! Resolution is synchronous, performs no I/O, and always terminates: the
//! tree is finite and acyclic, and every round either consumes tokens or
//! moves strictly deeper.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::chain::{ChainTree, NodeId};
use crate::error::ResolveError;
use crate::priority::Priority;
use crate::state::ResolutionState;
use crate::value::ArgValue;

/// The terminal artifact of a successful resolution: the matched leaf and
/// the finished parsed-argument list.
///
/// Returned by [`resolve`]; callers either inspect it or run
/// [`invoke`](ResolvedInvocation::invoke) to hand the arguments to the
/// leaf's bound handler.
#[derive(Debug)]
pub struct ResolvedInvocation<'t, C> {
    tree: &'t ChainTree<C>,
    node: NodeId,
    args: Vec<ArgValue>,
    priority: Priority,
}

impl<'t, C> ResolvedInvocation<'t, C> {
    /// The matched leaf node.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// The finished parsed-argument list, in chain order.
    pub fn args(&self) -> &[ArgValue] {
        &self.args
    }

    /// Consumes the invocation, yielding the parsed arguments.
    pub fn into_args(self) -> Vec<ArgValue> {
        self.args
    }

    /// The winning completion's priority.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The matched chain's path description.
    pub fn path(&self) -> String {
        self.tree.path_description(self.node).unwrap_or_default()
    }

    /// Invokes the bound handler with the parsed arguments.
    ///
    /// # Errors
    ///
    /// [`ResolveError::NoHandler`] if the matched leaf has no handler bound;
    /// [`ResolveError::Handler`] wrapping whatever the handler returned.
    pub fn invoke(&self, context: &mut C) -> Result<(), ResolveError> {
        match self.tree.node(self.node).and_then(|n| n.handler()) {
            Some(handler) => handler
                .invoke(context, &self.args)
                .map_err(ResolveError::Handler),
            None => Err(ResolveError::NoHandler),
        }
    }
}

struct Candidate<'a, C> {
    node: NodeId,
    priority: Priority,
    state: ResolutionState<'a, C>,
}

/// Resolves a tokenized input line against the tree to a unique completed
/// chain, without invoking any handler.
///
/// # Errors
///
/// [`ResolveError::NoMatch`] when no chain completes,
/// [`ResolveError::Ambiguous`] when more than one candidate ties at the top
/// priority after dominance filtering, and [`ResolveError::Matcher`] when a
/// matcher fails internally.
///
/// # Examples
///
/// ```
/// use command_chain_core::{resolve, ArgValue, ChainTree, Literal, NoArgs, Numeric};
///
/// let mut tree: ChainTree<()> = ChainTree::new();
/// let set = tree.add_child(tree.root(), Literal::new("set")).unwrap();
/// let value = tree.add_child(set, Numeric).unwrap();
/// tree.add_child(value, NoArgs).unwrap();
///
/// let invocation = resolve(&tree, &(), &["set", "42"]).unwrap();
/// assert_eq!(
///     invocation.args(),
///     &[ArgValue::Text("set".into()), ArgValue::Number(42.0)]
/// );
/// ```
pub fn resolve<'t, C, S: AsRef<str>>(
    tree: &'t ChainTree<C>,
    context: &C,
    tokens: &[S],
) -> Result<ResolvedInvocation<'t, C>, ResolveError> {
    let mut frontier = vec![(tree.root(), ResolutionState::new(tokens, context))];
    let mut completed: Vec<Candidate<'_, C>> = Vec::new();
    let mut round = 0usize;

    while !frontier.is_empty() {
        round += 1;
        let mut candidates: Vec<Candidate<'_, C>> = Vec::new();

        for (node_id, state) in frontier.drain(..) {
            for &child_id in tree.get(node_id).children() {
                let Some(matcher) = tree.get(child_id).matcher() else {
                    continue;
                };
                let mut branch = state.clone();
                let priority = matcher.attempt(&mut branch)?;
                if !priority.is_match() {
                    continue;
                }
                candidates.push(Candidate {
                    node: child_id,
                    priority,
                    state: branch,
                });
            }
        }

        let Some(best) = candidates.iter().map(|c| c.priority).max() else {
            break;
        };
        // Lock-step pruning: the round's best priority wins everywhere.
        candidates.retain(|c| c.priority == best);
        debug!(round, survivors = candidates.len(), ?best, "round pruned");

        for candidate in candidates {
            let node = tree.get(candidate.node);
            if node.is_leaf() {
                if candidate.state.is_exhausted() {
                    completed.push(candidate);
                }
                // A leaf with tokens left over is a dead branch.
            } else {
                frontier.push((candidate.node, candidate.state));
            }
        }
    }

    let Some(best) = completed.iter().map(|c| c.priority).max() else {
        return Err(ResolveError::NoMatch);
    };
    completed.retain(|c| c.priority == best);
    debug!(completions = completed.len(), ?best, "dominance filtered");

    if completed.len() > 1 {
        return Err(ResolveError::Ambiguous(completed.len()));
    }
    let winner = completed.remove(0);
    Ok(ResolvedInvocation {
        tree,
        node: winner.node,
        args: winner.state.into_args(),
        priority: winner.priority,
    })
}

/// Resolves a tokenized input line and invokes the winning chain's bound
/// handler, at most once.
///
/// # Errors
///
/// Everything [`resolve`] can return, plus [`ResolveError::NoHandler`] and
/// [`ResolveError::Handler`] from the invocation itself.
pub fn execute<C, S: AsRef<str>>(
    tree: &ChainTree<C>,
    context: &mut C,
    tokens: &[S],
) -> Result<(), ResolveError> {
    let invocation = resolve(tree, context, tokens)?;
    invocation.invoke(context)
}

/// Enumerates every chain reachable from the given prefix, for help and
/// auto-complete output.
///
/// Each returned line is the leaf's full path description, followed by
/// ` : <description>` when the leaf has one. Unlike [`resolve`], no
/// cross-round pruning happens, and a branch that exhausts its tokens above
/// a subtree lists every leaf of that subtree.
///
/// # Errors
///
/// [`ResolveError::Matcher`] when a matcher fails internally; an empty
/// result list is not an error.
///
/// # Examples
///
/// ```
/// use command_chain_core::{help, ChainTree, Literal, Page, Switch};
///
/// let mut tree: ChainTree<()> = ChainTree::new();
/// let list = tree.add_child(tree.root(), Literal::new("list")).unwrap();
/// tree.add_child(list, Page).unwrap();
/// tree.add_child(list, Switch::new(["asc", "desc"])).unwrap();
///
/// let lines = help(&tree, &(), &["list"]).unwrap();
/// assert_eq!(lines, vec!["list [Page:#]", "list (asc|desc)"]);
/// ```
pub fn help<C, S: AsRef<str>>(
    tree: &ChainTree<C>,
    context: &C,
    tokens: &[S],
) -> Result<Vec<String>, ResolveError> {
    let mut frontier = vec![(tree.root(), ResolutionState::new(tokens, context))];
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut lines = Vec::new();

    while !frontier.is_empty() {
        let mut next = Vec::new();

        for (node_id, state) in frontier.drain(..) {
            let node = tree.get(node_id);

            if state.is_exhausted() {
                // Out of input: everything below is a valid continuation.
                // The bare root is not a chain, so it never lists itself.
                for leaf in subtree_leaves(tree, node_id) {
                    if leaf != tree.root() && seen.insert(leaf) {
                        lines.push(completion_line(tree, leaf));
                    }
                }
                continue;
            }
            if node.is_leaf() {
                continue;
            }

            for &child_id in node.children() {
                let Some(matcher) = tree.get(child_id).matcher() else {
                    continue;
                };
                let mut branch = state.clone();
                if matcher.attempt(&mut branch)?.is_match() {
                    next.push((child_id, branch));
                }
            }
        }

        frontier = next;
    }

    debug!(completions = lines.len(), "help enumeration finished");
    Ok(lines)
}

/// Breadth-first flattening of the subtree under `start` to its leaves.
/// Yields `start` itself when it is already a leaf.
fn subtree_leaves<C>(tree: &ChainTree<C>, start: NodeId) -> Vec<NodeId> {
    let mut leaves = Vec::new();
    let mut queue = VecDeque::from([start]);
    while let Some(id) = queue.pop_front() {
        let node = tree.get(id);
        if node.is_leaf() {
            leaves.push(id);
        } else {
            queue.extend(node.children());
        }
    }
    leaves
}

fn completion_line<C>(tree: &ChainTree<C>, leaf: NodeId) -> String {
    let path = tree.path_description(leaf).unwrap_or_default();
    match tree.get(leaf).description() {
        Some(description) => format!("{path} : {description}"),
        None => path,
    }
}
