//! Command-argument resolution over declaratively built chain trees.
//!
//! This crate is the matching engine of a chat-bot command platform. A
//! command family registers a [`ChainTree`]: a branching grammar of argument
//! shapes, each node wrapping one [`Matcher`] and each complete chain
//! optionally bound to a [`Handler`]. Given an already-tokenized input line,
//! the resolver selects exactly one matching chain — or fails with a
//! precise, user-presentable diagnosis — and can also enumerate every
//! reachable completion for help output.
//!
//! The engine is a breadth-first frontier search with clone-on-branch state
//! and deferred, priority-based tie-breaking:
//!
//! - [`Matcher`] — inspects remaining tokens and either rejects or consumes
//!   some, appending one parsed [`ArgValue`] at a [`Priority`] tier.
//! - [`ChainTree`] — the argument grammar, validated at construction and
//!   read-only during resolution.
//! - [`ResolutionState`] — the per-branch cursor; cheap to clone so sibling
//!   branches explore independently.
//! - [`resolve`] / [`execute`] — pick the unique winning chain (and
//!   optionally run its handler).
//! - [`help`] — enumerate every reachable completion for a prefix.
//!
//! Tokenizing raw input lines, transport, persistence, and permissions all
//! live outside this crate: it consumes a context plus a token sequence and
//! a pre-built tree, nothing more.
//!
//! # Example
//!
//! ```
//! use command_chain_core::{
//!     execute, help, ArgValue, ChainTree, HandlerError, Literal, NoArgs, Numeric,
//! };
//!
//! struct Counter {
//!     value: f64,
//! }
//!
//! fn set_value(counter: &mut Counter, args: &[ArgValue]) -> Result<(), HandlerError> {
//!     counter.value = args[1].as_number().ok_or("expected a number")?;
//!     Ok(())
//! }
//!
//! let mut tree: ChainTree<Counter> = ChainTree::new();
//! let set = tree.add_child(tree.root(), Literal::new("set"))?;
//! let value = tree.add_child(set, Numeric)?;
//! let leaf = tree.add_child(value, NoArgs)?;
//! tree.set_handler(leaf, set_value)?;
//! tree.set_description(leaf, "set the counter")?;
//!
//! let mut counter = Counter { value: 0.0 };
//! execute(&tree, &mut counter, &["set", "42"])?;
//! assert_eq!(counter.value, 42.0);
//!
//! let completions = help(&tree, &counter, &["set"])?;
//! assert_eq!(completions, vec!["set [#] (none) : set the counter"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod chain;
pub mod error;
pub mod matcher;
pub mod priority;
pub mod resolver;
pub mod state;
pub mod value;

pub use chain::{ChainNode, ChainTree, Handler, HandlerError, NodeId};
pub use error::{BoxedError, ChainError, MatcherError, ResolveError};
pub use matcher::{
    Following, Interval, Literal, Matcher, MatcherKind, NoArgs, Numeric, Optional, Page, Switch,
    Text, Url,
};
pub use priority::Priority;
pub use resolver::{ResolvedInvocation, execute, help, resolve};
pub use state::ResolutionState;
pub use value::ArgValue;
