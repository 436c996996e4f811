//! Error types for chain construction and resolution.
//!
//! Two classes of failure exist. Construction errors ([`ChainError`]) are
//! raised while building a chain tree and are surfaced to the command author
//! who attempted the registration. Resolution errors ([`ResolveError`]) are
//! raised per resolution call; [`NoMatch`](ResolveError::NoMatch) and
//! [`Ambiguous`](ResolveError::Ambiguous) are expected, user-presentable
//! conditions, while matcher and handler faults are programming or
//! environment errors that propagate for logging.

use thiserror::Error;

use crate::chain::NodeId;

/// Boxed error source for handler and matcher faults.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while building a chain tree.
///
/// These are fatal to the registration attempt that produced them and must
/// reach the command author, not an end user.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The parent matcher is terminal and rejects having children appended.
    #[error("matcher '{parent}' cannot be extended with '{child}'")]
    CannotExtend {
        /// Description of the terminal parent matcher.
        parent: String,
        /// Description of the matcher that was being appended.
        child: String,
    },

    /// Two sibling matchers would be structurally ambiguous.
    #[error("matcher '{matcher}' cannot coexist with sibling '{sibling}'")]
    CannotCoexist {
        /// Description of the matcher being added.
        matcher: String,
        /// Description of the conflicting existing sibling.
        sibling: String,
    },

    /// The referenced node does not exist in this tree.
    #[error("unknown chain node: {0:?}")]
    UnknownNode(NodeId),
}

/// A matcher's `attempt` itself failed unexpectedly.
///
/// Built-in matchers never produce this; it exists so custom matchers that
/// consult external context can propagate their own failures instead of
/// panicking or silently rejecting.
#[derive(Debug, Error)]
#[error("matcher '{matcher}' failed: {source}")]
pub struct MatcherError {
    /// Description of the failing matcher.
    pub matcher: String,
    /// Underlying cause.
    #[source]
    pub source: BoxedError,
}

impl MatcherError {
    /// Wraps an arbitrary error as a fault of the named matcher.
    pub fn new(matcher: impl Into<String>, source: impl Into<BoxedError>) -> Self {
        Self {
            matcher: matcher.into(),
            source: source.into(),
        }
    }
}

/// Errors raised by a single resolution call.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No completed candidate survived full frontier expansion.
    #[error("no acceptable arguments")]
    NoMatch,

    /// More than one candidate tied at the top priority after dominance
    /// filtering; carries the surviving candidate count.
    #[error("ambiguous command: {0} matches")]
    Ambiguous(usize),

    /// A matcher's `attempt` failed; propagated, never swallowed.
    #[error("matcher fault: {0}")]
    Matcher(#[from] MatcherError),

    /// The bound handler failed during invocation. Distinct from a
    /// resolution failure: matching already succeeded.
    #[error("handler fault: {0}")]
    Handler(#[source] BoxedError),

    /// Resolution picked a leaf with no bound handler. A registration bug,
    /// not a user mistake.
    #[error("no handler bound to the matched command")]
    NoHandler,
}

impl ResolveError {
    /// Whether this error should be rendered back to the command sender as
    /// plain text. Matcher and handler faults are not user-facing; callers
    /// log them and reply with a generic failure message.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, ResolveError::NoMatch | ResolveError::Ambiguous(_))
    }
}
