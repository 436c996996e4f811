//! Per-branch resolution state.

use std::sync::Arc;

use crate::value::ArgValue;

/// The mutable-per-branch cursor: remaining tokens, the parsed-argument
/// accumulator, and the invoking context.
///
/// The token sequence for one resolution call lives in a single shared
/// `Arc<[String]>`; each state tracks only an integer cursor into it, so
/// cloning a state for a sibling branch copies the cursor and the
/// parsed-argument vector and never the tokens themselves. Divergent
/// branches therefore never alias each other's progress.
///
/// The context `C` is opaque to the resolver and the built-in matchers;
/// custom matchers may consult it through [`context`](Self::context).
pub struct ResolutionState<'a, C> {
    tokens: Arc<[String]>,
    cursor: usize,
    args: Vec<ArgValue>,
    context: &'a C,
}

impl<'a, C> ResolutionState<'a, C> {
    /// Creates a fresh state over a tokenized input line.
    ///
    /// Tokenization happens before the engine is involved; tokens are taken
    /// as given, with no quoting or re-splitting semantics.
    pub fn new<S: AsRef<str>>(tokens: &[S], context: &'a C) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.as_ref().to_string()).collect(),
            cursor: 0,
            args: Vec::new(),
            context,
        }
    }

    /// The next unconsumed token, if any, without consuming it.
    pub fn peek(&self) -> Option<&str> {
        self.tokens.get(self.cursor).map(String::as_str)
    }

    /// Consumes and returns the next token.
    pub fn take(&mut self) -> Option<String> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    /// Consumes and returns every remaining token.
    pub fn take_rest(&mut self) -> Vec<String> {
        let rest = self.tokens[self.cursor..].to_vec();
        self.cursor = self.tokens.len();
        rest
    }

    /// Number of unconsumed tokens.
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.cursor
    }

    /// Whether every token has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.tokens.len()
    }

    /// Appends a parsed value to the accumulator.
    pub fn push_arg(&mut self, value: ArgValue) {
        self.args.push(value);
    }

    /// The parsed values accumulated along this branch so far.
    pub fn args(&self) -> &[ArgValue] {
        &self.args
    }

    /// The invoking context.
    pub fn context(&self) -> &'a C {
        self.context
    }

    pub(crate) fn into_args(self) -> Vec<ArgValue> {
        self.args
    }
}

// Manual impl: cloning must not require `C: Clone`, only the `&C` is copied.
impl<C> Clone for ResolutionState<'_, C> {
    fn clone(&self) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
            cursor: self.cursor,
            args: self.args.clone(),
            context: self.context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_consumption() {
        let mut state = ResolutionState::new(&["a", "b", "c"], &());
        assert_eq!(state.remaining(), 3);
        assert_eq!(state.peek(), Some("a"));
        assert_eq!(state.take().as_deref(), Some("a"));
        assert_eq!(state.take_rest(), vec!["b".to_string(), "c".to_string()]);
        assert!(state.is_exhausted());
        assert_eq!(state.take(), None);
    }

    #[test]
    fn test_clones_do_not_alias() {
        let mut state = ResolutionState::new(&["a", "b"], &());
        let mut branch = state.clone();

        state.take();
        state.push_arg(ArgValue::Text("a".into()));

        assert_eq!(branch.remaining(), 2);
        assert!(branch.args().is_empty());
        assert_eq!(branch.take().as_deref(), Some("a"));
    }

    #[test]
    fn test_empty_input_is_exhausted() {
        let state: ResolutionState<'_, ()> = ResolutionState::new(&[] as &[&str], &());
        assert!(state.is_exhausted());
        assert_eq!(state.peek(), None);
    }
}
