//! The argument matcher catalogue.
//!
//! A matcher is the polymorphic unit a [`ChainNode`](crate::ChainTree) wraps:
//! it inspects the remaining tokens of a [`ResolutionState`] and either
//! rejects ([`Priority::None`]) or consumes zero or more tokens, appends zero
//! or one parsed [`ArgValue`], and reports a confidence tier. Built-ins:
//!
//! - [`Literal`] — one token, case-insensitive equality, appends the
//!   canonical label (high).
//! - [`NoArgs`] — matches only an empty remainder; terminal (high).
//! - [`Numeric`] — one token parsed as a floating-point number (high).
//! - [`Interval`] — one token of the form `<number><unit>`, converted to
//!   milliseconds (high).
//! - [`Text`] — any one token, the generic fallback (low).
//! - [`Following`] — every remaining token joined with spaces; terminal
//!   (low, matches even an empty remainder).
//! - [`Switch`] — one token against a fixed closed label set (high).
//! - [`Page`] — `page:N` / `p:N`, or page 1 when no token remains (high).
//! - [`Url`] — one token parsed as an absolute URL (high).
//! - [`Optional`] — wraps any matcher; supplies a default at low priority
//!   when the inner matcher rejects without consuming.
//!
//! Structural compatibility between matchers is decided from their
//! [`MatcherKind`] discriminants: terminal matchers refuse children, and
//! sibling pairs that could never be told apart (two `NoArgs`, two
//! `Following`, same-label literals, overlapping switches) refuse to coexist.
//! Both checks run at tree-construction time, never during matching.
//!
//! # Examples
//!
//! ```
//! use command_chain_core::{ArgValue, Interval, Matcher, Priority, ResolutionState};
//!
//! let mut state = ResolutionState::new(&["5s"], &());
//! let priority = Interval.attempt(&mut state).unwrap();
//! assert_eq!(priority, Priority::High);
//! assert_eq!(state.args(), &[ArgValue::Number(5000.0)]);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::MatcherError;
use crate::priority::Priority;
use crate::state::ResolutionState;
use crate::value::ArgValue;

/// Token shape for interval arguments: `<number><unit>`.
static INTERVAL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?)([A-Za-z]+)$").expect("valid regex"));

/// Token shape for page selectors: `page:N` or `p:N`.
static PAGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:page|p):([0-9]+)$").expect("valid regex"));

/// A polymorphic argument matcher.
///
/// Implementations must uphold the attempt contract: on a
/// [`Priority::None`] result the state is left untouched (no tokens
/// consumed, no value appended). The resolver runs `attempt` on a *clone*
/// of the branch state, so a rejecting matcher that violates this only
/// wastes the clone, but [`Optional`] relies on the contract to decide
/// whether to supply its default.
///
/// The engine is generic over an opaque context type `C`; built-in matchers
/// ignore it, custom matchers may read it via
/// [`ResolutionState::context`].
pub trait Matcher<C>: Send + Sync {
    /// A short human-readable token for help text, e.g. `[#]` or `(none)`.
    fn describe(&self) -> String;

    /// The structural discriminant used for compatibility checks.
    ///
    /// Custom matchers outside the built-in catalogue return
    /// [`MatcherKind::Custom`], which coexists with everything and accepts
    /// children.
    fn kind(&self) -> MatcherKind;

    /// Inspects the remaining tokens, consuming zero or more and appending
    /// zero or one parsed value on a match.
    fn attempt(&self, state: &mut ResolutionState<'_, C>) -> Result<Priority, MatcherError>;

    /// Whether this matcher's branch may have `child` appended beneath it.
    fn can_extend(&self, child: &dyn Matcher<C>) -> bool {
        let _ = child;
        self.kind().is_extendable()
    }

    /// Whether this matcher and `sibling` may sit under the same parent
    /// without being structurally ambiguous.
    fn can_coexist(&self, sibling: &dyn Matcher<C>) -> bool {
        self.kind().coexists_with(&sibling.kind())
    }
}

/// Structural discriminant of a matcher, used for construction-time
/// compatibility checks without downcasting trait objects.
///
/// Label payloads are stored case-folded so comparisons are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MatcherKind {
    /// An exact literal with its folded label.
    Literal(String),
    /// The empty-remainder matcher.
    NoArgs,
    /// A floating-point number.
    Numeric,
    /// A `<number><unit>` interval.
    Interval,
    /// A single free-text token.
    Text,
    /// The consume-all-remaining-tokens matcher.
    Following,
    /// A closed label set, folded.
    Switch(Vec<String>),
    /// A page selector.
    Page,
    /// An absolute URL.
    Url,
    /// An optional wrapper around another kind.
    Optional(Box<MatcherKind>),
    /// A matcher outside the built-in catalogue.
    Custom,
}

impl MatcherKind {
    /// Whether a node with this matcher may have children appended.
    /// Terminal matchers (those that decide the end of the token stream)
    /// return false.
    pub fn is_extendable(&self) -> bool {
        match self {
            MatcherKind::NoArgs | MatcherKind::Following => false,
            MatcherKind::Optional(inner) => inner.is_extendable(),
            _ => true,
        }
    }

    /// Whether two matchers of these kinds may be direct siblings.
    ///
    /// Rejected pairs are those no input could ever disambiguate: two
    /// empty-remainder placeholders, two catch-alls, literals with the same
    /// folded label, switches with intersecting label sets, and a switch
    /// containing a sibling literal's label. Optional wrappers are judged by
    /// their inner kind.
    pub fn coexists_with(&self, other: &MatcherKind) -> bool {
        match (self.unwrapped(), other.unwrapped()) {
            (MatcherKind::NoArgs, MatcherKind::NoArgs) => false,
            (MatcherKind::Following, MatcherKind::Following) => false,
            (MatcherKind::Literal(a), MatcherKind::Literal(b)) => a != b,
            (MatcherKind::Switch(a), MatcherKind::Switch(b)) => {
                a.iter().all(|label| !b.contains(label))
            }
            (MatcherKind::Switch(labels), MatcherKind::Literal(label))
            | (MatcherKind::Literal(label), MatcherKind::Switch(labels)) => {
                !labels.contains(label)
            }
            _ => true,
        }
    }

    fn unwrapped(&self) -> &MatcherKind {
        match self {
            MatcherKind::Optional(inner) => inner.unwrapped(),
            kind => kind,
        }
    }
}

/// Matches one token that equals the label, case-insensitively, and appends
/// the canonical label rather than the raw token.
#[derive(Debug, Clone)]
pub struct Literal {
    label: String,
}

impl Literal {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl<C> Matcher<C> for Literal {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::Literal(self.label.to_lowercase())
    }

    fn attempt(&self, state: &mut ResolutionState<'_, C>) -> Result<Priority, MatcherError> {
        let Some(token) = state.peek() else {
            return Ok(Priority::None);
        };
        if token.to_lowercase() != self.label.to_lowercase() {
            return Ok(Priority::None);
        }
        state.take();
        state.push_arg(ArgValue::Text(self.label.clone()));
        Ok(Priority::High)
    }
}

/// Matches only when no tokens remain. Terminal: refuses children and
/// refuses a second `NoArgs` sibling.
#[derive(Debug, Clone, Copy)]
pub struct NoArgs;

impl<C> Matcher<C> for NoArgs {
    fn describe(&self) -> String {
        "(none)".to_string()
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::NoArgs
    }

    fn attempt(&self, state: &mut ResolutionState<'_, C>) -> Result<Priority, MatcherError> {
        if state.is_exhausted() {
            Ok(Priority::High)
        } else {
            Ok(Priority::None)
        }
    }
}

/// Matches one token that parses as a floating-point number.
#[derive(Debug, Clone, Copy)]
pub struct Numeric;

impl<C> Matcher<C> for Numeric {
    fn describe(&self) -> String {
        "[#]".to_string()
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::Numeric
    }

    fn attempt(&self, state: &mut ResolutionState<'_, C>) -> Result<Priority, MatcherError> {
        let Some(token) = state.peek() else {
            return Ok(Priority::None);
        };
        let Ok(value) = token.parse::<f64>() else {
            return Ok(Priority::None);
        };
        state.take();
        state.push_arg(ArgValue::Number(value));
        Ok(Priority::High)
    }
}

/// Matches one token of the form `<number><unit>` and appends the value in
/// milliseconds.
///
/// Accepted units: `s`/`sec`/`second`, `m`/`min`/`minute`, `h`/`hr`/`hour`,
/// `d`/`dy`/`day`, `w`/`wk`/`week`, case-insensitively. An unknown unit or
/// an unparsable number rejects without consuming.
///
/// # Examples
///
/// ```
/// use command_chain_core::{ArgValue, Interval, Matcher, ResolutionState};
///
/// let mut state = ResolutionState::new(&["2m"], &());
/// Interval.attempt(&mut state).unwrap();
/// assert_eq!(state.args(), &[ArgValue::Number(120_000.0)]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Interval;

impl Interval {
    fn unit_millis(unit: &str) -> Option<f64> {
        let seconds = match unit {
            "s" | "sec" | "second" => 1.0,
            "m" | "min" | "minute" => 60.0,
            "h" | "hr" | "hour" => 3_600.0,
            "d" | "dy" | "day" => 86_400.0,
            "w" | "wk" | "week" => 604_800.0,
            _ => return None,
        };
        Some(seconds * 1_000.0)
    }
}

impl<C> Matcher<C> for Interval {
    fn describe(&self) -> String {
        "[interval]".to_string()
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::Interval
    }

    fn attempt(&self, state: &mut ResolutionState<'_, C>) -> Result<Priority, MatcherError> {
        let Some(token) = state.peek() else {
            return Ok(Priority::None);
        };
        let Some(caps) = INTERVAL_TOKEN.captures(token) else {
            return Ok(Priority::None);
        };
        let Ok(number) = caps[1].parse::<f64>() else {
            return Ok(Priority::None);
        };
        let Some(multiplier) = Self::unit_millis(&caps[2].to_ascii_lowercase()) else {
            return Ok(Priority::None);
        };
        state.take();
        state.push_arg(ArgValue::Number(number * multiplier));
        Ok(Priority::High)
    }
}

/// Matches any one token as free text. The generic fallback, reporting
/// [`Priority::Low`] so any more specific sibling wins.
#[derive(Debug, Clone)]
pub struct Text {
    name: String,
}

impl Text {
    /// `name` is the display name used in help output, e.g. `"note"` renders
    /// as `[note]`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<C> Matcher<C> for Text {
    fn describe(&self) -> String {
        format!("[{}]", self.name)
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::Text
    }

    fn attempt(&self, state: &mut ResolutionState<'_, C>) -> Result<Priority, MatcherError> {
        match state.take() {
            Some(token) => {
                state.push_arg(ArgValue::Text(token));
                Ok(Priority::Low)
            }
            None => Ok(Priority::None),
        }
    }
}

/// Consumes every remaining token, joined with single spaces, as one value.
/// Always matches, even an empty remainder (appending `""`). Terminal.
#[derive(Debug, Clone, Copy)]
pub struct Following;

impl<C> Matcher<C> for Following {
    fn describe(&self) -> String {
        "[text...]".to_string()
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::Following
    }

    fn attempt(&self, state: &mut ResolutionState<'_, C>) -> Result<Priority, MatcherError> {
        let rest = state.take_rest();
        state.push_arg(ArgValue::Text(rest.join(" ")));
        Ok(Priority::Low)
    }
}

/// Matches one token against a fixed closed label set, case-insensitively,
/// and appends the canonical matched label.
#[derive(Debug, Clone)]
pub struct Switch {
    labels: Vec<String>,
}

impl Switch {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

impl<C> Matcher<C> for Switch {
    fn describe(&self) -> String {
        format!("({})", self.labels.join("|"))
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::Switch(self.labels.iter().map(|l| l.to_lowercase()).collect())
    }

    fn attempt(&self, state: &mut ResolutionState<'_, C>) -> Result<Priority, MatcherError> {
        let Some(token) = state.peek() else {
            return Ok(Priority::None);
        };
        let folded = token.to_lowercase();
        let Some(canonical) = self
            .labels
            .iter()
            .find(|label| label.to_lowercase() == folded)
            .cloned()
        else {
            return Ok(Priority::None);
        };
        state.take();
        state.push_arg(ArgValue::Text(canonical));
        Ok(Priority::High)
    }
}

/// Matches a page selector.
///
/// With no token remaining it appends page 1. A present token must be
/// `page:N` or `p:N` (case-insensitive) with an integer `N`; anything else
/// rejects without consuming.
#[derive(Debug, Clone, Copy)]
pub struct Page;

impl<C> Matcher<C> for Page {
    fn describe(&self) -> String {
        "[Page:#]".to_string()
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::Page
    }

    fn attempt(&self, state: &mut ResolutionState<'_, C>) -> Result<Priority, MatcherError> {
        let Some(token) = state.peek() else {
            state.push_arg(ArgValue::Page(1));
            return Ok(Priority::High);
        };
        let Some(caps) = PAGE_TOKEN.captures(token) else {
            return Ok(Priority::None);
        };
        let Ok(page) = caps[1].parse::<u64>() else {
            return Ok(Priority::None);
        };
        state.take();
        state.push_arg(ArgValue::Page(page));
        Ok(Priority::High)
    }
}

/// Matches one token that parses as an absolute, well-formed URL and appends
/// the normalized form.
#[derive(Debug, Clone, Copy)]
pub struct Url;

impl<C> Matcher<C> for Url {
    fn describe(&self) -> String {
        "[url]".to_string()
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::Url
    }

    fn attempt(&self, state: &mut ResolutionState<'_, C>) -> Result<Priority, MatcherError> {
        let Some(token) = state.peek() else {
            return Ok(Priority::None);
        };
        let Ok(parsed) = url::Url::parse(token) else {
            return Ok(Priority::None);
        };
        state.take();
        state.push_arg(ArgValue::Url(String::from(parsed)));
        Ok(Priority::High)
    }
}

/// Wraps any matcher to make it non-blocking.
///
/// Delegates to the inner matcher. If the inner matcher rejects *and*
/// consumed nothing, the wrapper appends `default` instead and reports
/// [`Priority::Low`]; any other result passes through unchanged.
///
/// # Examples
///
/// ```
/// use command_chain_core::{ArgValue, Matcher, Optional, Priority, ResolutionState, Text};
///
/// let matcher = Optional::new(Text::new("x"), "default");
/// let mut state = ResolutionState::new(&[] as &[&str], &());
/// assert_eq!(matcher.attempt(&mut state).unwrap(), Priority::Low);
/// assert_eq!(state.args(), &[ArgValue::Text("default".into())]);
/// ```
pub struct Optional<C> {
    inner: Box<dyn Matcher<C>>,
    default: ArgValue,
}

impl<C> Optional<C> {
    pub fn new(inner: impl Matcher<C> + 'static, default: impl Into<ArgValue>) -> Self {
        Self {
            inner: Box::new(inner),
            default: default.into(),
        }
    }
}

impl<C> Matcher<C> for Optional<C> {
    fn describe(&self) -> String {
        format!("{}?", self.inner.describe())
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::Optional(Box::new(self.inner.kind()))
    }

    fn attempt(&self, state: &mut ResolutionState<'_, C>) -> Result<Priority, MatcherError> {
        let before = state.remaining();
        match self.inner.attempt(state)? {
            Priority::None if state.remaining() == before => {
                state.push_arg(self.default.clone());
                Ok(Priority::Low)
            }
            priority => Ok(priority),
        }
    }
}
