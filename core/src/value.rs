//! Parsed-argument values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value appended to the parsed-argument list by a successful matcher.
///
/// Handlers receive these in chain order once resolution has picked a unique
/// winning leaf. The variants mirror what the matcher catalogue produces:
/// literals, switches, and free text append [`Text`](ArgValue::Text), numeric
/// and interval matchers append [`Number`](ArgValue::Number) (intervals in
/// milliseconds), page selectors append [`Page`](ArgValue::Page), and URL
/// matchers append [`Url`](ArgValue::Url).
///
/// # Examples
///
/// ```
/// use command_chain_core::ArgValue;
///
/// let args = vec![ArgValue::Text("set".into()), ArgValue::Number(42.0)];
/// assert_eq!(args[0].as_text(), Some("set"));
/// assert_eq!(args[1].as_number(), Some(42.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    /// A textual value (canonical literal, switch label, or free text).
    Text(String),
    /// A floating-point value; intervals are expressed in milliseconds.
    Number(f64),
    /// A page selector.
    Page(u64),
    /// An absolute URL, normalized by parsing.
    Url(String),
}

impl ArgValue {
    /// Returns the text if this is a [`Text`](ArgValue::Text) value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a [`Number`](ArgValue::Number) value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the page if this is a [`Page`](ArgValue::Page) value.
    pub fn as_page(&self) -> Option<u64> {
        match self {
            ArgValue::Page(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the URL if this is a [`Url`](ArgValue::Url) value.
    pub fn as_url(&self) -> Option<&str> {
        match self {
            ArgValue::Url(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Text(s) => f.write_str(s),
            ArgValue::Number(n) => write!(f, "{n}"),
            ArgValue::Page(n) => write!(f, "page:{n}"),
            ArgValue::Url(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Text(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Text(s)
    }
}

impl From<f64> for ArgValue {
    fn from(n: f64) -> Self {
        ArgValue::Number(n)
    }
}

impl From<u64> for ArgValue {
    fn from(n: u64) -> Self {
        ArgValue::Page(n)
    }
}
