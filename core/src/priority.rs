//! Match confidence tiers.

use serde::{Deserialize, Serialize};

/// Confidence tier a matcher reports for an attempted match.
///
/// The derived ordering is `None < Low < High`, which is what the resolver
/// relies on for per-round pruning and completion dominance: a more specific
/// acceptance anywhere in a round always beats a generic one.
///
/// - [`None`](Priority::None) — the branch is dead; the matcher rejected.
/// - [`Low`](Priority::Low) — a generic or fallback acceptance (an opaque
///   string, a supplied default, a catch-all).
/// - [`High`](Priority::High) — a specific, confident acceptance (an exact
///   literal, a parseable typed value, a closed-set switch match).
///
/// # Examples
///
/// ```
/// use command_chain_core::Priority;
///
/// assert!(Priority::None < Priority::Low);
/// assert!(Priority::Low < Priority::High);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Priority {
    /// The matcher rejected; the branch is dead.
    #[default]
    None,
    /// Generic/fallback acceptance.
    Low,
    /// Specific, confident acceptance.
    High,
}

impl Priority {
    /// Whether this priority keeps its branch alive.
    pub fn is_match(self) -> bool {
        self != Priority::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Low);
        assert!(Priority::Low > Priority::None);
        assert_eq!(
            [Priority::Low, Priority::High, Priority::None]
                .into_iter()
                .max(),
            Some(Priority::High)
        );
    }

    #[test]
    fn test_priority_is_match() {
        assert!(!Priority::None.is_match());
        assert!(Priority::Low.is_match());
        assert!(Priority::High.is_match());
    }
}
