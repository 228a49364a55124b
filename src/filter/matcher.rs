//! Line-item key matching.

use crate::config::KeyMatchMode;

/// Decides whether a line item's key refers to a component key.
///
/// Both comparisons ignore ASCII case. `Contains` accepts a line key that
/// contains the component key anywhere, which tolerates decorated keys but
/// also matches an unrelated key that happens to contain a shorter one
/// (`POLE-8` matches component `POLE`). Empty keys never match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyMatcher {
    mode: KeyMatchMode,
}

impl KeyMatcher {
    #[must_use]
    pub const fn new(mode: KeyMatchMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub fn matches(&self, line_key: &str, component_key: &str) -> bool {
        self.matches_normalized(&normalize(line_key), &normalize(component_key))
    }

    /// Compare keys already passed through [`normalize`].
    #[must_use]
    pub fn matches_normalized(&self, line_key: &str, component_key: &str) -> bool {
        if line_key.is_empty() || component_key.is_empty() {
            return false;
        }
        match self.mode {
            KeyMatchMode::Contains => line_key.contains(component_key),
            KeyMatchMode::Exact => line_key == component_key,
        }
    }
}

/// Trim and lowercase a key for matching.
#[must_use]
pub fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}
