//! Search mode selection and term helpers.
//!
//! Lives in `core` so the repository layer and the HTTP layer agree on how a
//! raw `?q=&mode=` pair is interpreted.

use serde::{Deserialize, Serialize};

/// Which entity/field a search term is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Publication `name` or `description`.
    #[default]
    Publications,
    /// Name of the owning vendor (publications without a vendor never match).
    Vendors,
    /// Publication `category`.
    Categories,
}

impl SearchMode {
    /// Interpret a raw mode selector. Unknown or absent values fall back to
    /// [`SearchMode::Publications`].
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("vendors") => Self::Vendors,
            Some("categories") => Self::Categories,
            _ => Self::Publications,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publications => "publications",
            Self::Vendors => "vendors",
            Self::Categories => "categories",
        }
    }
}

/// Trim a raw term; `None` when nothing searchable remains.
pub fn normalize_term(raw: &str) -> Option<&str> {
    let term = raw.trim();
    if term.is_empty() {
        None
    } else {
        Some(term)
    }
}

/// Case-insensitive substring matcher for one search term.
///
/// Both sides are folded with full Unicode lower-casing, so "CAFÉ" matches
/// "café" and "Ñandú" matches "ñandú". The term is matched literally: `%`
/// and `_` carry no wildcard meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatcher {
    needle: String,
}

impl TermMatcher {
    /// `None` when the term is blank.
    pub fn new(raw: &str) -> Option<Self> {
        normalize_term(raw).map(|term| Self {
            needle: term.to_lowercase(),
        })
    }

    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }

    /// Like [`TermMatcher::matches`]; an absent value never matches.
    pub fn matches_opt(&self, haystack: Option<&str>) -> bool {
        haystack.is_some_and(|text| self.matches(text))
    }
}
