//! Tag and free-text filter over the clip collection.
//!
//! # Invariants
//! - Tag matching is exact and case-sensitive; only the literal `All` matches
//!   every tag.
//! - Search text is trimmed and matched case-insensitively against content
//!   and tag (absent tag matches as the empty string).
//! - Output order equals input order.

use crate::model::clip::Clip;

/// Tag filter value that matches every clip.
pub const ALL_TAGS: &str = "All";

/// Selection criteria for `ClipStore::query`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipFilter {
    /// Exact tag to match; `None`, `""`, or `All` disables tag filtering.
    pub tag: Option<String>,
    /// Case-insensitive substring searched in content and tag.
    pub search_text: Option<String>,
}

impl ClipFilter {
    /// Filter that selects every clip.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Returns whether `clip` satisfies both the tag and the search rule.
    pub fn matches(&self, clip: &Clip) -> bool {
        let needle = self.normalized_search();
        self.selects(clip, needle.as_deref())
    }

    /// Applies the filter, preserving collection order.
    pub fn apply<'a, I>(&self, clips: I) -> Vec<Clip>
    where
        I: IntoIterator<Item = &'a Clip>,
    {
        let needle = self.normalized_search();
        clips
            .into_iter()
            .filter(|clip| self.selects(clip, needle.as_deref()))
            .cloned()
            .collect()
    }

    fn selects(&self, clip: &Clip, needle: Option<&str>) -> bool {
        self.matches_tag(clip) && matches_search(clip, needle)
    }

    fn matches_tag(&self, clip: &Clip) -> bool {
        match self.tag.as_deref() {
            None | Some("") | Some(ALL_TAGS) => true,
            Some(tag) => clip.tag() == Some(tag),
        }
    }

    fn normalized_search(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase)
    }
}

fn matches_search(clip: &Clip, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    clip.content().to_lowercase().contains(needle)
        || clip.tag().unwrap_or("").to_lowercase().contains(needle)
}
