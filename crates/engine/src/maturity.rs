//! Family-content gating for new users

use goodwatch_core::{CatalogItem, MaturityInfo};

/// Tags that mark family/animation-class content
pub const FAMILY_CLASS_TAGS: [&str; 3] = ["family", "animation", "kids"];

/// Accepted-and-watched interactions after which a user counts as mature
pub const MATURITY_INTERACTIONS: u32 = 5;

pub struct ContentMaturityFilter;

impl ContentMaturityFilter {
    /// Withhold family content from users who have not shown interest in it
    ///
    /// A user is immature with fewer than five accepted-and-watched titles and
    /// no explicit documentary/kids pick.
    pub fn should_exclude(item: &CatalogItem, maturity: &MaturityInfo) -> bool {
        Self::is_family_class(item) && Self::is_immature(maturity)
    }

    pub fn is_family_class(item: &CatalogItem) -> bool {
        FAMILY_CLASS_TAGS.iter().any(|tag| item.has_tag(tag))
    }

    pub fn is_immature(maturity: &MaturityInfo) -> bool {
        maturity.accepted_and_watched < MATURITY_INTERACTIONS
            && !maturity.has_documentary_or_kids_pick
    }
}
