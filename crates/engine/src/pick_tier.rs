//! Progressive disclosure of picks
//!
//! New users see several options at once; as they engage the engine narrows
//! down to a single confident pick. The reduction is a one-way ratchet: the
//! caller persists the lowest tier reached and the count never grows back.

use serde::{Deserialize, Serialize};

/// Pick count before any engagement
pub const MAX_PICKS: u8 = 5;

/// (minimum points, picks) from the highest tier down
const TIERS: [(u32, u8); 5] = [(160, 1), (100, 2), (50, 3), (20, 4), (0, 5)];

/// Raw picks for cumulative engagement points
pub fn pick_count(points: u32) -> u8 {
    TIERS
        .iter()
        .find(|(min_points, _)| points >= *min_points)
        .map_or(MAX_PICKS, |(_, picks)| *picks)
}

/// Persisted ratchet state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRatchet {
    /// Smallest pick count handed out so far
    pub max_tier_reached: u8,
}

impl Default for TierRatchet {
    fn default() -> Self {
        Self {
            max_tier_reached: MAX_PICKS,
        }
    }
}

impl TierRatchet {
    /// Effective pick count for `points` plus the ratchet to persist
    pub fn advance(self, points: u32) -> (u8, TierRatchet) {
        let effective = pick_count(points).min(self.max_tier_reached).max(1);
        (
            effective,
            TierRatchet {
                max_tier_reached: effective,
            },
        )
    }
}
