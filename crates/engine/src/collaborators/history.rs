//! Folding the interaction log into per-user state

use chrono::{DateTime, Duration, Utc};
use goodwatch_core::{
    normalize_platform, FeedbackAction, InteractionEvent, InteractionKind, MaturityInfo,
    PlatformStats,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Tags that count as an explicit documentary or kids pick
const DOCUMENTARY_OR_KIDS_TAGS: [&str; 2] = ["documentary", "kids"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminal {
    Seen,
    Rejected,
    Abandoned,
}

/// What the engine needs from a user's interaction log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionHistory {
    pub seen: BTreeSet<String>,
    pub rejected: BTreeSet<String>,
    pub abandoned: BTreeSet<String>,
    /// Last time each item was put in front of the user
    pub recently_shown: BTreeMap<String, DateTime<Utc>>,
    pub maturity: MaturityInfo,
    pub platform_stats: BTreeMap<String, PlatformStats>,
}

impl InteractionHistory {
    /// Fold events in order of occurrence
    ///
    /// The latest terminal reaction (accepted, not tonight, abandoned)
    /// decides which set an id lands in, so the three sets stay disjoint.
    /// Acceptances count once per item toward platform stats and maturity.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a InteractionEvent>) -> Self {
        let mut ordered: Vec<&InteractionEvent> = events.into_iter().collect();
        ordered.sort_by_key(|e| e.occurred_at);

        let mut history = Self::default();
        let mut terminal: BTreeMap<String, Terminal> = BTreeMap::new();
        let mut accepted: BTreeSet<String> = BTreeSet::new();

        for event in ordered {
            match event.kind {
                InteractionKind::Shown => {
                    for platform in &event.platforms {
                        history
                            .platform_stats
                            .entry(normalize_platform(platform))
                            .or_default()
                            .shown += 1;
                    }
                    history.touch(event);
                }
                InteractionKind::Feedback(action) => match action {
                    FeedbackAction::WatchNow | FeedbackAction::Completed => {
                        terminal.insert(event.item_id.clone(), Terminal::Seen);
                        if accepted.insert(event.item_id.clone()) {
                            history.record_acceptance(event);
                        }
                    }
                    FeedbackAction::NotTonight => {
                        terminal.insert(event.item_id.clone(), Terminal::Rejected);
                    }
                    FeedbackAction::Abandoned => {
                        terminal.insert(event.item_id.clone(), Terminal::Abandoned);
                    }
                    FeedbackAction::ShowMeAnother | FeedbackAction::ImplicitSkip => {
                        history.touch(event);
                    }
                },
            }
        }

        for (item_id, class) in terminal {
            match class {
                Terminal::Seen => history.seen.insert(item_id),
                Terminal::Rejected => history.rejected.insert(item_id),
                Terminal::Abandoned => history.abandoned.insert(item_id),
            };
        }

        history
    }

    /// Ids shown within `window` before `now`
    pub fn shown_within(&self, now: DateTime<Utc>, window: Duration) -> BTreeSet<String> {
        self.recently_shown
            .iter()
            .filter(|(_, at)| now.signed_duration_since(**at) <= window)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn touch(&mut self, event: &InteractionEvent) {
        let last = self
            .recently_shown
            .entry(event.item_id.clone())
            .or_insert(event.occurred_at);
        if event.occurred_at > *last {
            *last = event.occurred_at;
        }
    }

    fn record_acceptance(&mut self, event: &InteractionEvent) {
        for platform in &event.platforms {
            self.platform_stats
                .entry(normalize_platform(platform))
                .or_default()
                .accepted += 1;
        }
        self.maturity.accepted_and_watched += 1;
        if event
            .tags
            .iter()
            .any(|t| DOCUMENTARY_OR_KIDS_TAGS.contains(&t.as_str()))
        {
            self.maturity.has_documentary_or_kids_pick = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn event(item: &str, kind: InteractionKind, minute: u32) -> InteractionEvent {
        InteractionEvent {
            user_id: Uuid::nil(),
            item_id: item.to_string(),
            kind,
            platforms: vec!["netflix".to_string()],
            tags: vec![],
            occurred_at: Utc.with_ymd_and_hms(2024, 3, 1, 20, minute, 0).unwrap(),
        }
    }

    fn feedback(item: &str, action: FeedbackAction, minute: u32) -> InteractionEvent {
        event(item, InteractionKind::Feedback(action), minute)
    }

    #[test]
    fn test_fold_sets() {
        let events = vec![
            event("a", InteractionKind::Shown, 0),
            feedback("a", FeedbackAction::WatchNow, 1),
            event("b", InteractionKind::Shown, 2),
            feedback("b", FeedbackAction::NotTonight, 3),
            event("c", InteractionKind::Shown, 4),
            feedback("c", FeedbackAction::WatchNow, 5),
            feedback("c", FeedbackAction::Abandoned, 30),
            feedback("d", FeedbackAction::ShowMeAnother, 6),
        ];
        let history = InteractionHistory::from_events(&events);

        assert!(history.seen.contains("a"));
        assert!(history.rejected.contains("b"));
        assert!(history.abandoned.contains("c"));
        assert!(!history.seen.contains("c"));
        assert!(!history.seen.contains("d"));
        assert!(history.recently_shown.contains_key("d"));
    }

    #[test]
    fn test_platform_stats_and_maturity() {
        let mut doc = feedback("doc", FeedbackAction::Completed, 9);
        doc.tags = vec!["documentary".to_string()];
        let events = vec![
            event("a", InteractionKind::Shown, 0),
            feedback("a", FeedbackAction::WatchNow, 1),
            feedback("a", FeedbackAction::Completed, 50),
            event("b", InteractionKind::Shown, 2),
            event("doc", InteractionKind::Shown, 8),
            doc,
        ];
        let history = InteractionHistory::from_events(&events);

        let stats = history.platform_stats["netflix"];
        assert_eq!(stats.shown, 3);
        assert_eq!(stats.accepted, 2);
        assert_eq!(history.maturity.accepted_and_watched, 2);
        assert!(history.maturity.has_documentary_or_kids_pick);
    }

    #[test]
    fn test_platform_stats_merge_across_case() {
        let mut shown = event("a", InteractionKind::Shown, 0);
        shown.platforms = vec!["Netflix ".to_string()];
        let events = vec![shown, feedback("a", FeedbackAction::WatchNow, 1)];
        let history = InteractionHistory::from_events(&events);

        assert_eq!(history.platform_stats.len(), 1);
        assert_eq!(history.platform_stats["netflix"].shown, 1);
        assert_eq!(history.platform_stats["netflix"].accepted, 1);
    }

    #[test]
    fn test_order_independent_of_input_order() {
        let events = vec![
            feedback("a", FeedbackAction::Abandoned, 30),
            feedback("a", FeedbackAction::WatchNow, 1),
        ];
        let history = InteractionHistory::from_events(&events);
        assert!(history.abandoned.contains("a"));
        assert!(history.seen.is_empty());
    }

    #[test]
    fn test_shown_within_window() {
        let events = vec![
            event("old", InteractionKind::Shown, 0),
            event("new", InteractionKind::Shown, 50),
        ];
        let history = InteractionHistory::from_events(&events);
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 21, 0, 0).unwrap();

        let recent = history.shown_within(now, Duration::minutes(30));
        assert!(recent.contains("new"));
        assert!(!recent.contains("old"));
    }
}
