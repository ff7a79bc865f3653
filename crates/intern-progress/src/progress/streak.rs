use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::LearningStats;

/// Effect of one learning activity on the streak counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    SameDay,
    Extended,
    Restarted,
}

/// Update the streak for a learning activity at `now`, by UTC calendar day.
pub fn record_learning_activity(stats: &mut LearningStats, now: DateTime<Utc>) -> StreakChange {
    let today = now.date_naive();
    let last_day = stats
        .last_learning_activity
        .map(|timestamp| timestamp.date_naive());

    let change = match last_day {
        Some(day) if day == today => StreakChange::SameDay,
        Some(day) if day.succ_opt() == Some(today) => StreakChange::Extended,
        _ => StreakChange::Restarted,
    };

    match change {
        StreakChange::SameDay => {}
        StreakChange::Extended => {
            stats.current_streak = stats.current_streak.saturating_add(1);
            stats.last_learning_activity = Some(now);
        }
        StreakChange::Restarted => {
            stats.current_streak = 1;
            stats.last_learning_activity = Some(now);
        }
    }

    stats.longest_streak = stats.longest_streak.max(stats.current_streak);
    change
}
