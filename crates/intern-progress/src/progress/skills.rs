use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::UserProgress;

pub const INTERMEDIATE_THRESHOLD: u8 = 40;
pub const ADVANCED_THRESHOLD: u8 = 80;
pub const MAX_PROGRESS: u8 = 100;
const XP_PER_PROGRESS_POINT: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProgress {
    pub level: SkillLevel,
    pub progress: u8,
    pub completed_lessons: u32,
    pub total_lessons: u32,
    pub last_accessed: DateTime<Utc>,
}

impl SkillProgress {
    pub fn new(total_lessons: u32, now: DateTime<Utc>) -> Self {
        Self {
            level: SkillLevel::Beginner,
            progress: 0,
            completed_lessons: 0,
            total_lessons,
            last_accessed: now,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= MAX_PROGRESS
    }
}

/// What a single skill update changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillUpdateOutcome {
    pub progress: u8,
    pub completed_lessons: u32,
    pub level: SkillLevel,
    pub xp_gained: u64,
    pub lessons_gained: u32,
}

/// Apply a progress report for `skill_id`. Progress and lesson counts only ever
/// move forward; XP is earned on the forward delta.
pub(crate) fn apply_skill_update(
    progress: &mut UserProgress,
    skill_id: &str,
    incoming_progress: u8,
    incoming_lessons: u32,
    default_total_lessons: u32,
    now: DateTime<Utc>,
) -> SkillUpdateOutcome {
    let record = progress
        .skills_progress
        .entry(skill_id.to_string())
        .or_insert_with(|| SkillProgress::new(default_total_lessons, now));

    let previous_progress = record.progress;
    let previous_lessons = record.completed_lessons;

    record.progress = record.progress.max(incoming_progress.min(MAX_PROGRESS));
    record.completed_lessons = record.completed_lessons.max(incoming_lessons);
    record.last_accessed = now;

    if record.progress >= ADVANCED_THRESHOLD {
        record.level = SkillLevel::Advanced;
    } else if record.progress >= INTERMEDIATE_THRESHOLD {
        record.level = SkillLevel::Intermediate;
    }

    let xp_gained = u64::from(record.progress - previous_progress) * XP_PER_PROGRESS_POINT;
    let lessons_gained = record.completed_lessons - previous_lessons;

    let outcome = SkillUpdateOutcome {
        progress: record.progress,
        completed_lessons: record.completed_lessons,
        level: record.level,
        xp_gained,
        lessons_gained,
    };

    progress.learning_stats.add_xp(xp_gained);
    progress.learning_stats.lessons_completed = progress
        .learning_stats
        .lessons_completed
        .saturating_add(lessons_gained);

    outcome
}
