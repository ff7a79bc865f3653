//! User progress tracking: profile completion, achievements, skill learning,
//! streaks, and application counters behind a per-user session façade.

pub mod achievements;
pub mod applications;
pub mod clock;
pub mod completion;
pub mod domain;
pub mod registry;
pub mod repository;
pub mod service;
pub mod skills;
pub mod streak;
mod validation;
pub mod views;

#[cfg(test)]
mod tests;

pub use achievements::{Achievement, AchievementKind, AchievementRule, RuleSet, TriggerContext};
pub use applications::{ApplicationCounters, ApplicationStatus, NewApplication};
pub use clock::{Clock, ManualClock, SystemClock};
pub use completion::{CompletionBreakdown, CompletionCategory};
pub use domain::{
    LearningStats, NetworkStats, Preferences, PreferencesUpdate, ProfileData, ProfileUpdate,
    UserId, UserProgress,
};
pub use registry::SessionRegistry;
pub use repository::{ProgressStore, StoreError};
pub use service::{ProgressError, ProgressService, Session};
pub use skills::{SkillLevel, SkillProgress};
pub use streak::StreakChange;
pub use validation::ValidationError;
pub use views::{AnalyticsSummary, ProfileSummary, SkillEntry, SkillsSummary};
