use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::achievements::Achievement;
use super::applications::ApplicationCounters;
use super::completion::{self, CompletionCategory};
use super::domain::{ProfileData, UserId, UserProgress, XP_PER_LEVEL};
use super::skills::SkillLevel;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub user_id: UserId,
    pub profile_completion: u8,
    pub profile_views: u32,
    pub response_rate: u8,
    pub applications: ApplicationCounters,
    pub total_connections: u32,
    pub connections_by_type: BTreeMap<String, u32>,
    pub achievements_earned: usize,
    pub learning_level: u32,
    pub total_xp: u64,
    pub last_active: DateTime<Utc>,
}

impl From<&UserProgress> for AnalyticsSummary {
    fn from(progress: &UserProgress) -> Self {
        Self {
            user_id: progress.user_id.clone(),
            profile_completion: progress.profile_completion,
            profile_views: progress.analytics.profile_views,
            response_rate: progress.analytics.response_rate,
            applications: progress.applications.clone(),
            total_connections: progress.network_stats.total_connections,
            connections_by_type: progress.network_stats.connections_by_type.clone(),
            achievements_earned: progress.achievements.len(),
            learning_level: progress.learning_stats.level,
            total_xp: progress.learning_stats.total_xp,
            last_active: progress.analytics.last_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub user_id: UserId,
    pub profile: ProfileData,
    pub profile_completion: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_sections: Vec<CompletionCategory>,
    pub achievements: Vec<Achievement>,
    pub level: u32,
}

impl From<&UserProgress> for ProfileSummary {
    fn from(progress: &UserProgress) -> Self {
        Self {
            user_id: progress.user_id.clone(),
            profile: progress.profile_data.clone(),
            profile_completion: progress.profile_completion,
            missing_sections: completion::breakdown(&progress.profile_data).missing(),
            achievements: progress.achievements.clone(),
            level: progress.learning_stats.level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub skill_id: String,
    pub level: SkillLevel,
    pub level_label: &'static str,
    pub progress: u8,
    pub completed_lessons: u32,
    pub total_lessons: u32,
    pub last_accessed: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsSummary {
    pub skills: Vec<SkillEntry>,
    pub total_xp: u64,
    pub level: u32,
    pub xp_to_next_level: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub lessons_completed: u32,
    pub courses_completed: u32,
}

impl From<&UserProgress> for SkillsSummary {
    fn from(progress: &UserProgress) -> Self {
        let stats = &progress.learning_stats;
        let skills = progress
            .skills_progress
            .iter()
            .map(|(skill_id, record)| SkillEntry {
                skill_id: skill_id.clone(),
                level: record.level,
                level_label: record.level.label(),
                progress: record.progress,
                completed_lessons: record.completed_lessons,
                total_lessons: record.total_lessons,
                last_accessed: record.last_accessed,
            })
            .collect();

        Self {
            skills,
            total_xp: stats.total_xp,
            level: stats.level,
            xp_to_next_level: XP_PER_LEVEL - stats.total_xp % XP_PER_LEVEL,
            current_streak: stats.current_streak,
            longest_streak: stats.longest_streak,
            lessons_completed: stats.lessons_completed,
            courses_completed: stats.courses_completed,
        }
    }
}
