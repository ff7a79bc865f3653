use std::fmt;

use chrono::{DateTime, Utc};

use super::super::domain::UserProgress;
use super::{Achievement, AchievementKind, Trigger, TriggerContext};

pub type RuleCondition = fn(&UserProgress, &TriggerContext) -> bool;

const SKILL_PLACEHOLDER: &str = "{skill}";

/// How a rule derives the id it grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleId {
    Fixed(&'static str),
    /// `{prefix}{skill_id}`, only resolvable for skill triggers.
    PerSkill(&'static str),
}

impl RuleId {
    pub fn resolve(&self, context: &TriggerContext) -> Option<String> {
        match self {
            RuleId::Fixed(id) => Some((*id).to_string()),
            RuleId::PerSkill(prefix) => context
                .skill_id()
                .map(|skill_id| format!("{prefix}{skill_id}")),
        }
    }
}

/// One condition→grant pair. `{skill}` in title or description is replaced by
/// the triggering skill id.
#[derive(Clone)]
pub struct AchievementRule {
    pub trigger: Trigger,
    pub id: RuleId,
    pub kind: AchievementKind,
    pub title: &'static str,
    pub description: &'static str,
    pub condition: RuleCondition,
}

impl fmt::Debug for AchievementRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AchievementRule")
            .field("trigger", &self.trigger)
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl AchievementRule {
    pub fn new(
        trigger: Trigger,
        id: RuleId,
        kind: AchievementKind,
        title: &'static str,
        description: &'static str,
        condition: RuleCondition,
    ) -> Self {
        Self {
            trigger,
            id,
            kind,
            title,
            description,
            condition,
        }
    }

    pub(super) fn grant(
        &self,
        id: String,
        context: &TriggerContext,
        now: DateTime<Utc>,
    ) -> Achievement {
        let skill = context.skill_id().unwrap_or_default();
        Achievement {
            id,
            kind: self.kind,
            title: self.title.replace(SKILL_PLACEHOLDER, skill),
            description: self.description.replace(SKILL_PLACEHOLDER, skill),
            earned_at: now,
        }
    }
}

fn completion_at_least_50(progress: &UserProgress, _: &TriggerContext) -> bool {
    progress.profile_completion >= 50
}

fn completion_at_least_90(progress: &UserProgress, _: &TriggerContext) -> bool {
    progress.profile_completion >= 90
}

fn five_skills_listed(progress: &UserProgress, _: &TriggerContext) -> bool {
    progress.profile_data.skills.len() >= 5
}

fn skill_finished(progress: &UserProgress, context: &TriggerContext) -> bool {
    context
        .skill_id()
        .and_then(|skill_id| progress.skills_progress.get(skill_id))
        .map(|skill| skill.progress >= 100)
        .unwrap_or(false)
}

fn week_long_streak(progress: &UserProgress, _: &TriggerContext) -> bool {
    progress.learning_stats.current_streak >= 7
}

fn first_application(progress: &UserProgress, _: &TriggerContext) -> bool {
    progress.applications.total == 1
}

fn ten_applications(progress: &UserProgress, _: &TriggerContext) -> bool {
    progress.applications.total >= 10
}

fn first_acceptance(progress: &UserProgress, _: &TriggerContext) -> bool {
    progress.applications.accepted >= 1
}

fn five_connections(progress: &UserProgress, _: &TriggerContext) -> bool {
    progress.network_stats.total_connections >= 5
}

fn twenty_five_connections(progress: &UserProgress, _: &TriggerContext) -> bool {
    progress.network_stats.total_connections >= 25
}

/// Built-in achievement table.
pub fn default_rules() -> Vec<AchievementRule> {
    vec![
        AchievementRule::new(
            Trigger::ProfileUpdated,
            RuleId::Fixed("profile-50"),
            AchievementKind::Milestone,
            "Profile Halfway",
            "Completed 50% of your profile",
            completion_at_least_50,
        ),
        AchievementRule::new(
            Trigger::ProfileUpdated,
            RuleId::Fixed("profile-90"),
            AchievementKind::Achievement,
            "Profile Pro",
            "Completed 90% of your profile",
            completion_at_least_90,
        ),
        AchievementRule::new(
            Trigger::ProfileUpdated,
            RuleId::Fixed("skills-5"),
            AchievementKind::Skill,
            "Skill Collector",
            "Added 5 skills to your profile",
            five_skills_listed,
        ),
        AchievementRule::new(
            Trigger::SkillUpdated,
            RuleId::PerSkill("skill-complete-"),
            AchievementKind::Skill,
            "Skill Mastered",
            "Completed every lesson in {skill}",
            skill_finished,
        ),
        AchievementRule::new(
            Trigger::SkillUpdated,
            RuleId::Fixed("streak-7"),
            AchievementKind::Achievement,
            "Week Warrior",
            "Kept a 7 day learning streak",
            week_long_streak,
        ),
        AchievementRule::new(
            Trigger::ApplicationAdded,
            RuleId::Fixed("first-app"),
            AchievementKind::Milestone,
            "First Step",
            "Sent your first application",
            first_application,
        ),
        AchievementRule::new(
            Trigger::ApplicationAdded,
            RuleId::Fixed("app-10"),
            AchievementKind::Achievement,
            "Go Getter",
            "Sent 10 applications",
            ten_applications,
        ),
        AchievementRule::new(
            Trigger::ApplicationAdded,
            RuleId::Fixed("first-accept"),
            AchievementKind::Achievement,
            "Offer Received",
            "Got your first acceptance",
            first_acceptance,
        ),
        AchievementRule::new(
            Trigger::ConnectionAdded,
            RuleId::Fixed("network-5"),
            AchievementKind::Social,
            "Networker",
            "Made 5 connections",
            five_connections,
        ),
        AchievementRule::new(
            Trigger::ConnectionAdded,
            RuleId::Fixed("network-25"),
            AchievementKind::Social,
            "Super Connector",
            "Made 25 connections",
            twenty_five_connections,
        ),
    ]
}
