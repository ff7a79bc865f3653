mod rules;

pub use rules::{default_rules, AchievementRule, RuleCondition, RuleId};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::UserProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    Achievement,
    Skill,
    Milestone,
    Social,
}

impl AchievementKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Achievement => "achievement",
            Self::Skill => "skill",
            Self::Milestone => "milestone",
            Self::Social => "social",
        }
    }
}

/// Granted achievement. `id` is unique within one user's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AchievementKind,
    pub title: String,
    pub description: String,
    pub earned_at: DateTime<Utc>,
}

/// Mutation that just happened, used to select which rules run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerContext {
    ProfileUpdated,
    SkillUpdated(String),
    ApplicationAdded,
    ConnectionAdded,
}

impl TriggerContext {
    pub fn trigger(&self) -> Trigger {
        match self {
            Self::ProfileUpdated => Trigger::ProfileUpdated,
            Self::SkillUpdated(_) => Trigger::SkillUpdated,
            Self::ApplicationAdded => Trigger::ApplicationAdded,
            Self::ConnectionAdded => Trigger::ConnectionAdded,
        }
    }

    pub fn skill_id(&self) -> Option<&str> {
        match self {
            Self::SkillUpdated(skill_id) => Some(skill_id.as_str()),
            _ => None,
        }
    }
}

/// Payload-free discriminant of [`TriggerContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    ProfileUpdated,
    SkillUpdated,
    ApplicationAdded,
    ConnectionAdded,
}

/// Ordered rule table evaluated after each mutation.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<AchievementRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl RuleSet {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: AchievementRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[AchievementRule] {
        &self.rules
    }

    /// Grant every rule for this trigger whose condition holds and whose id the
    /// user does not hold yet. Granted records are appended to the snapshot and
    /// also returned.
    pub fn evaluate(
        &self,
        progress: &mut UserProgress,
        context: &TriggerContext,
        now: DateTime<Utc>,
    ) -> Vec<Achievement> {
        let trigger = context.trigger();
        let mut granted = Vec::new();

        for rule in self.rules.iter().filter(|rule| rule.trigger == trigger) {
            let Some(id) = rule.id.resolve(context) else {
                continue;
            };
            if progress.has_achievement(&id) || !(rule.condition)(progress, context) {
                continue;
            }

            let achievement = rule.grant(id, context, now);
            progress.achievements.push(achievement.clone());
            granted.push(achievement);
        }

        granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::domain::UserId;
    use crate::progress::skills::{SkillLevel, SkillProgress};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn progress() -> UserProgress {
        UserProgress::new(UserId::from("user-1"), "amira@example.com", now())
    }

    fn ids(achievements: &[Achievement]) -> Vec<&str> {
        achievements.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn profile_rules_fire_by_threshold() {
        let rules = RuleSet::default();
        let mut snapshot = progress();
        snapshot.profile_completion = 49;
        assert!(rules
            .evaluate(&mut snapshot, &TriggerContext::ProfileUpdated, now())
            .is_empty());

        snapshot.profile_completion = 95;
        let granted = rules.evaluate(&mut snapshot, &TriggerContext::ProfileUpdated, now());
        assert_eq!(ids(&granted), vec!["profile-50", "profile-90"]);
        assert_eq!(granted[0].kind, AchievementKind::Milestone);
        assert_eq!(granted[1].kind, AchievementKind::Achievement);
    }

    #[test]
    fn rules_never_fire_twice_for_the_same_id() {
        let rules = RuleSet::default();
        let mut snapshot = progress();
        snapshot.profile_completion = 100;

        rules.evaluate(&mut snapshot, &TriggerContext::ProfileUpdated, now());
        let second = rules.evaluate(&mut snapshot, &TriggerContext::ProfileUpdated, now());

        assert!(second.is_empty());
        assert_eq!(ids(&snapshot.achievements), vec!["profile-50", "profile-90"]);
    }

    #[test]
    fn rules_only_run_for_their_trigger() {
        let rules = RuleSet::default();
        let mut snapshot = progress();
        snapshot.profile_completion = 100;
        snapshot.network_stats.total_connections = 30;

        let granted = rules.evaluate(&mut snapshot, &TriggerContext::ApplicationAdded, now());
        assert!(granted.is_empty());

        let granted = rules.evaluate(&mut snapshot, &TriggerContext::ConnectionAdded, now());
        assert_eq!(ids(&granted), vec!["network-5", "network-25"]);
        assert!(granted
            .iter()
            .all(|achievement| achievement.kind == AchievementKind::Social));
    }

    #[test]
    fn skill_completion_ids_are_per_skill() {
        let rules = RuleSet::default();
        let mut snapshot = progress();
        for skill in ["rust", "sql"] {
            snapshot.skills_progress.insert(
                skill.to_string(),
                SkillProgress {
                    level: SkillLevel::Advanced,
                    progress: 100,
                    completed_lessons: 20,
                    total_lessons: 20,
                    last_accessed: now(),
                },
            );
        }

        let rust = rules.evaluate(
            &mut snapshot,
            &TriggerContext::SkillUpdated("rust".to_string()),
            now(),
        );
        let sql = rules.evaluate(
            &mut snapshot,
            &TriggerContext::SkillUpdated("sql".to_string()),
            now(),
        );

        assert_eq!(ids(&rust), vec!["skill-complete-rust"]);
        assert_eq!(ids(&sql), vec!["skill-complete-sql"]);
        assert!(rust[0].description.contains("rust"));
    }

    #[test]
    fn application_rules_follow_counters() {
        let rules = RuleSet::default();
        let mut snapshot = progress();
        snapshot.applications.total = 1;
        snapshot.applications.pending = 1;

        let granted = rules.evaluate(&mut snapshot, &TriggerContext::ApplicationAdded, now());
        assert_eq!(ids(&granted), vec!["first-app"]);

        snapshot.applications.total = 10;
        snapshot.applications.pending = 9;
        snapshot.applications.accepted = 1;
        let granted = rules.evaluate(&mut snapshot, &TriggerContext::ApplicationAdded, now());
        assert_eq!(ids(&granted), vec!["app-10", "first-accept"]);
    }

    #[test]
    fn custom_rules_extend_the_table() {
        fn has_remote_preference(progress: &UserProgress, _: &TriggerContext) -> bool {
            progress.preferences.remote_ok
        }

        let rules = RuleSet::empty().with_rule(AchievementRule::new(
            Trigger::ProfileUpdated,
            RuleId::Fixed("remote-ready"),
            AchievementKind::Milestone,
            "Remote Ready",
            "Open to remote internships",
            has_remote_preference,
        ));
        let mut snapshot = progress();
        snapshot.profile_completion = 100;
        assert!(rules
            .evaluate(&mut snapshot, &TriggerContext::ProfileUpdated, now())
            .is_empty());

        snapshot.preferences.remote_ok = true;
        let granted = rules.evaluate(&mut snapshot, &TriggerContext::ProfileUpdated, now());
        assert_eq!(ids(&granted), vec!["remote-ready"]);
        assert_eq!(granted[0].earned_at, now());
    }
}
