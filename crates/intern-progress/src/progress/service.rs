use std::sync::Arc;

use tracing::{debug, info, warn};

use super::achievements::{Achievement, RuleSet, TriggerContext};
use super::applications::{ApplicationStatus, NewApplication};
use super::clock::{Clock, SystemClock};
use super::completion;
use super::domain::{PreferencesUpdate, ProfileUpdate, UserId, UserProgress};
use super::repository::{ProgressStore, StoreError};
use super::skills::apply_skill_update;
use super::streak::record_learning_activity;
use super::validation::{non_blank, progress_percent, ValidationError};
use super::views::{AnalyticsSummary, ProfileSummary, SkillsSummary};
use crate::config::ProgressConfig;

/// Entry point that opens per-user sessions over a store, clock, and rule table.
pub struct ProgressService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    rules: Arc<RuleSet>,
    config: ProgressConfig,
}

impl<S> Clone for ProgressService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            rules: Arc::clone(&self.rules),
            config: self.config.clone(),
        }
    }
}

impl<S> ProgressService<S>
where
    S: ProgressStore + 'static,
{
    pub fn new(store: Arc<S>, config: ProgressConfig) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            rules: Arc::new(RuleSet::default()),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = Arc::new(rules);
        self
    }

    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    /// Load the user's snapshot, or create and save a default one.
    pub fn initialize_user(
        &self,
        user_id: UserId,
        email: &str,
    ) -> Result<Session<S>, ProgressError> {
        let user_id = UserId(non_blank("user id", user_id.as_str())?.to_string());

        let (progress, created) = match self.store.load(&user_id)? {
            Some(existing) => (existing, false),
            None => {
                let mut progress = UserProgress::new(user_id.clone(), email, self.clock.now());
                progress.profile_completion = completion::score(&progress.profile_data);
                (progress, true)
            }
        };

        let mut session = Session {
            service: self.clone(),
            progress,
        };
        if created {
            session.persist()?;
        }

        info!(user_id = %user_id, created, "progress session initialized");
        Ok(session)
    }
}

/// Exclusive handle on one user's progress. Every mutation recomputes derived
/// values, runs the matching achievement rules, and saves the snapshot.
pub struct Session<S> {
    service: ProgressService<S>,
    progress: UserProgress,
}

impl<S> Session<S>
where
    S: ProgressStore + 'static,
{
    pub fn user_id(&self) -> &UserId {
        &self.progress.user_id
    }

    pub fn snapshot(&self) -> &UserProgress {
        &self.progress
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<UserProgress, ProgressError> {
        self.apply_profile_update(update)?;
        Ok(self.progress.clone())
    }

    /// Same as [`Session::update_profile`], returning the achievements the
    /// update granted instead of the snapshot.
    pub fn apply_profile_update(
        &mut self,
        update: ProfileUpdate,
    ) -> Result<Vec<Achievement>, ProgressError> {
        self.progress.profile_data.merge(update);
        self.profile_changed()
    }

    pub fn add_skill(&mut self, skill: &str) -> Result<Vec<Achievement>, ProgressError> {
        let skill = non_blank("skill", skill)?;
        if !self.progress.profile_data.push_skill(skill) {
            return Ok(Vec::new());
        }
        self.profile_changed()
    }

    pub fn add_experience(&mut self, entry: &str) -> Result<Vec<Achievement>, ProgressError> {
        let entry = non_blank("experience", entry)?;
        self.progress.profile_data.experience.push(entry.to_string());
        self.profile_changed()
    }

    pub fn update_skill_progress(
        &mut self,
        skill_id: &str,
        progress: u8,
        completed_lessons: u32,
    ) -> Result<Vec<Achievement>, ProgressError> {
        let skill_id = non_blank("skill id", skill_id)?.to_string();
        let progress = progress_percent(progress)?;
        let now = self.service.clock.now();

        let outcome = apply_skill_update(
            &mut self.progress,
            &skill_id,
            progress,
            completed_lessons,
            self.service.config.default_total_lessons,
            now,
        );
        let streak = record_learning_activity(&mut self.progress.learning_stats, now);
        debug!(
            user_id = %self.progress.user_id,
            skill_id = %skill_id,
            progress = outcome.progress,
            xp_gained = outcome.xp_gained,
            current_streak = self.progress.learning_stats.current_streak,
            streak_change = ?streak,
            "skill progress applied"
        );

        self.finish(TriggerContext::SkillUpdated(skill_id))
    }

    pub fn add_application(
        &mut self,
        application: NewApplication,
    ) -> Result<Vec<Achievement>, ProgressError> {
        let source = non_blank("application source", &application.source)?;
        self.progress
            .applications
            .record(application.status, source);
        self.progress.analytics.response_rate = self.progress.applications.response_rate();
        self.finish(TriggerContext::ApplicationAdded)
    }

    /// Move one application between buckets. Achievement rules are not
    /// evaluated here; `first-accept` only fires from `add_application`.
    pub fn update_application_status(
        &mut self,
        old: ApplicationStatus,
        new: ApplicationStatus,
    ) -> Result<(), ProgressError> {
        self.progress
            .applications
            .transition(old, new)
            .map_err(|status| ProgressError::EmptyBucket { status })?;
        self.progress.analytics.response_rate = self.progress.applications.response_rate();
        self.touch_and_persist()
    }

    pub fn add_connection(
        &mut self,
        connection_type: &str,
    ) -> Result<Vec<Achievement>, ProgressError> {
        let connection_type = non_blank("connection type", connection_type)?;
        self.progress.network_stats.record(connection_type);
        self.finish(TriggerContext::ConnectionAdded)
    }

    pub fn complete_course(&mut self) -> Result<(), ProgressError> {
        let stats = &mut self.progress.learning_stats;
        stats.courses_completed = stats.courses_completed.saturating_add(1);
        self.touch_and_persist()
    }

    pub fn record_profile_view(&mut self) -> Result<(), ProgressError> {
        let analytics = &mut self.progress.analytics;
        analytics.profile_views = analytics.profile_views.saturating_add(1);
        self.touch_and_persist()
    }

    pub fn update_preferences(&mut self, update: PreferencesUpdate) -> Result<(), ProgressError> {
        self.progress.preferences.merge(update);
        self.touch_and_persist()
    }

    pub fn analytics(&self) -> AnalyticsSummary {
        AnalyticsSummary::from(&self.progress)
    }

    pub fn user_profile(&self) -> ProfileSummary {
        ProfileSummary::from(&self.progress)
    }

    pub fn skills_progress(&self) -> SkillsSummary {
        SkillsSummary::from(&self.progress)
    }

    /// End the session. The stored snapshot is kept for the next login.
    pub fn clear_user_data(self) -> UserId {
        info!(user_id = %self.progress.user_id, "progress session cleared");
        self.progress.user_id
    }

    fn profile_changed(&mut self) -> Result<Vec<Achievement>, ProgressError> {
        let score = completion::score(&self.progress.profile_data);
        debug!(
            user_id = %self.progress.user_id,
            previous = self.progress.profile_completion,
            score,
            "profile completion recomputed"
        );
        self.progress.profile_completion = score;
        self.finish(TriggerContext::ProfileUpdated)
    }

    fn finish(&mut self, context: TriggerContext) -> Result<Vec<Achievement>, ProgressError> {
        let now = self.service.clock.now();
        let granted = self.service.rules.evaluate(&mut self.progress, &context, now);
        for achievement in &granted {
            info!(
                user_id = %self.progress.user_id,
                achievement = %achievement.id,
                kind = achievement.kind.label(),
                "achievement granted"
            );
        }
        self.touch_and_persist()?;
        Ok(granted)
    }

    fn touch_and_persist(&mut self) -> Result<(), ProgressError> {
        self.progress.touch(self.service.clock.now());
        self.persist()
    }

    /// Save with bounded retries. The in-memory snapshot stays authoritative
    /// when every attempt fails.
    fn persist(&mut self) -> Result<(), ProgressError> {
        let attempts = self.service.config.save_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.service.store.save(&self.progress) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < attempts => {
                    warn!(
                        user_id = %self.progress.user_id,
                        attempt,
                        attempts,
                        error = %err,
                        "snapshot save failed, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => {
                    warn!(
                        user_id = %self.progress.user_id,
                        attempts,
                        error = %err,
                        "snapshot save failed"
                    );
                    return Err(err.into());
                }
            }
        }
    }
}

/// Error raised by the progress façade.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("no active session for user {0}")]
    NoActiveSession(UserId),
    #[error("session for user {0} is unusable after a panic; close and reopen it")]
    SessionPoisoned(UserId),
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),
    #[error("no application in the {} bucket to move", .status.label())]
    EmptyBucket { status: ApplicationStatus },
    #[error(transparent)]
    Store(#[from] StoreError),
}
