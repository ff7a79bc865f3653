use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::achievements::Achievement;
use super::applications::ApplicationCounters;
use super::skills::SkillProgress;

/// Opaque identifier for a user of the matching app.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Candidate profile fields that feed the completion score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileData {
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub location: String,
    pub university: String,
    pub major: String,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
}

impl ProfileData {
    /// Apply a partial update. `skills` replaces the list and is de-duplicated.
    pub fn merge(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            name,
            email,
            bio,
            location,
            university,
            major,
            skills,
            experience,
            linkedin_url,
            github_url,
            portfolio_url,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(bio) = bio {
            self.bio = Some(bio);
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(university) = university {
            self.university = university;
        }
        if let Some(major) = major {
            self.major = major;
        }
        if let Some(skills) = skills {
            self.skills.clear();
            for skill in skills {
                self.push_skill(&skill);
            }
        }
        if let Some(experience) = experience {
            self.experience = experience
                .into_iter()
                .map(|entry| entry.trim().to_string())
                .filter(|entry| !entry.is_empty())
                .collect();
        }
        if let Some(url) = linkedin_url {
            self.linkedin_url = Some(url);
        }
        if let Some(url) = github_url {
            self.github_url = Some(url);
        }
        if let Some(url) = portfolio_url {
            self.portfolio_url = Some(url);
        }
    }

    /// Append a skill unless it is blank or already listed (case-insensitive).
    /// Returns whether the list changed.
    pub fn push_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.has_skill(skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        let skill = skill.trim();
        self.skills
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(skill))
    }
}

/// Partial profile payload submitted by the UI; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<Vec<String>>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub total_connections: u32,
    pub connections_by_type: BTreeMap<String, u32>,
    pub recent_connections: u32,
}

impl NetworkStats {
    pub fn record(&mut self, connection_type: &str) {
        self.total_connections += 1;
        self.recent_connections += 1;
        *self
            .connections_by_type
            .entry(connection_type.to_string())
            .or_insert(0) += 1;
    }
}

pub const XP_PER_LEVEL: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    pub total_xp: u64,
    pub level: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub lessons_completed: u32,
    pub courses_completed: u32,
    pub last_learning_activity: Option<DateTime<Utc>>,
}

impl LearningStats {
    pub fn add_xp(&mut self, xp: u64) {
        self.total_xp = self.total_xp.saturating_add(xp);
        self.level = level_for_xp(self.total_xp);
    }
}

impl Default for LearningStats {
    fn default() -> Self {
        Self {
            total_xp: 0,
            level: 1,
            current_streak: 0,
            longest_streak: 0,
            lessons_completed: 0,
            courses_completed: 0,
            last_learning_activity: None,
        }
    }
}

pub fn level_for_xp(total_xp: u64) -> u32 {
    let level = total_xp / XP_PER_LEVEL + 1;
    u32::try_from(level).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub notifications_enabled: bool,
    pub job_types: Vec<String>,
    pub preferred_locations: Vec<String>,
    pub remote_ok: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            job_types: Vec::new(),
            preferred_locations: Vec::new(),
            remote_ok: false,
        }
    }
}

impl Preferences {
    pub fn merge(&mut self, update: PreferencesUpdate) {
        if let Some(enabled) = update.notifications_enabled {
            self.notifications_enabled = enabled;
        }
        if let Some(job_types) = update.job_types {
            self.job_types = job_types;
        }
        if let Some(locations) = update.preferred_locations {
            self.preferred_locations = locations;
        }
        if let Some(remote_ok) = update.remote_ok {
            self.remote_ok = remote_ok;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesUpdate {
    pub notifications_enabled: Option<bool>,
    pub job_types: Option<Vec<String>>,
    pub preferred_locations: Option<Vec<String>>,
    pub remote_ok: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub profile_views: u32,
    pub response_rate: u8,
    pub last_active: DateTime<Utc>,
}

/// Aggregate root holding everything tracked for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: UserId,
    pub profile_completion: u8,
    pub profile_data: ProfileData,
    pub skills_progress: BTreeMap<String, SkillProgress>,
    pub applications: ApplicationCounters,
    pub achievements: Vec<Achievement>,
    pub network_stats: NetworkStats,
    pub learning_stats: LearningStats,
    pub preferences: Preferences,
    pub analytics: Analytics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProgress {
    pub fn new(user_id: UserId, email: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            profile_completion: 0,
            profile_data: ProfileData {
                email: email.trim().to_string(),
                ..ProfileData::default()
            },
            skills_progress: BTreeMap::new(),
            applications: ApplicationCounters::default(),
            achievements: Vec::new(),
            network_stats: NetworkStats::default(),
            learning_stats: LearningStats::default(),
            preferences: Preferences::default(),
            analytics: Analytics {
                profile_views: 0,
                response_rate: 0,
                last_active: now,
            },
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|achievement| achievement.id == id)
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.analytics.last_active = now;
    }
}
