use serde::{Deserialize, Serialize};

use super::domain::ProfileData;

const IDENTITY_FIELD_POINTS: f64 = 8.0;
const BIO_POINTS: f64 = 10.0;
const BIO_MIN_CHARS: usize = 20;
const SKILL_POINTS: f64 = 20.0;
const SKILL_TARGET: usize = 5;
const EXPERIENCE_POINTS: f64 = 15.0;
const EXPERIENCE_TARGET: usize = 2;
const LINK_POINTS: f64 = 15.0;
const LINK_SLOTS: usize = 3;

/// Scoring categories of the completion rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionCategory {
    Name,
    Email,
    Location,
    University,
    Major,
    Bio,
    Skills,
    Experience,
    SocialLinks,
}

impl CompletionCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Location => "location",
            Self::University => "university",
            Self::Major => "major",
            Self::Bio => "bio",
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::SocialLinks => "social links",
        }
    }
}

/// Points earned by one rubric category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionComponent {
    pub category: CompletionCategory,
    pub earned: f64,
    pub available: f64,
}

impl CompletionComponent {
    pub fn is_complete(&self) -> bool {
        self.earned >= self.available
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionBreakdown {
    pub score: u8,
    pub components: Vec<CompletionComponent>,
}

impl CompletionBreakdown {
    /// Categories still short of full credit, in rubric order.
    pub fn missing(&self) -> Vec<CompletionCategory> {
        self.components
            .iter()
            .filter(|component| !component.is_complete())
            .map(|component| component.category)
            .collect()
    }
}

/// Completion score in `0..=100` for a profile snapshot.
pub fn score(profile: &ProfileData) -> u8 {
    breakdown(profile).score
}

pub fn breakdown(profile: &ProfileData) -> CompletionBreakdown {
    let mut components = Vec::with_capacity(9);

    for (category, value) in [
        (CompletionCategory::Name, &profile.name),
        (CompletionCategory::Email, &profile.email),
        (CompletionCategory::Location, &profile.location),
        (CompletionCategory::University, &profile.university),
        (CompletionCategory::Major, &profile.major),
    ] {
        let earned = if is_filled(value) {
            IDENTITY_FIELD_POINTS
        } else {
            0.0
        };
        components.push(CompletionComponent {
            category,
            earned,
            available: IDENTITY_FIELD_POINTS,
        });
    }

    let bio_chars = profile
        .bio
        .as_deref()
        .map(|bio| bio.trim().chars().count())
        .unwrap_or(0);
    components.push(CompletionComponent {
        category: CompletionCategory::Bio,
        earned: if bio_chars > BIO_MIN_CHARS {
            BIO_POINTS
        } else {
            0.0
        },
        available: BIO_POINTS,
    });

    components.push(CompletionComponent {
        category: CompletionCategory::Skills,
        earned: scaled(profile.skills.len(), SKILL_TARGET, SKILL_POINTS),
        available: SKILL_POINTS,
    });

    components.push(CompletionComponent {
        category: CompletionCategory::Experience,
        earned: scaled(profile.experience.len(), EXPERIENCE_TARGET, EXPERIENCE_POINTS),
        available: EXPERIENCE_POINTS,
    });

    let valid_links = [
        &profile.linkedin_url,
        &profile.github_url,
        &profile.portfolio_url,
    ]
    .into_iter()
    .filter(|link| link.as_deref().map(is_filled).unwrap_or(false))
    .count();
    components.push(CompletionComponent {
        category: CompletionCategory::SocialLinks,
        earned: scaled(valid_links, LINK_SLOTS, LINK_POINTS),
        available: LINK_POINTS,
    });

    let earned: f64 = components.iter().map(|component| component.earned).sum();
    let available: f64 = components.iter().map(|component| component.available).sum();
    let score = if available > 0.0 {
        (earned * 100.0 / available).round().clamp(0.0, 100.0) as u8
    } else {
        0
    };

    CompletionBreakdown { score, components }
}

fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn scaled(count: usize, target: usize, points: f64) -> f64 {
    count.min(target) as f64 / target as f64 * points
}
