use crate::infra::{morning_of, parse_date, InMemoryProgressStore};
use chrono::{Duration, NaiveDate, Utc};
use clap::Args;
use intern_progress::config::AppConfig;
use intern_progress::error::AppError;
use intern_progress::progress::{
    Achievement, AnalyticsSummary, ApplicationStatus, ManualClock, NewApplication,
    ProfileSummary, ProfileUpdate, ProgressService, Session, SkillsSummary, UserId,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

const DEMO_SKILLS: [&str; 5] = ["Rust", "SQL", "Git", "Docker", "Linux"];
const LEARNING_DAYS: u8 = 7;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// User id for the sample session.
    #[arg(long)]
    pub(crate) user_id: Option<String>,
    /// Email stored on the sample profile.
    #[arg(long)]
    pub(crate) email: Option<String>,
    /// First learning day (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Emit the final summaries as JSON instead of text.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoReport {
    granted: Vec<Achievement>,
    profile: ProfileSummary,
    skills: SkillsSummary,
    analytics: AnalyticsSummary,
}

pub(crate) fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let DemoArgs {
        user_id,
        email,
        start,
        json,
    } = args;

    let user_id = UserId(user_id.unwrap_or_else(|| "demo-intern".to_string()));
    let email = email.unwrap_or_else(|| "intern@example.com".to_string());
    let start = start.unwrap_or_else(|| Utc::now().date_naive());

    let store = Arc::new(InMemoryProgressStore::default());
    let clock = Arc::new(ManualClock::new(morning_of(start)));
    let service =
        ProgressService::new(store.clone(), config.progress.clone()).with_clock(clock.clone());

    info!(user_id = %user_id, environment = ?config.environment, "starting progress demo");
    let mut session = service.initialize_user(user_id, &email)?;
    let mut granted = Vec::new();

    granted.extend(build_profile(&mut session)?);
    for day in 0..LEARNING_DAYS {
        let progress = 15 * (day + 1);
        let lessons = 3 * u32::from(day + 1);
        granted.extend(session.update_skill_progress("rust", progress.min(100), lessons)?);
        if day % 2 == 0 {
            granted.extend(session.update_skill_progress("sql", 10 * (day + 2), lessons)?);
        }
        clock.advance(Duration::days(1));
    }
    session.complete_course()?;
    granted.extend(apply_to_internships(&mut session)?);
    for connection_type in ["mentor", "peer", "peer", "recruiter", "mentor"] {
        granted.extend(session.add_connection(connection_type)?);
    }
    for _ in 0..3 {
        session.record_profile_view()?;
    }

    let report = DemoReport {
        granted,
        profile: session.user_profile(),
        skills: session.skills_progress(),
        analytics: session.analytics(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report, store.len());
    }

    session.clear_user_data();
    Ok(())
}

fn build_profile(
    session: &mut Session<InMemoryProgressStore>,
) -> Result<Vec<Achievement>, AppError> {
    let mut granted = session.apply_profile_update(ProfileUpdate {
        name: Some("Sample Intern".into()),
        location: Some("Remote".into()),
        university: Some("State University".into()),
        major: Some("Computer Science".into()),
        ..ProfileUpdate::default()
    })?;
    for skill in DEMO_SKILLS {
        granted.extend(session.add_skill(skill)?);
    }
    granted.extend(session.add_experience("Teaching assistant, systems course")?);

    granted.extend(session.apply_profile_update(ProfileUpdate {
        bio: Some("Third-year student looking for a backend internship.".into()),
        github_url: Some("https://github.com/sample-intern".into()),
        linkedin_url: Some("https://linkedin.com/in/sample-intern".into()),
        portfolio_url: Some("https://sample-intern.dev".into()),
        ..ProfileUpdate::default()
    })?);
    Ok(granted)
}

fn apply_to_internships(
    session: &mut Session<InMemoryProgressStore>,
) -> Result<Vec<Achievement>, AppError> {
    let mut granted = Vec::new();
    for source in ["swipe", "swipe", "swipe", "referral"] {
        granted.extend(session.add_application(NewApplication::pending(source))?);
    }
    session.update_application_status(ApplicationStatus::Pending, ApplicationStatus::Reviewed)?;
    session.update_application_status(ApplicationStatus::Reviewed, ApplicationStatus::Interview)?;
    session.update_application_status(ApplicationStatus::Pending, ApplicationStatus::Rejected)?;
    granted.extend(session.add_application(NewApplication {
        source: "career fair".into(),
        status: ApplicationStatus::Accepted,
    })?);
    Ok(granted)
}

fn render_report(report: &DemoReport, stored_snapshots: usize) {
    let DemoReport {
        granted,
        profile,
        skills,
        analytics,
    } = report;

    println!("Intern progress demo for {}", profile.user_id);
    println!(
        "- Profile completion {}% | level {} | {} achievements",
        profile.profile_completion,
        profile.level,
        profile.achievements.len()
    );
    if !profile.missing_sections.is_empty() {
        let missing: Vec<&str> = profile
            .missing_sections
            .iter()
            .map(|category| category.label())
            .collect();
        println!("- Missing sections: {}", missing.join(", "));
    }

    println!("\nLearning");
    println!(
        "- {} XP | level {} | {} XP to next level",
        skills.total_xp, skills.level, skills.xp_to_next_level
    );
    println!(
        "- Streak {} days (longest {}) | {} lessons | {} courses",
        skills.current_streak,
        skills.longest_streak,
        skills.lessons_completed,
        skills.courses_completed
    );
    for skill in &skills.skills {
        println!(
            "  - {}: {}% {} ({}/{} lessons)",
            skill.skill_id,
            skill.progress,
            skill.level_label,
            skill.completed_lessons,
            skill.total_lessons
        );
    }

    println!("\nApplications");
    println!(
        "- {} total | {}% response rate | {} profile views",
        analytics.applications.total, analytics.response_rate, analytics.profile_views
    );
    for status in ApplicationStatus::ALL {
        println!(
            "  - {}: {}",
            status.label(),
            analytics.applications.count(status)
        );
    }
    println!(
        "- {} connections across {} types",
        analytics.total_connections,
        analytics.connections_by_type.len()
    );

    println!("\nAchievements granted during the demo");
    if granted.is_empty() {
        println!("- none");
    }
    for achievement in granted {
        println!(
            "- [{}] {}: {}",
            achievement.kind.label(),
            achievement.title,
            achievement.description
        );
    }
    println!("\nSnapshots persisted: {stored_snapshots}");
}
