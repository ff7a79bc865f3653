//! End-to-end progress flow through the public API, persisting snapshots as
//! JSON documents the way a key-value backend would.

use chrono::{Duration, TimeZone, Utc};
use intern_progress::config::ProgressConfig;
use intern_progress::progress::{
    ApplicationStatus, ManualClock, NewApplication, ProfileUpdate, ProgressService,
    ProgressStore, SessionRegistry, SkillLevel, StoreError, UserId, UserProgress,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct JsonStore {
    documents: Mutex<HashMap<String, String>>,
}

impl JsonStore {
    fn document(&self, user_id: &str) -> Option<String> {
        self.documents
            .lock()
            .expect("store mutex poisoned")
            .get(user_id)
            .cloned()
    }

    fn insert_raw(&self, user_id: &str, raw: &str) {
        self.documents
            .lock()
            .expect("store mutex poisoned")
            .insert(user_id.to_string(), raw.to_string());
    }
}

impl ProgressStore for JsonStore {
    fn save(&self, snapshot: &UserProgress) -> Result<(), StoreError> {
        let raw = serde_json::to_string(snapshot)
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        self.insert_raw(snapshot.user_id.as_str(), &raw);
        Ok(())
    }

    fn load(&self, user_id: &UserId) -> Result<Option<UserProgress>, StoreError> {
        match self.document(user_id.as_str()) {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|_| StoreError::Corrupt(user_id.clone())),
            None => Ok(None),
        }
    }
}

fn service(store: Arc<JsonStore>) -> (ProgressService<JsonStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0)
            .single()
            .expect("valid start"),
    ));
    let service = ProgressService::new(store, ProgressConfig::default()).with_clock(clock.clone());
    (service, clock)
}

fn full_profile() -> ProfileUpdate {
    ProfileUpdate {
        name: Some("Amira".into()),
        location: Some("Tunis".into()),
        university: Some("INSAT".into()),
        major: Some("Software Engineering".into()),
        bio: Some("Backend intern who enjoys systems programming.".into()),
        skills: Some(
            ["Rust", "SQL", "Docker", "Linux", "Git"]
                .map(String::from)
                .to_vec(),
        ),
        experience: Some(vec!["Teaching assistant".into(), "Open source".into()]),
        linkedin_url: Some("https://linkedin.com/in/amira".into()),
        github_url: Some("https://github.com/amira".into()),
        portfolio_url: Some("https://amira.dev".into()),
        ..ProfileUpdate::default()
    }
}

#[test]
fn a_week_of_activity_survives_a_new_login() {
    let store = Arc::new(JsonStore::default());
    let (service, clock) = service(store.clone());

    let mut session = service
        .initialize_user(UserId::from("amira"), "amira@example.com")
        .expect("session opens");
    let profile = session.update_profile(full_profile()).expect("profile saves");
    assert_eq!(profile.profile_completion, 100);

    for day in 0..7u8 {
        session
            .update_skill_progress("rust", 10 * (day + 1), 2 * u32::from(day + 1))
            .expect("skill progress saves");
        clock.advance(Duration::days(1));
    }
    let skills = session.skills_progress();
    assert_eq!(skills.current_streak, 7);
    assert_eq!(skills.total_xp, 140);
    assert_eq!(skills.skills[0].level, SkillLevel::Intermediate);

    session
        .add_application(NewApplication::pending("swipe"))
        .expect("application saves");
    session
        .update_application_status(ApplicationStatus::Pending, ApplicationStatus::Interview)
        .expect("status moves");
    session.add_connection("mentor").expect("connection saves");

    let user_id = session.clear_user_data();
    assert_eq!(user_id.as_str(), "amira");

    let resumed = service
        .initialize_user(UserId::from("amira"), "amira@example.com")
        .expect("session resumes");
    let snapshot = resumed.snapshot();
    assert_eq!(snapshot.profile_completion, 100);
    assert_eq!(snapshot.applications.count(ApplicationStatus::Interview), 1);
    assert_eq!(snapshot.analytics.response_rate, 100);
    assert_eq!(snapshot.network_stats.total_connections, 1);
    for id in ["profile-50", "profile-90", "skills-5", "streak-7", "first-app"] {
        assert!(snapshot.has_achievement(id), "missing {id}");
    }

    let raw = store.document("amira").expect("document stored");
    assert!(raw.contains("\"profileCompletion\":100"));
    assert!(raw.contains("\"skillsProgress\""));
}

#[test]
fn corrupt_documents_are_reported_instead_of_overwritten() {
    let store = Arc::new(JsonStore::default());
    store.insert_raw("amira", "{not json");
    let (service, _clock) = service(store.clone());

    match service.initialize_user(UserId::from("amira"), "amira@example.com") {
        Err(intern_progress::progress::ProgressError::Store(StoreError::Corrupt(user_id))) => {
            assert_eq!(user_id.as_str(), "amira")
        }
        other => panic!("expected corrupt snapshot error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(store.document("amira").as_deref(), Some("{not json"));
}

#[test]
fn registry_routes_calls_to_each_users_session() {
    let store = Arc::new(JsonStore::default());
    let (service, _clock) = service(store.clone());
    let registry = SessionRegistry::new(service);
    let amira = UserId::from("amira");
    let karim = UserId::from("karim");

    registry.open(amira.clone(), "amira@example.com").expect("opens");
    registry.open(karim.clone(), "karim@example.com").expect("opens");
    registry
        .with_session(&amira, |session| session.update_profile(full_profile()))
        .expect("profile saves");

    let karim_completion = registry
        .with_session(&karim, |session| Ok(session.snapshot().profile_completion))
        .expect("session available");
    assert_eq!(karim_completion, 8);
    assert_eq!(registry.active_users(), vec![amira.clone(), karim.clone()]);

    registry.close(&amira).expect("closes");
    assert_eq!(registry.active_users(), vec![karim]);
    assert!(store
        .document("amira")
        .expect("document stored")
        .contains("\"profileCompletion\":100"));
}
