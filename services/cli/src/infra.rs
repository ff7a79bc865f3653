use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use intern_progress::progress::{ProgressStore, StoreError, UserId, UserProgress};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default, Clone)]
pub(crate) struct InMemoryProgressStore {
    snapshots: Arc<Mutex<HashMap<UserId, UserProgress>>>,
}

impl ProgressStore for InMemoryProgressStore {
    fn save(&self, snapshot: &UserProgress) -> Result<(), StoreError> {
        let mut guard = self.snapshots.lock().expect("store mutex poisoned");
        guard.insert(snapshot.user_id.clone(), snapshot.clone());
        Ok(())
    }

    fn load(&self, user_id: &UserId) -> Result<Option<UserProgress>, StoreError> {
        let guard = self.snapshots.lock().expect("store mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }
}

impl InMemoryProgressStore {
    pub(crate) fn len(&self) -> usize {
        self.snapshots.lock().expect("store mutex poisoned").len()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// 09:00 UTC on `date`, the demo's first learning session.
pub(crate) fn morning_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() + Duration::hours(9)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_with_whitespace() {
        let date = parse_date(" 2025-03-10 ").expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid"));
        assert!(parse_date("10/03/2025").is_err());
    }

    #[test]
    fn store_round_trips_snapshots() {
        let store = InMemoryProgressStore::default();
        let user_id = UserId::from("demo");
        let now = morning_of(NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid"));
        let snapshot = UserProgress::new(user_id.clone(), "demo@example.com", now);

        assert_eq!(store.load(&user_id).expect("loads"), None);
        store.save(&snapshot).expect("saves");
        store.save(&snapshot).expect("saves again");
        assert_eq!(store.load(&user_id).expect("loads"), Some(snapshot));
        assert_eq!(store.len(), 1);
    }
}
