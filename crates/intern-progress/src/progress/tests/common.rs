use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use crate::config::ProgressConfig;
use crate::progress::clock::ManualClock;
use crate::progress::domain::{ProfileUpdate, UserId, UserProgress};
use crate::progress::repository::{ProgressStore, StoreError};
use crate::progress::service::{ProgressService, Session};

#[derive(Default)]
pub(super) struct MemoryStore {
    snapshots: Mutex<HashMap<UserId, UserProgress>>,
    saves: AtomicUsize,
    loads: AtomicUsize,
    load_delay: Option<Duration>,
}

impl MemoryStore {
    /// Store whose loads stall, widening the window between a load and the
    /// save that follows it.
    pub(super) fn slow_loads(delay: Duration) -> Self {
        Self {
            load_delay: Some(delay),
            ..Self::default()
        }
    }

    pub(super) fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub(super) fn stored(&self, user_id: &str) -> Option<UserProgress> {
        self.snapshots
            .lock()
            .expect("store mutex poisoned")
            .get(&UserId::from(user_id))
            .cloned()
    }

    pub(super) fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ProgressStore for MemoryStore {
    fn save(&self, snapshot: &UserProgress) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.snapshots
            .lock()
            .expect("store mutex poisoned")
            .insert(snapshot.user_id.clone(), snapshot.clone());
        Ok(())
    }

    fn load(&self, user_id: &UserId) -> Result<Option<UserProgress>, StoreError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.load_delay {
            thread::sleep(delay);
        }
        Ok(self
            .snapshots
            .lock()
            .expect("store mutex poisoned")
            .get(user_id)
            .cloned())
    }
}

/// Store whose first `failures` saves report the backend as unavailable.
pub(super) struct FlakyStore {
    inner: MemoryStore,
    failures: AtomicUsize,
    attempts: AtomicUsize,
}

impl FlakyStore {
    pub(super) fn failing(failures: usize) -> Self {
        Self {
            inner: MemoryStore::default(),
            failures: AtomicUsize::new(failures),
            attempts: AtomicUsize::new(0),
        }
    }

    pub(super) fn fail_next(&self, failures: usize) {
        self.failures.store(failures, Ordering::SeqCst);
    }

    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub(super) fn stored(&self, user_id: &str) -> Option<UserProgress> {
        self.inner.stored(user_id)
    }
}

impl ProgressStore for FlakyStore {
    fn save(&self, snapshot: &UserProgress) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("disk quota exceeded".to_string()));
        }
        self.inner.save(snapshot)
    }

    fn load(&self, user_id: &UserId) -> Result<Option<UserProgress>, StoreError> {
        self.inner.load(user_id)
    }
}

pub(super) fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn service_with<S: ProgressStore + 'static>(
    store: Arc<S>,
    config: ProgressConfig,
) -> (ProgressService<S>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(monday_morning()));
    let service = ProgressService::new(store, config).with_clock(clock.clone());
    (service, clock)
}

pub(super) fn memory_service() -> (
    ProgressService<MemoryStore>,
    Arc<MemoryStore>,
    Arc<ManualClock>,
) {
    let store = Arc::new(MemoryStore::default());
    let (service, clock) = service_with(store.clone(), ProgressConfig::default());
    (service, store, clock)
}

pub(super) fn session(
    service: &ProgressService<MemoryStore>,
    user_id: &str,
) -> Session<MemoryStore> {
    service
        .initialize_user(UserId::from(user_id), "a@x.com")
        .expect("session opens")
}

pub(super) fn identity_update() -> ProfileUpdate {
    ProfileUpdate {
        name: Some("A".to_string()),
        email: Some("a@x.com".to_string()),
        location: Some("Tunis".to_string()),
        university: Some("U".to_string()),
        major: Some("CS".to_string()),
        ..ProfileUpdate::default()
    }
}

pub(super) fn achievement_ids(progress: &UserProgress) -> Vec<&str> {
    progress
        .achievements
        .iter()
        .map(|achievement| achievement.id.as_str())
        .collect()
}
