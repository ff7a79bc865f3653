use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use super::domain::UserId;
use super::repository::ProgressStore;
use super::service::{ProgressError, ProgressService, Session};
use super::validation::non_blank;

/// `None` once the session has been closed.
type Slot<S> = Arc<Mutex<Option<Session<S>>>>;

/// Open sessions keyed by user. Calls for one user are serialized on that
/// user's lock; different users only share the map lookup.
///
/// Opens and closes are serialized among themselves, so a user is loaded and
/// seeded at most once while their session is live, and a reopen never loads
/// a snapshot that an in-flight call is about to overwrite. `f` passed to
/// [`SessionRegistry::with_session`] must not close its own user.
pub struct SessionRegistry<S> {
    service: ProgressService<S>,
    sessions: Mutex<HashMap<UserId, Slot<S>>>,
    lifecycle: Mutex<()>,
}

impl<S> SessionRegistry<S>
where
    S: ProgressStore + 'static,
{
    pub fn new(service: ProgressService<S>) -> Self {
        Self {
            service,
            sessions: Mutex::new(HashMap::new()),
            lifecycle: Mutex::new(()),
        }
    }

    /// Open a session for `user_id`. Re-opening an active user keeps the
    /// existing session.
    pub fn open(&self, user_id: UserId, email: &str) -> Result<(), ProgressError> {
        let user_id = UserId(non_blank("user id", user_id.as_str())?.to_string());
        let _lifecycle = self.lifecycle();
        if self.lookup(&user_id).is_some() {
            return Ok(());
        }

        let session = self.service.initialize_user(user_id.clone(), email)?;
        self.sessions()
            .insert(user_id, Arc::new(Mutex::new(Some(session))));
        Ok(())
    }

    /// Run `f` against the user's session while holding that user's lock.
    ///
    /// A panic inside `f` leaves the session unusable; later calls get
    /// [`ProgressError::SessionPoisoned`] until the user is closed and reopened,
    /// which reloads the last saved snapshot.
    pub fn with_session<T, F>(&self, user_id: &UserId, f: F) -> Result<T, ProgressError>
    where
        F: FnOnce(&mut Session<S>) -> Result<T, ProgressError>,
    {
        let slot = self
            .lookup(user_id)
            .ok_or_else(|| ProgressError::NoActiveSession(user_id.clone()))?;
        let mut guard = slot
            .lock()
            .map_err(|_| ProgressError::SessionPoisoned(user_id.clone()))?;
        match guard.as_mut() {
            Some(session) => f(session),
            None => Err(ProgressError::NoActiveSession(user_id.clone())),
        }
    }

    /// Close the user's session. Waits for an in-flight call to finish; calls
    /// already queued on the session see it as closed.
    pub fn close(&self, user_id: &UserId) -> Result<(), ProgressError> {
        let _lifecycle = self.lifecycle();
        let slot = self
            .lookup(user_id)
            .ok_or_else(|| ProgressError::NoActiveSession(user_id.clone()))?;

        let mut guard = match slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(user_id = %user_id, "discarding session left behind by a panic");
                poisoned.into_inner()
            }
        };
        if let Some(session) = guard.take() {
            session.clear_user_data();
        }
        drop(guard);

        self.sessions().remove(user_id);
        info!(user_id = %user_id, "progress session closed");
        Ok(())
    }

    pub fn active_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.sessions().keys().cloned().collect();
        users.sort();
        users
    }

    fn lookup(&self, user_id: &UserId) -> Option<Slot<S>> {
        self.sessions().get(user_id).cloned()
    }

    fn lifecycle(&self) -> MutexGuard<'_, ()> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Map operations never leave the table half-updated.
    fn sessions(&self) -> MutexGuard<'_, HashMap<UserId, Slot<S>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
