use super::domain::{UserId, UserProgress};

/// Key-value collaborator holding one snapshot per user.
pub trait ProgressStore: Send + Sync {
    fn save(&self, snapshot: &UserProgress) -> Result<(), StoreError>;
    fn load(&self, user_id: &UserId) -> Result<Option<UserProgress>, StoreError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("snapshot for {0} could not be decoded")]
    Corrupt(UserId),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
