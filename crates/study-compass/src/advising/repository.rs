use chrono::{DateTime, Utc};

use super::domain::{Profile, StudentId, University, UniversityId};
use super::shortlist::{ShortlistEntry, ShortlistId};
use super::stage::StudentRecord;
use super::todos::{Todo, TodoId};

/// Error enumeration for storage failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to the university catalog.
pub trait CatalogRepository: Send + Sync {
    fn universities(&self) -> Result<Vec<University>, RepositoryError>;
    fn university(&self, id: &UniversityId) -> Result<Option<University>, RepositoryError>;
}

/// Student journey records and their onboarding profiles.
pub trait StudentRepository: Send + Sync {
    fn student(&self, id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError>;
    fn save_student(&self, record: StudentRecord) -> Result<(), RepositoryError>;
    fn profile(&self, id: &StudentId) -> Result<Option<Profile>, RepositoryError>;
    fn save_profile(&self, id: &StudentId, profile: Profile) -> Result<(), RepositoryError>;
}

/// Shortlist storage.
///
/// `insert_entry` must reject a second entry for the same (student,
/// university) pair with [`RepositoryError::Conflict`], atomically.
pub trait ShortlistRepository: Send + Sync {
    fn insert_entry(&self, entry: ShortlistEntry) -> Result<ShortlistEntry, RepositoryError>;
    fn update_entry(&self, entry: ShortlistEntry) -> Result<(), RepositoryError>;
    /// Locks the entry only if it is currently unlocked, as one atomic step.
    ///
    /// Returns the locked entry when this call performed the transition and
    /// `None` when the entry was already locked. A missing entry is
    /// [`RepositoryError::NotFound`].
    fn mark_locked(
        &self,
        student: &StudentId,
        id: &ShortlistId,
        at: DateTime<Utc>,
    ) -> Result<Option<ShortlistEntry>, RepositoryError>;
    fn entry(
        &self,
        student: &StudentId,
        id: &ShortlistId,
    ) -> Result<Option<ShortlistEntry>, RepositoryError>;
    fn entry_for_university(
        &self,
        student: &StudentId,
        university: &UniversityId,
    ) -> Result<Option<ShortlistEntry>, RepositoryError>;
    fn remove_entry(&self, student: &StudentId, id: &ShortlistId) -> Result<(), RepositoryError>;
    fn entries(&self, student: &StudentId) -> Result<Vec<ShortlistEntry>, RepositoryError>;
}

/// Todo storage. `insert_todos` persists a batch all-or-nothing.
pub trait TodoRepository: Send + Sync {
    fn insert_todos(&self, todos: Vec<Todo>) -> Result<Vec<Todo>, RepositoryError>;
    fn update_todo(&self, todo: Todo) -> Result<(), RepositoryError>;
    fn todo(&self, student: &StudentId, id: &TodoId) -> Result<Option<Todo>, RepositoryError>;
    fn remove_todo(&self, student: &StudentId, id: &TodoId) -> Result<(), RepositoryError>;
    fn todos(&self, student: &StudentId) -> Result<Vec<Todo>, RepositoryError>;
}

/// Everything the advising services need from storage.
pub trait AdvisingStore:
    CatalogRepository + StudentRepository + ShortlistRepository + TodoRepository
{
}

impl<T> AdvisingStore for T where
    T: CatalogRepository + StudentRepository + ShortlistRepository + TodoRepository
{
}
