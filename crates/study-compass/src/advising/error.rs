use super::domain::ProfileViolation;
use super::repository::RepositoryError;

/// Failures surfaced by the advising services.
///
/// Everything except `Repository` is a user-recoverable condition; storage
/// failures pass through untouched.
#[derive(Debug, thiserror::Error)]
pub enum AdvisingError {
    #[error("complete your profile first")]
    ProfileIncomplete,
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ProfileViolation),
    #[error("university already in shortlist")]
    DuplicateShortlist,
    #[error("cannot remove locked university, unlock it first")]
    CannotRemoveLocked,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
