//! Study-abroad advising: catalog filtering, tier classification, the
//! shortlist commitment state machine, and the post-lock task generator.

pub mod catalog;
pub mod domain;
pub mod error;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod shortlist;
pub mod stage;
pub mod tasks;
pub mod tiers;
pub mod todos;

#[cfg(test)]
mod tests;

pub use catalog::{
    budget_ceiling, filter_catalog, matches_profile, CatalogImportError, CatalogImporter,
    CatalogQuery,
};
pub use domain::{
    AdmissionRequirements, BudgetRange, EducationLevel, FundingPlan, GreStatus, IeltsStatus,
    IntendedDegree, Profile, ProfileViolation, SopStatus, StudentId, University, UniversityId,
    validate_profile,
};
pub use error::AdvisingError;
pub use repository::{
    AdvisingStore, CatalogRepository, RepositoryError, ShortlistRepository, StudentRepository,
    TodoRepository,
};
pub use router::advising_router;
pub use scoring::{AcademicStrength, ExamReadiness, GpaStanding, ProfileStrength};
pub use service::AdvisingService;
pub use shortlist::{
    LockOutcome, NewShortlistEntry, ShortlistEntry, ShortlistId, UnlockOutcome, UNLOCK_WARNING,
};
pub use stage::{Stage, StageEvent, StudentRecord};
pub use tasks::{lock_checklist, LOCK_CHECKLIST_LEN};
pub use tiers::{
    classify, classify_candidates, filter_and_classify, Recommendations, RecommendedUniversity,
    RiskLevel, Tier,
};
pub use todos::{NewTodo, Priority, Todo, TodoCategory, TodoFilter, TodoId, TodoUpdate};
