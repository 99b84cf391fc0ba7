use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{StudentId, UniversityId};
use super::stage::Stage;
use super::tiers::{RiskLevel, Tier};
use super::todos::Todo;

/// Advisory shown whenever a university is unlocked.
pub const UNLOCK_WARNING: &str = "University unlocked. Your application guidance and todos for this university remain but may become outdated.";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShortlistId(pub String);

/// Relation between one student and one university they are considering.
///
/// `locked_at` is present exactly when `locked` is true; use [`lock`] and
/// [`unlock`] rather than writing the fields directly.
///
/// [`lock`]: ShortlistEntry::lock
/// [`unlock`]: ShortlistEntry::unlock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistEntry {
    pub id: ShortlistId,
    pub student_id: StudentId,
    pub university_id: UniversityId,
    pub category: Tier,
    pub locked: bool,
    #[serde(default)]
    pub locked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ai_reason: Option<String>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    pub created_at: DateTime<Utc>,
}

impl ShortlistEntry {
    pub fn lock(&mut self, now: DateTime<Utc>) {
        self.locked = true;
        self.locked_at = Some(now);
    }

    pub fn unlock(&mut self) {
        self.locked = false;
        self.locked_at = None;
    }
}

/// Request to shortlist a university under a chosen tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShortlistEntry {
    pub university_id: UniversityId,
    pub category: Tier,
    #[serde(default)]
    pub ai_reason: Option<String>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockOutcome {
    pub entry: ShortlistEntry,
    pub todos_created: Vec<Todo>,
    /// True when the entry was already locked and nothing changed.
    pub already_locked: bool,
    pub stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockOutcome {
    pub entry: ShortlistEntry,
    pub stage_changed: bool,
    pub stage: Stage,
    pub warning: &'static str,
}

/// Display order: dream, target, safe; newest first within a tier.
pub fn sort_for_display(entries: &mut [ShortlistEntry]) {
    entries.sort_by(|left, right| {
        left.category
            .cmp(&right.category)
            .then_with(|| right.created_at.cmp(&left.created_at))
    });
}
