//! Journey stage transitions.
//!
//! Every stage write goes through [`Stage::transition`] so the rules live in
//! one table instead of being scattered across the operations that trigger
//! them.

use serde::{Deserialize, Serialize};

use super::domain::StudentId;

/// Ordinal summary of the student's progress, serialized as 1 through 4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    #[default]
    Onboarding,
    Discovery,
    Finalize,
    Apply,
}

/// Events that may move a student between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    ProfileCompleted,
    UniversityLocked,
    UniversityUnlocked { remaining_locked: usize },
}

impl Stage {
    pub const fn number(self) -> u8 {
        match self {
            Stage::Onboarding => 1,
            Stage::Discovery => 2,
            Stage::Finalize => 3,
            Stage::Apply => 4,
        }
    }

    pub const fn from_number(value: u8) -> Option<Self> {
        match value {
            1 => Some(Stage::Onboarding),
            2 => Some(Stage::Discovery),
            3 => Some(Stage::Finalize),
            4 => Some(Stage::Apply),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Stage::Onboarding => "onboarding",
            Stage::Discovery => "discovery",
            Stage::Finalize => "finalize",
            Stage::Apply => "apply",
        }
    }

    pub fn transition(self, event: StageEvent) -> Stage {
        match (self, event) {
            (Stage::Onboarding, StageEvent::ProfileCompleted) => Stage::Discovery,
            (current, StageEvent::ProfileCompleted) => current,
            (_, StageEvent::UniversityLocked) => Stage::Apply,
            (_, StageEvent::UniversityUnlocked { remaining_locked: 0 }) => Stage::Finalize,
            (current, StageEvent::UniversityUnlocked { .. }) => current,
        }
    }
}

impl Serialize for Stage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Stage::from_number(value)
            .ok_or_else(|| serde::de::Error::custom(format!("stage {value} must be 1-4")))
    }
}

/// Per-student journey state kept alongside the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub student_id: StudentId,
    pub onboarding_complete: bool,
    pub stage: Stage,
}

impl StudentRecord {
    pub fn new(student_id: StudentId) -> Self {
        Self {
            student_id,
            onboarding_complete: false,
            stage: Stage::Onboarding,
        }
    }

    /// Apply an event, returning whether the stage moved.
    pub fn apply(&mut self, event: StageEvent) -> bool {
        if event == StageEvent::ProfileCompleted {
            self.onboarding_complete = true;
        }
        let next = self.stage.transition(event);
        let changed = next != self.stage;
        self.stage = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_completion_only_advances_from_onboarding() {
        assert_eq!(
            Stage::Onboarding.transition(StageEvent::ProfileCompleted),
            Stage::Discovery
        );
        assert_eq!(
            Stage::Apply.transition(StageEvent::ProfileCompleted),
            Stage::Apply
        );
    }

    #[test]
    fn locking_always_moves_to_apply() {
        for stage in [
            Stage::Onboarding,
            Stage::Discovery,
            Stage::Finalize,
            Stage::Apply,
        ] {
            assert_eq!(stage.transition(StageEvent::UniversityLocked), Stage::Apply);
        }
    }

    #[test]
    fn unlocking_regresses_only_when_nothing_remains_locked() {
        assert_eq!(
            Stage::Apply.transition(StageEvent::UniversityUnlocked {
                remaining_locked: 0
            }),
            Stage::Finalize
        );
        assert_eq!(
            Stage::Apply.transition(StageEvent::UniversityUnlocked {
                remaining_locked: 1
            }),
            Stage::Apply
        );
    }

    #[test]
    fn stage_serializes_as_integer() {
        let json = serde_json::to_string(&Stage::Finalize).expect("serializes");
        assert_eq!(json, "3");
        let parsed: Stage = serde_json::from_str("4").expect("parses");
        assert_eq!(parsed, Stage::Apply);
        assert!(serde_json::from_str::<Stage>("5").is_err());
    }

    #[test]
    fn record_apply_reports_changes() {
        let mut record = StudentRecord::new(StudentId("stu-1".to_string()));
        assert!(record.apply(StageEvent::ProfileCompleted));
        assert!(record.onboarding_complete);
        assert!(!record.apply(StageEvent::ProfileCompleted));
        assert!(record.apply(StageEvent::UniversityLocked));
        assert_eq!(record.stage.number(), 4);
    }
}
