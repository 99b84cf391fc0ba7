use tracing::info;

use super::AdvisingService;
use crate::advising::domain::{validate_profile, Profile, StudentId};
use crate::advising::error::AdvisingError;
use crate::advising::repository::AdvisingStore;
use crate::advising::scoring::ProfileStrength;
use crate::advising::stage::{StageEvent, StudentRecord};

impl<S> AdvisingService<S>
where
    S: AdvisingStore + 'static,
{
    /// Create or replace the student's profile and mark onboarding complete.
    pub fn submit_profile(
        &self,
        student_id: &StudentId,
        profile: Profile,
    ) -> Result<StudentRecord, AdvisingError> {
        validate_profile(&profile)?;
        self.store.save_profile(student_id, profile)?;

        let mut record = self.student(student_id)?;
        let advanced = record.apply(StageEvent::ProfileCompleted);
        self.store.save_student(record.clone())?;

        info!(
            student = %student_id.0,
            stage = record.stage.number(),
            advanced,
            "profile submitted"
        );

        Ok(record)
    }

    pub fn profile(&self, student_id: &StudentId) -> Result<Profile, AdvisingError> {
        self.store
            .profile(student_id)?
            .ok_or(AdvisingError::NotFound("profile"))
    }

    pub fn profile_strength(
        &self,
        student_id: &StudentId,
    ) -> Result<ProfileStrength, AdvisingError> {
        let profile = self.profile(student_id)?;
        Ok(ProfileStrength::assess(&profile))
    }
}
