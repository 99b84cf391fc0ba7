use chrono::Utc;
use tracing::{debug, info, warn};

use super::{next_shortlist_id, next_todo_id, AdvisingService};
use crate::advising::domain::StudentId;
use crate::advising::error::AdvisingError;
use crate::advising::repository::{AdvisingStore, RepositoryError};
use crate::advising::shortlist::{
    sort_for_display, LockOutcome, NewShortlistEntry, ShortlistEntry, ShortlistId, UnlockOutcome,
    UNLOCK_WARNING,
};
use crate::advising::stage::{StageEvent, StudentRecord};
use crate::advising::tasks::lock_checklist;

impl<S> AdvisingService<S>
where
    S: AdvisingStore + 'static,
{
    /// Unlisted -> Shortlisted.
    pub fn add_to_shortlist(
        &self,
        student_id: &StudentId,
        request: NewShortlistEntry,
    ) -> Result<ShortlistEntry, AdvisingError> {
        self.university(&request.university_id)?;

        if self
            .store
            .entry_for_university(student_id, &request.university_id)?
            .is_some()
        {
            return Err(AdvisingError::DuplicateShortlist);
        }

        let entry = ShortlistEntry {
            id: next_shortlist_id(),
            student_id: student_id.clone(),
            university_id: request.university_id,
            category: request.category,
            locked: false,
            locked_at: None,
            ai_reason: request.ai_reason,
            risk_level: request.risk_level,
            created_at: Utc::now(),
        };

        let stored = match self.store.insert_entry(entry) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(AdvisingError::DuplicateShortlist),
            Err(other) => return Err(other.into()),
        };

        info!(
            student = %student_id.0,
            university = %stored.university_id.0,
            category = stored.category.label(),
            "university shortlisted"
        );
        Ok(stored)
    }

    pub fn shortlist(&self, student_id: &StudentId) -> Result<Vec<ShortlistEntry>, AdvisingError> {
        let mut entries = self.store.entries(student_id)?;
        sort_for_display(&mut entries);
        Ok(entries)
    }

    pub fn locked_entries(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<ShortlistEntry>, AdvisingError> {
        Ok(self
            .shortlist(student_id)?
            .into_iter()
            .filter(|entry| entry.locked)
            .collect())
    }

    /// Shortlisted -> Unlisted. Locked entries must be unlocked first.
    pub fn remove_from_shortlist(
        &self,
        student_id: &StudentId,
        id: &ShortlistId,
    ) -> Result<(), AdvisingError> {
        let entry = self.fetch_entry(student_id, id)?;
        if entry.locked {
            return Err(AdvisingError::CannotRemoveLocked);
        }

        match self.store.remove_entry(student_id, id) {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => {
                return Err(AdvisingError::NotFound("shortlist entry"))
            }
            Err(other) => return Err(other.into()),
        }

        info!(
            student = %student_id.0,
            university = %entry.university_id.0,
            "university removed from shortlist"
        );
        Ok(())
    }

    /// Shortlisted -> Locked, advancing the stage and generating the checklist.
    ///
    /// The entry flag is flipped with a conditional store write, so only one
    /// of several concurrent calls on the same entry generates tasks. The
    /// entry write, stage write, and checklist batch run as a saga: if a
    /// later step fails the earlier ones are rolled back before the storage
    /// error is returned. Locking an entry that is already locked changes
    /// nothing and creates no tasks.
    pub fn lock(
        &self,
        student_id: &StudentId,
        id: &ShortlistId,
    ) -> Result<LockOutcome, AdvisingError> {
        let entry = self.fetch_entry(student_id, id)?;
        if entry.locked {
            return self.already_locked(student_id, entry);
        }

        let university = self.university(&entry.university_id)?;
        let mut record = self.student(student_id)?;
        let now = Utc::now();
        let checklist = lock_checklist(student_id, &university, now, next_todo_id);
        let previous_entry = entry;
        let previous_record = record.clone();

        let entry = match self.store.mark_locked(student_id, id, now) {
            Ok(Some(locked)) => locked,
            Ok(None) => {
                let current = self.fetch_entry(student_id, id)?;
                return self.already_locked(student_id, current);
            }
            Err(RepositoryError::NotFound) => {
                return Err(AdvisingError::NotFound("shortlist entry"))
            }
            Err(other) => return Err(other.into()),
        };

        record.apply(StageEvent::UniversityLocked);
        if let Err(err) = self.store.save_student(record.clone()) {
            self.compensate_lock(previous_entry, None);
            return Err(err.into());
        }

        let todos_created = match self.store.insert_todos(checklist) {
            Ok(created) => created,
            Err(err) => {
                self.compensate_lock(previous_entry, Some(previous_record));
                return Err(err.into());
            }
        };

        info!(
            student = %student_id.0,
            university = %university.id.0,
            todos = todos_created.len(),
            "university locked"
        );

        Ok(LockOutcome {
            entry,
            todos_created,
            already_locked: false,
            stage: record.stage,
        })
    }

    /// Locked -> Shortlisted. Tasks generated at lock time are left in place.
    pub fn unlock(
        &self,
        student_id: &StudentId,
        id: &ShortlistId,
    ) -> Result<UnlockOutcome, AdvisingError> {
        let mut entry = self.fetch_entry(student_id, id)?;
        entry.unlock();
        self.store.update_entry(entry.clone())?;

        let remaining_locked = self
            .store
            .entries(student_id)?
            .iter()
            .filter(|other| other.locked)
            .count();

        let mut record = self.student(student_id)?;
        let stage_changed = record.apply(StageEvent::UniversityUnlocked { remaining_locked });
        if stage_changed {
            self.store.save_student(record.clone())?;
        }

        warn!(
            student = %student_id.0,
            university = %entry.university_id.0,
            remaining_locked,
            "university unlocked; generated tasks may be stale"
        );

        Ok(UnlockOutcome {
            entry,
            stage_changed,
            stage: record.stage,
            warning: UNLOCK_WARNING,
        })
    }

    fn fetch_entry(
        &self,
        student_id: &StudentId,
        id: &ShortlistId,
    ) -> Result<ShortlistEntry, AdvisingError> {
        self.store
            .entry(student_id, id)?
            .ok_or(AdvisingError::NotFound("shortlist entry"))
    }

    fn already_locked(
        &self,
        student_id: &StudentId,
        entry: ShortlistEntry,
    ) -> Result<LockOutcome, AdvisingError> {
        debug!(student = %student_id.0, entry = %entry.id.0, "entry already locked");
        let record = self.student(student_id)?;
        Ok(LockOutcome {
            entry,
            todos_created: Vec::new(),
            already_locked: true,
            stage: record.stage,
        })
    }

    fn compensate_lock(&self, entry: ShortlistEntry, record: Option<StudentRecord>) {
        if let Some(record) = record {
            if let Err(err) = self.store.save_student(record) {
                warn!(error = %err, "failed to restore stage after aborted lock");
            }
        }
        let entry_id = entry.id.0.clone();
        if let Err(err) = self.store.update_entry(entry) {
            warn!(error = %err, entry = %entry_id, "failed to restore entry after aborted lock");
        }
    }
}
