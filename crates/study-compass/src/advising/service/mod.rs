//! Advising service composing the catalog, classifier, shortlist state
//! machine, and task generator over an [`AdvisingStore`].

mod catalog;
mod profiles;
mod shortlist;
mod todos;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::domain::StudentId;
use super::error::AdvisingError;
use super::repository::AdvisingStore;
use super::shortlist::ShortlistId;
use super::stage::StudentRecord;
use super::todos::TodoId;

pub struct AdvisingService<S> {
    store: Arc<S>,
}

static SHORTLIST_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static TODO_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_shortlist_id() -> ShortlistId {
    let id = SHORTLIST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ShortlistId(format!("sl-{id:06}"))
}

fn next_todo_id() -> TodoId {
    let id = TODO_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TodoId(format!("todo-{id:06}"))
}

impl<S> AdvisingService<S>
where
    S: AdvisingStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Journey record for a student, starting at onboarding if none exists yet.
    pub fn student(&self, student_id: &StudentId) -> Result<StudentRecord, AdvisingError> {
        Ok(self
            .store
            .student(student_id)?
            .unwrap_or_else(|| StudentRecord::new(student_id.clone())))
    }
}
