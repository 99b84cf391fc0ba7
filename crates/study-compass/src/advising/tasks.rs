//! Checklist generated when a student locks a university.

use chrono::{DateTime, Utc};

use super::domain::{StudentId, University};
use super::todos::{Priority, Todo, TodoCategory, TodoId};

const UNIVERSITY_PLACEHOLDER: &str = "{university}";

struct TaskTemplate {
    text: &'static str,
    category: TodoCategory,
    priority: Priority,
}

const LOCK_CHECKLIST: [TaskTemplate; 6] = [
    TaskTemplate {
        text: "Research {university} admission requirements",
        category: TodoCategory::General,
        priority: Priority::High,
    },
    TaskTemplate {
        text: "Prepare SOP for {university}",
        category: TodoCategory::Document,
        priority: Priority::High,
    },
    TaskTemplate {
        text: "Complete IELTS/TOEFL if not done",
        category: TodoCategory::Exam,
        priority: Priority::High,
    },
    TaskTemplate {
        text: "Gather academic transcripts",
        category: TodoCategory::Document,
        priority: Priority::Medium,
    },
    TaskTemplate {
        text: "Get letters of recommendation",
        category: TodoCategory::Document,
        priority: Priority::Medium,
    },
    TaskTemplate {
        text: "Check application deadline for {university}",
        category: TodoCategory::Application,
        priority: Priority::High,
    },
];

/// Number of tasks produced per lock.
pub const LOCK_CHECKLIST_LEN: usize = LOCK_CHECKLIST.len();

/// Build the post-lock checklist for `university`.
///
/// Pure: persisting the batch is the caller's job, and it must happen once
/// per lock transition.
pub fn lock_checklist(
    student_id: &StudentId,
    university: &University,
    now: DateTime<Utc>,
    mut next_id: impl FnMut() -> TodoId,
) -> Vec<Todo> {
    LOCK_CHECKLIST
        .iter()
        .map(|template| Todo {
            id: next_id(),
            student_id: student_id.clone(),
            university_id: Some(university.id.clone()),
            task: template.text.replace(UNIVERSITY_PLACEHOLDER, &university.name),
            category: template.category,
            priority: template.priority,
            completed: false,
            due_date: None,
            completed_at: None,
            created_at: now,
        })
        .collect()
}
