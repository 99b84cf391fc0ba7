use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{StudentId, UniversityId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TodoId(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoCategory {
    Document,
    Exam,
    Application,
    #[default]
    General,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A follow-up task owned by a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub student_id: StudentId,
    #[serde(default)]
    pub university_id: Option<UniversityId>,
    pub task: String,
    pub category: TodoCategory,
    pub priority: Priority,
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Flip completion, stamping `completed_at` only on the transition to done.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        if completed && !self.completed {
            self.completed_at = Some(now);
        } else if !completed {
            self.completed_at = None;
        }
        self.completed = completed;
    }
}

/// Student-authored task payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub task: String,
    #[serde(default)]
    pub university_id: Option<UniversityId>,
    #[serde(default)]
    pub category: TodoCategory,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Partial edit; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub category: Option<TodoCategory>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TodoUpdate {
    pub fn apply_to(self, todo: &mut Todo, now: DateTime<Utc>) {
        if let Some(task) = self.task {
            todo.task = task;
        }
        if let Some(category) = self.category {
            todo.category = category;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = Some(due_date);
        }
        if let Some(completed) = self.completed {
            todo.set_completed(completed, now);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoFilter {
    #[serde(default)]
    pub university_id: Option<UniversityId>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TodoFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        if let Some(university_id) = &self.university_id {
            if todo.university_id.as_ref() != Some(university_id) {
                return false;
            }
        }
        match self.completed {
            Some(completed) => todo.completed == completed,
            None => true,
        }
    }
}

/// Highest priority first, then earliest due date; undated tasks trail.
pub fn sort_for_display(todos: &mut [Todo]) {
    todos.sort_by(|left, right| {
        right
            .priority
            .cmp(&left.priority)
            .then_with(|| match (left.due_date, right.due_date) {
                (Some(l), Some(r)) => l.cmp(&r),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| left.created_at.cmp(&right.created_at))
    });
}
