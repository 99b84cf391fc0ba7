use chrono::Utc;
use tracing::debug;

use super::{next_todo_id, AdvisingService};
use crate::advising::domain::StudentId;
use crate::advising::error::AdvisingError;
use crate::advising::repository::{AdvisingStore, RepositoryError};
use crate::advising::todos::{sort_for_display, NewTodo, Todo, TodoFilter, TodoId, TodoUpdate};

impl<S> AdvisingService<S>
where
    S: AdvisingStore + 'static,
{
    pub fn todos(
        &self,
        student_id: &StudentId,
        filter: &TodoFilter,
    ) -> Result<Vec<Todo>, AdvisingError> {
        let mut todos: Vec<Todo> = self
            .store
            .todos(student_id)?
            .into_iter()
            .filter(|todo| filter.matches(todo))
            .collect();
        sort_for_display(&mut todos);
        Ok(todos)
    }

    pub fn create_todo(
        &self,
        student_id: &StudentId,
        draft: NewTodo,
    ) -> Result<Todo, AdvisingError> {
        let todo = Todo {
            id: next_todo_id(),
            student_id: student_id.clone(),
            university_id: draft.university_id,
            task: draft.task,
            category: draft.category,
            priority: draft.priority,
            completed: false,
            due_date: draft.due_date,
            completed_at: None,
            created_at: Utc::now(),
        };

        let mut created = self.store.insert_todos(vec![todo])?;
        created
            .pop()
            .ok_or(AdvisingError::Repository(RepositoryError::Unavailable(
                "todo batch returned no records".to_string(),
            )))
    }

    pub fn update_todo(
        &self,
        student_id: &StudentId,
        id: &TodoId,
        update: TodoUpdate,
    ) -> Result<Todo, AdvisingError> {
        let mut todo = self
            .store
            .todo(student_id, id)?
            .ok_or(AdvisingError::NotFound("todo"))?;

        update.apply_to(&mut todo, Utc::now());
        self.store.update_todo(todo.clone())?;
        debug!(student = %student_id.0, todo = %id.0, completed = todo.completed, "todo updated");
        Ok(todo)
    }

    pub fn delete_todo(&self, student_id: &StudentId, id: &TodoId) -> Result<(), AdvisingError> {
        match self.store.remove_todo(student_id, id) {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(AdvisingError::NotFound("todo")),
            Err(other) => Err(other.into()),
        }
    }
}
