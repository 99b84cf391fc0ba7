use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use study_compass::advising::{
    CatalogImportError, CatalogImporter, CatalogRepository, Profile, RepositoryError,
    ShortlistEntry, ShortlistId, ShortlistRepository, StudentId, StudentRecord,
    StudentRepository, Todo, TodoId, TodoRepository, University, UniversityId,
};

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog bundled with the binary, used when no export is configured.
pub(crate) fn sample_catalog() -> Result<Vec<University>, CatalogImportError> {
    CatalogImporter::from_reader(Cursor::new(SAMPLE_CATALOG))
}

pub(crate) fn load_catalog(path: Option<&Path>) -> Result<Vec<University>, CatalogImportError> {
    match path {
        Some(path) => CatalogImporter::from_path(path),
        None => sample_catalog(),
    }
}

/// Process-local store backing the HTTP service and the demo.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAdvisingStore {
    catalog: Arc<Vec<University>>,
    students: Arc<Mutex<HashMap<StudentId, StudentRecord>>>,
    profiles: Arc<Mutex<HashMap<StudentId, Profile>>>,
    entries: Arc<Mutex<HashMap<ShortlistId, ShortlistEntry>>>,
    todos: Arc<Mutex<Vec<Todo>>>,
}

impl InMemoryAdvisingStore {
    pub(crate) fn with_catalog(catalog: Vec<University>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            ..Self::default()
        }
    }
}

impl CatalogRepository for InMemoryAdvisingStore {
    fn universities(&self) -> Result<Vec<University>, RepositoryError> {
        Ok(self.catalog.as_ref().clone())
    }

    fn university(&self, id: &UniversityId) -> Result<Option<University>, RepositoryError> {
        Ok(self.catalog.iter().find(|university| &university.id == id).cloned())
    }
}

impl StudentRepository for InMemoryAdvisingStore {
    fn student(&self, id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        let guard = self.students.lock().expect("student mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save_student(&self, record: StudentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.students.lock().expect("student mutex poisoned");
        guard.insert(record.student_id.clone(), record);
        Ok(())
    }

    fn profile(&self, id: &StudentId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save_profile(&self, id: &StudentId, profile: Profile) -> Result<(), RepositoryError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(id.clone(), profile);
        Ok(())
    }
}

impl ShortlistRepository for InMemoryAdvisingStore {
    fn insert_entry(&self, entry: ShortlistEntry) -> Result<ShortlistEntry, RepositoryError> {
        let mut guard = self.entries.lock().expect("shortlist mutex poisoned");
        let duplicate = guard.values().any(|existing| {
            existing.student_id == entry.student_id && existing.university_id == entry.university_id
        });
        if duplicate || guard.contains_key(&entry.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    fn update_entry(&self, entry: ShortlistEntry) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("shortlist mutex poisoned");
        match guard.get_mut(&entry.id) {
            Some(existing) => {
                *existing = entry;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn mark_locked(
        &self,
        student: &StudentId,
        id: &ShortlistId,
        at: DateTime<Utc>,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        let mut guard = self.entries.lock().expect("shortlist mutex poisoned");
        let entry = guard
            .get_mut(id)
            .filter(|entry| &entry.student_id == student)
            .ok_or(RepositoryError::NotFound)?;
        if entry.locked {
            return Ok(None);
        }
        entry.lock(at);
        Ok(Some(entry.clone()))
    }

    fn entry(
        &self,
        student: &StudentId,
        id: &ShortlistId,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("shortlist mutex poisoned");
        Ok(guard
            .get(id)
            .filter(|entry| &entry.student_id == student)
            .cloned())
    }

    fn entry_for_university(
        &self,
        student: &StudentId,
        university: &UniversityId,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("shortlist mutex poisoned");
        Ok(guard
            .values()
            .find(|entry| &entry.student_id == student && &entry.university_id == university)
            .cloned())
    }

    fn remove_entry(&self, student: &StudentId, id: &ShortlistId) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("shortlist mutex poisoned");
        match guard.get(id) {
            Some(entry) if &entry.student_id == student => {
                guard.remove(id);
                Ok(())
            }
            _ => Err(RepositoryError::NotFound),
        }
    }

    fn entries(&self, student: &StudentId) -> Result<Vec<ShortlistEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("shortlist mutex poisoned");
        Ok(guard
            .values()
            .filter(|entry| &entry.student_id == student)
            .cloned()
            .collect())
    }
}

impl TodoRepository for InMemoryAdvisingStore {
    fn insert_todos(&self, todos: Vec<Todo>) -> Result<Vec<Todo>, RepositoryError> {
        let mut guard = self.todos.lock().expect("todo mutex poisoned");
        guard.extend(todos.iter().cloned());
        Ok(todos)
    }

    fn update_todo(&self, todo: Todo) -> Result<(), RepositoryError> {
        let mut guard = self.todos.lock().expect("todo mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == todo.id) {
            Some(existing) => {
                *existing = todo;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn todo(&self, student: &StudentId, id: &TodoId) -> Result<Option<Todo>, RepositoryError> {
        let guard = self.todos.lock().expect("todo mutex poisoned");
        Ok(guard
            .iter()
            .find(|todo| &todo.student_id == student && &todo.id == id)
            .cloned())
    }

    fn remove_todo(&self, student: &StudentId, id: &TodoId) -> Result<(), RepositoryError> {
        let mut guard = self.todos.lock().expect("todo mutex poisoned");
        let position = guard
            .iter()
            .position(|todo| &todo.student_id == student && &todo.id == id)
            .ok_or(RepositoryError::NotFound)?;
        guard.remove(position);
        Ok(())
    }

    fn todos(&self, student: &StudentId) -> Result<Vec<Todo>, RepositoryError> {
        let guard = self.todos.lock().expect("todo mutex poisoned");
        Ok(guard
            .iter()
            .filter(|todo| &todo.student_id == student)
            .cloned()
            .collect())
    }
}
