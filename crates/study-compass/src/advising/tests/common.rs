use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::advising::domain::{
    AdmissionRequirements, BudgetRange, EducationLevel, FundingPlan, GreStatus, IeltsStatus,
    IntendedDegree, Profile, SopStatus, StudentId, University, UniversityId,
};
use crate::advising::repository::{
    CatalogRepository, RepositoryError, ShortlistRepository, StudentRepository, TodoRepository,
};
use crate::advising::service::AdvisingService;
use crate::advising::shortlist::{NewShortlistEntry, ShortlistEntry, ShortlistId};
use crate::advising::stage::StudentRecord;
use crate::advising::tiers::Tier;
use crate::advising::todos::{Todo, TodoId};

pub(super) fn student() -> StudentId {
    StudentId("stu-ada".to_string())
}

pub(super) fn profile() -> Profile {
    Profile {
        education_level: EducationLevel::Bachelors,
        degree: "B.Tech Computer Engineering".to_string(),
        graduation_year: 2024,
        gpa: Some(8.1),
        intended_degree: IntendedDegree::Masters,
        field_of_study: "Computer Science".to_string(),
        target_intake: "Fall 2026".to_string(),
        preferred_countries: vec!["DE".to_string(), "CA".to_string(), "IE".to_string()],
        budget_range: BudgetRange::From20kTo40k,
        funding_plan: FundingPlan::Mixed,
        ielts_status: IeltsStatus::Completed,
        ielts_score: Some(7.5),
        gre_status: GreStatus::Preparing,
        gre_score: None,
        sop_status: SopStatus::Draft,
    }
}

pub(super) fn university(
    id: &str,
    country: &str,
    tuition: u32,
    acceptance_rate: Option<f32>,
    min_gpa: Option<f32>,
) -> University {
    University {
        id: UniversityId(id.to_string()),
        name: format!("University {id}"),
        country: country.to_string(),
        city: None,
        ranking: None,
        tuition_per_year: tuition,
        acceptance_rate,
        programs: vec!["Computer Science".to_string(), "Data Science".to_string()],
        requirements: min_gpa.map(|min_gpa| AdmissionRequirements {
            min_gpa: Some(min_gpa),
            ..AdmissionRequirements::default()
        }),
        description: None,
        website: None,
    }
}

pub(super) fn catalog() -> Vec<University> {
    let mut tum = university("tum", "DE", 3_000, Some(8.0), Some(8.5));
    tum.name = "Technical University of Munich".to_string();
    tum.ranking = Some(37);

    let mut toronto = university("uoft", "CA", 38_000, Some(43.0), Some(7.5));
    toronto.name = "University of Toronto".to_string();
    toronto.ranking = Some(21);

    let mut dublin = university("tcd", "IE", 24_000, Some(33.5), None);
    dublin.name = "Trinity College Dublin".to_string();
    dublin.ranking = Some(81);

    let mut waterloo = university("uwaterloo", "CA", 45_000, Some(53.0), None);
    waterloo.name = "University of Waterloo".to_string();

    let mut stanford = university("stanford", "US", 62_000, Some(4.0), None);
    stanford.name = "Stanford University".to_string();

    vec![tum, toronto, dublin, waterloo, stanford]
}

pub(super) fn shortlist_request(university_id: &str) -> NewShortlistEntry {
    NewShortlistEntry {
        university_id: UniversityId(university_id.to_string()),
        category: Tier::Target,
        ai_reason: Some("Strong CS faculty".to_string()),
        risk_level: None,
    }
}

pub(super) fn build_service() -> (AdvisingService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_catalog(catalog()));
    let service = AdvisingService::new(store.clone());
    (service, store)
}

#[derive(Default)]
pub(super) struct MemoryStore {
    catalog: Vec<University>,
    students: Mutex<HashMap<StudentId, StudentRecord>>,
    profiles: Mutex<HashMap<StudentId, Profile>>,
    entries: Mutex<Vec<ShortlistEntry>>,
    todos: Mutex<Vec<Todo>>,
}

impl MemoryStore {
    pub(super) fn with_catalog(catalog: Vec<University>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub(super) fn all_entries(&self) -> Vec<ShortlistEntry> {
        self.entries.lock().expect("entries mutex poisoned").clone()
    }

    pub(super) fn all_todos(&self) -> Vec<Todo> {
        self.todos.lock().expect("todos mutex poisoned").clone()
    }
}

impl CatalogRepository for MemoryStore {
    fn universities(&self) -> Result<Vec<University>, RepositoryError> {
        Ok(self.catalog.clone())
    }

    fn university(&self, id: &UniversityId) -> Result<Option<University>, RepositoryError> {
        Ok(self.catalog.iter().find(|university| &university.id == id).cloned())
    }
}

impl StudentRepository for MemoryStore {
    fn student(&self, id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        let guard = self.students.lock().expect("students mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save_student(&self, record: StudentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.students.lock().expect("students mutex poisoned");
        guard.insert(record.student_id.clone(), record);
        Ok(())
    }

    fn profile(&self, id: &StudentId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profiles mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save_profile(&self, id: &StudentId, profile: Profile) -> Result<(), RepositoryError> {
        let mut guard = self.profiles.lock().expect("profiles mutex poisoned");
        guard.insert(id.clone(), profile);
        Ok(())
    }
}

impl ShortlistRepository for MemoryStore {
    fn insert_entry(&self, entry: ShortlistEntry) -> Result<ShortlistEntry, RepositoryError> {
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        if guard.iter().any(|existing| {
            existing.student_id == entry.student_id && existing.university_id == entry.university_id
        }) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(entry.clone());
        Ok(entry)
    }

    fn update_entry(&self, entry: ShortlistEntry) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == entry.id) {
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
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        let entry = guard
            .iter_mut()
            .find(|entry| &entry.student_id == student && &entry.id == id)
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
        let guard = self.entries.lock().expect("entries mutex poisoned");
        Ok(guard
            .iter()
            .find(|entry| &entry.student_id == student && &entry.id == id)
            .cloned())
    }

    fn entry_for_university(
        &self,
        student: &StudentId,
        university: &UniversityId,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("entries mutex poisoned");
        Ok(guard
            .iter()
            .find(|entry| &entry.student_id == student && &entry.university_id == university)
            .cloned())
    }

    fn remove_entry(&self, student: &StudentId, id: &ShortlistId) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        let before = guard.len();
        guard.retain(|entry| !(&entry.student_id == student && &entry.id == id));
        if guard.len() == before {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }

    fn entries(&self, student: &StudentId) -> Result<Vec<ShortlistEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("entries mutex poisoned");
        Ok(guard
            .iter()
            .filter(|entry| &entry.student_id == student)
            .cloned()
            .collect())
    }
}

impl TodoRepository for MemoryStore {
    fn insert_todos(&self, todos: Vec<Todo>) -> Result<Vec<Todo>, RepositoryError> {
        let mut guard = self.todos.lock().expect("todos mutex poisoned");
        guard.extend(todos.iter().cloned());
        Ok(todos)
    }

    fn update_todo(&self, todo: Todo) -> Result<(), RepositoryError> {
        let mut guard = self.todos.lock().expect("todos mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == todo.id) {
            Some(existing) => {
                *existing = todo;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn todo(&self, student: &StudentId, id: &TodoId) -> Result<Option<Todo>, RepositoryError> {
        let guard = self.todos.lock().expect("todos mutex poisoned");
        Ok(guard
            .iter()
            .find(|todo| &todo.student_id == student && &todo.id == id)
            .cloned())
    }

    fn remove_todo(&self, student: &StudentId, id: &TodoId) -> Result<(), RepositoryError> {
        let mut guard = self.todos.lock().expect("todos mutex poisoned");
        let before = guard.len();
        guard.retain(|todo| !(&todo.student_id == student && &todo.id == id));
        if guard.len() == before {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }

    fn todos(&self, student: &StudentId) -> Result<Vec<Todo>, RepositoryError> {
        let guard = self.todos.lock().expect("todos mutex poisoned");
        Ok(guard
            .iter()
            .filter(|todo| &todo.student_id == student)
            .cloned()
            .collect())
    }
}

/// Wraps a [`MemoryStore`] and fails selected writes on demand.
#[derive(Default)]
pub(super) struct FlakyStore {
    pub(super) inner: MemoryStore,
    pub(super) fail_student_saves: AtomicBool,
    pub(super) fail_todo_inserts: AtomicBool,
}

impl FlakyStore {
    pub(super) fn with_catalog(catalog: Vec<University>) -> Self {
        Self {
            inner: MemoryStore::with_catalog(catalog),
            ..Self::default()
        }
    }

    fn outage() -> RepositoryError {
        RepositoryError::Unavailable("document store offline".to_string())
    }
}

impl CatalogRepository for FlakyStore {
    fn universities(&self) -> Result<Vec<University>, RepositoryError> {
        self.inner.universities()
    }

    fn university(&self, id: &UniversityId) -> Result<Option<University>, RepositoryError> {
        self.inner.university(id)
    }
}

impl StudentRepository for FlakyStore {
    fn student(&self, id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        self.inner.student(id)
    }

    fn save_student(&self, record: StudentRecord) -> Result<(), RepositoryError> {
        if self.fail_student_saves.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.save_student(record)
    }

    fn profile(&self, id: &StudentId) -> Result<Option<Profile>, RepositoryError> {
        self.inner.profile(id)
    }

    fn save_profile(&self, id: &StudentId, profile: Profile) -> Result<(), RepositoryError> {
        self.inner.save_profile(id, profile)
    }
}

impl ShortlistRepository for FlakyStore {
    fn insert_entry(&self, entry: ShortlistEntry) -> Result<ShortlistEntry, RepositoryError> {
        self.inner.insert_entry(entry)
    }

    fn update_entry(&self, entry: ShortlistEntry) -> Result<(), RepositoryError> {
        self.inner.update_entry(entry)
    }

    fn mark_locked(
        &self,
        student: &StudentId,
        id: &ShortlistId,
        at: DateTime<Utc>,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        self.inner.mark_locked(student, id, at)
    }

    fn entry(
        &self,
        student: &StudentId,
        id: &ShortlistId,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        self.inner.entry(student, id)
    }

    fn entry_for_university(
        &self,
        student: &StudentId,
        university: &UniversityId,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        self.inner.entry_for_university(student, university)
    }

    fn remove_entry(&self, student: &StudentId, id: &ShortlistId) -> Result<(), RepositoryError> {
        self.inner.remove_entry(student, id)
    }

    fn entries(&self, student: &StudentId) -> Result<Vec<ShortlistEntry>, RepositoryError> {
        self.inner.entries(student)
    }
}

impl TodoRepository for FlakyStore {
    fn insert_todos(&self, todos: Vec<Todo>) -> Result<Vec<Todo>, RepositoryError> {
        if self.fail_todo_inserts.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.insert_todos(todos)
    }

    fn update_todo(&self, todo: Todo) -> Result<(), RepositoryError> {
        self.inner.update_todo(todo)
    }

    fn todo(&self, student: &StudentId, id: &TodoId) -> Result<Option<Todo>, RepositoryError> {
        self.inner.todo(student, id)
    }

    fn remove_todo(&self, student: &StudentId, id: &TodoId) -> Result<(), RepositoryError> {
        self.inner.remove_todo(student, id)
    }

    fn todos(&self, student: &StudentId) -> Result<Vec<Todo>, RepositoryError> {
        self.inner.todos(student)
    }
}

/// Wraps a [`MemoryStore`] to reproduce interleavings of concurrent requests.
///
/// With `blind_duplicate_check` set, `entry_for_university` reports nothing so
/// duplicates are only caught by `insert_entry`. With the entry gate armed,
/// the first two `entry` reads wait for each other before returning.
pub(super) struct ContendedStore {
    pub(super) inner: MemoryStore,
    pub(super) blind_duplicate_check: AtomicBool,
    pub(super) entry_gate_armed: AtomicBool,
    gated_reads: AtomicUsize,
    entry_gate: Barrier,
}

impl ContendedStore {
    pub(super) fn with_catalog(catalog: Vec<University>) -> Self {
        Self {
            inner: MemoryStore::with_catalog(catalog),
            blind_duplicate_check: AtomicBool::new(false),
            entry_gate_armed: AtomicBool::new(false),
            gated_reads: AtomicUsize::new(0),
            entry_gate: Barrier::new(2),
        }
    }
}

impl CatalogRepository for ContendedStore {
    fn universities(&self) -> Result<Vec<University>, RepositoryError> {
        self.inner.universities()
    }

    fn university(&self, id: &UniversityId) -> Result<Option<University>, RepositoryError> {
        self.inner.university(id)
    }
}

impl StudentRepository for ContendedStore {
    fn student(&self, id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        self.inner.student(id)
    }

    fn save_student(&self, record: StudentRecord) -> Result<(), RepositoryError> {
        self.inner.save_student(record)
    }

    fn profile(&self, id: &StudentId) -> Result<Option<Profile>, RepositoryError> {
        self.inner.profile(id)
    }

    fn save_profile(&self, id: &StudentId, profile: Profile) -> Result<(), RepositoryError> {
        self.inner.save_profile(id, profile)
    }
}

impl ShortlistRepository for ContendedStore {
    fn insert_entry(&self, entry: ShortlistEntry) -> Result<ShortlistEntry, RepositoryError> {
        self.inner.insert_entry(entry)
    }

    fn update_entry(&self, entry: ShortlistEntry) -> Result<(), RepositoryError> {
        self.inner.update_entry(entry)
    }

    fn mark_locked(
        &self,
        student: &StudentId,
        id: &ShortlistId,
        at: DateTime<Utc>,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        self.inner.mark_locked(student, id, at)
    }

    fn entry(
        &self,
        student: &StudentId,
        id: &ShortlistId,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        let found = self.inner.entry(student, id);
        if self.entry_gate_armed.load(Ordering::SeqCst)
            && self.gated_reads.fetch_add(1, Ordering::SeqCst) < 2
        {
            self.entry_gate.wait();
        }
        found
    }

    fn entry_for_university(
        &self,
        student: &StudentId,
        university: &UniversityId,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        if self.blind_duplicate_check.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.entry_for_university(student, university)
    }

    fn remove_entry(&self, student: &StudentId, id: &ShortlistId) -> Result<(), RepositoryError> {
        self.inner.remove_entry(student, id)
    }

    fn entries(&self, student: &StudentId) -> Result<Vec<ShortlistEntry>, RepositoryError> {
        self.inner.entries(student)
    }
}

impl TodoRepository for ContendedStore {
    fn insert_todos(&self, todos: Vec<Todo>) -> Result<Vec<Todo>, RepositoryError> {
        self.inner.insert_todos(todos)
    }

    fn update_todo(&self, todo: Todo) -> Result<(), RepositoryError> {
        self.inner.update_todo(todo)
    }

    fn todo(&self, student: &StudentId, id: &TodoId) -> Result<Option<Todo>, RepositoryError> {
        self.inner.todo(student, id)
    }

    fn remove_todo(&self, student: &StudentId, id: &TodoId) -> Result<(), RepositoryError> {
        self.inner.remove_todo(student, id)
    }

    fn todos(&self, student: &StudentId) -> Result<Vec<Todo>, RepositoryError> {
        self.inner.todos(student)
    }
}

/// Storage that is never reachable.
pub(super) struct UnavailableStore;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl CatalogRepository for UnavailableStore {
    fn universities(&self) -> Result<Vec<University>, RepositoryError> {
        offline()
    }

    fn university(&self, _id: &UniversityId) -> Result<Option<University>, RepositoryError> {
        offline()
    }
}

impl StudentRepository for UnavailableStore {
    fn student(&self, _id: &StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        offline()
    }

    fn save_student(&self, _record: StudentRecord) -> Result<(), RepositoryError> {
        offline()
    }

    fn profile(&self, _id: &StudentId) -> Result<Option<Profile>, RepositoryError> {
        offline()
    }

    fn save_profile(&self, _id: &StudentId, _profile: Profile) -> Result<(), RepositoryError> {
        offline()
    }
}

impl ShortlistRepository for UnavailableStore {
    fn insert_entry(&self, _entry: ShortlistEntry) -> Result<ShortlistEntry, RepositoryError> {
        offline()
    }

    fn update_entry(&self, _entry: ShortlistEntry) -> Result<(), RepositoryError> {
        offline()
    }

    fn mark_locked(
        &self,
        _student: &StudentId,
        _id: &ShortlistId,
        _at: DateTime<Utc>,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        offline()
    }

    fn entry(
        &self,
        _student: &StudentId,
        _id: &ShortlistId,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        offline()
    }

    fn entry_for_university(
        &self,
        _student: &StudentId,
        _university: &UniversityId,
    ) -> Result<Option<ShortlistEntry>, RepositoryError> {
        offline()
    }

    fn remove_entry(&self, _student: &StudentId, _id: &ShortlistId) -> Result<(), RepositoryError> {
        offline()
    }

    fn entries(&self, _student: &StudentId) -> Result<Vec<ShortlistEntry>, RepositoryError> {
        offline()
    }
}

impl TodoRepository for UnavailableStore {
    fn insert_todos(&self, _todos: Vec<Todo>) -> Result<Vec<Todo>, RepositoryError> {
        offline()
    }

    fn update_todo(&self, _todo: Todo) -> Result<(), RepositoryError> {
        offline()
    }

    fn todo(&self, _student: &StudentId, _id: &TodoId) -> Result<Option<Todo>, RepositoryError> {
        offline()
    }

    fn remove_todo(&self, _student: &StudentId, _id: &TodoId) -> Result<(), RepositoryError> {
        offline()
    }

    fn todos(&self, _student: &StudentId) -> Result<Vec<Todo>, RepositoryError> {
        offline()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
