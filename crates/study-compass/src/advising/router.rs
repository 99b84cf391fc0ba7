use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Json, Router,
};
use serde_json::json;

use super::catalog::CatalogQuery;
use super::domain::{Profile, StudentId, UniversityId};
use super::error::AdvisingError;
use super::repository::{AdvisingStore, RepositoryError};
use super::service::AdvisingService;
use super::shortlist::{NewShortlistEntry, ShortlistId};
use super::todos::{NewTodo, TodoFilter, TodoId, TodoUpdate};

impl AdvisingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdvisingError::ProfileIncomplete | AdvisingError::CannotRemoveLocked => {
                StatusCode::BAD_REQUEST
            }
            AdvisingError::InvalidProfile(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AdvisingError::DuplicateShortlist => StatusCode::CONFLICT,
            AdvisingError::NotFound(_) | AdvisingError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            AdvisingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AdvisingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Router builder exposing catalog, profile, recommendation, shortlist, and
/// todo endpoints.
pub fn advising_router<S>(service: Arc<AdvisingService<S>>) -> Router
where
    S: AdvisingStore + 'static,
{
    Router::new()
        .route("/api/v1/universities", get(universities_handler::<S>))
        .route(
            "/api/v1/universities/:university_id",
            get(university_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/profile",
            get(profile_handler::<S>).put(submit_profile_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/profile/strength",
            get(strength_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/stage",
            get(stage_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/recommendations",
            get(recommendations_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/shortlist",
            get(shortlist_handler::<S>).post(add_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/shortlist/locked",
            get(locked_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/shortlist/:entry_id",
            delete(remove_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/shortlist/:entry_id/lock",
            put(lock_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/shortlist/:entry_id/unlock",
            put(unlock_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/todos",
            get(todos_handler::<S>).post(create_todo_handler::<S>),
        )
        .route(
            "/api/v1/students/:student_id/todos/:todo_id",
            put(update_todo_handler::<S>).delete(delete_todo_handler::<S>),
        )
        .with_state(service)
}

type Service<S> = State<Arc<AdvisingService<S>>>;

pub(crate) async fn universities_handler<S>(
    State(service): Service<S>,
    Query(query): Query<CatalogQuery>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let universities = service.universities(&query)?;
    Ok(Json(universities).into_response())
}

pub(crate) async fn university_handler<S>(
    State(service): Service<S>,
    Path(university_id): Path<String>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let university = service.university(&UniversityId(university_id))?;
    Ok(Json(university).into_response())
}

pub(crate) async fn profile_handler<S>(
    State(service): Service<S>,
    Path(student_id): Path<String>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let profile = service.profile(&StudentId(student_id))?;
    Ok(Json(profile).into_response())
}

pub(crate) async fn submit_profile_handler<S>(
    State(service): Service<S>,
    Path(student_id): Path<String>,
    Json(profile): Json<Profile>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let student_id = StudentId(student_id);
    let record = service.submit_profile(&student_id, profile.clone())?;
    let payload = json!({
        "profile": profile,
        "stage": record.stage,
        "onboardingComplete": record.onboarding_complete,
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn strength_handler<S>(
    State(service): Service<S>,
    Path(student_id): Path<String>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let strength = service.profile_strength(&StudentId(student_id))?;
    Ok(Json(strength).into_response())
}

pub(crate) async fn stage_handler<S>(
    State(service): Service<S>,
    Path(student_id): Path<String>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let record = service.student(&StudentId(student_id))?;
    Ok(Json(record).into_response())
}

pub(crate) async fn recommendations_handler<S>(
    State(service): Service<S>,
    Path(student_id): Path<String>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let recommendations = service.recommend(&StudentId(student_id))?;
    Ok(Json(recommendations).into_response())
}

pub(crate) async fn shortlist_handler<S>(
    State(service): Service<S>,
    Path(student_id): Path<String>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let entries = service.shortlist(&StudentId(student_id))?;
    Ok(Json(entries).into_response())
}

pub(crate) async fn locked_handler<S>(
    State(service): Service<S>,
    Path(student_id): Path<String>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let entries = service.locked_entries(&StudentId(student_id))?;
    Ok(Json(entries).into_response())
}

pub(crate) async fn add_handler<S>(
    State(service): Service<S>,
    Path(student_id): Path<String>,
    Json(request): Json<NewShortlistEntry>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let entry = service.add_to_shortlist(&StudentId(student_id), request)?;
    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

pub(crate) async fn remove_handler<S>(
    State(service): Service<S>,
    Path((student_id, entry_id)): Path<(String, String)>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    service.remove_from_shortlist(&StudentId(student_id), &ShortlistId(entry_id))?;
    Ok(Json(json!({ "message": "Removed from shortlist" })).into_response())
}

pub(crate) async fn lock_handler<S>(
    State(service): Service<S>,
    Path((student_id, entry_id)): Path<(String, String)>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let outcome = service.lock(&StudentId(student_id), &ShortlistId(entry_id))?;
    Ok(Json(outcome).into_response())
}

pub(crate) async fn unlock_handler<S>(
    State(service): Service<S>,
    Path((student_id, entry_id)): Path<(String, String)>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let outcome = service.unlock(&StudentId(student_id), &ShortlistId(entry_id))?;
    Ok(Json(outcome).into_response())
}

pub(crate) async fn todos_handler<S>(
    State(service): Service<S>,
    Path(student_id): Path<String>,
    Query(filter): Query<TodoFilter>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let todos = service.todos(&StudentId(student_id), &filter)?;
    Ok(Json(todos).into_response())
}

pub(crate) async fn create_todo_handler<S>(
    State(service): Service<S>,
    Path(student_id): Path<String>,
    Json(draft): Json<NewTodo>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let todo = service.create_todo(&StudentId(student_id), draft)?;
    Ok((StatusCode::CREATED, Json(todo)).into_response())
}

pub(crate) async fn update_todo_handler<S>(
    State(service): Service<S>,
    Path((student_id, todo_id)): Path<(String, String)>,
    Json(update): Json<TodoUpdate>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    let todo = service.update_todo(&StudentId(student_id), &TodoId(todo_id), update)?;
    Ok(Json(todo).into_response())
}

pub(crate) async fn delete_todo_handler<S>(
    State(service): Service<S>,
    Path((student_id, todo_id)): Path<(String, String)>,
) -> Result<Response, AdvisingError>
where
    S: AdvisingStore + 'static,
{
    service.delete_todo(&StudentId(student_id), &TodoId(todo_id))?;
    Ok(Json(json!({ "message": "Todo deleted" })).into_response())
}
