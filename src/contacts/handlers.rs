use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::{
    dto::{ContactUpdate, Pagination, SearchQuery},
    repo_types::{Contact, ContactDraft},
    services,
};
use crate::{auth::extractors::ActiveUser, error::AppError, state::AppState};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts/search", get(search_contacts))
        .route("/contacts/upcoming_birthdays", get(upcoming_birthdays))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/:contact_id",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
}

// --- handlers ---

#[instrument(skip(state, user, body))]
pub async fn create_contact(
    State(state): State<AppState>,
    ActiveUser(user): ActiveUser,
    body: Result<Json<ContactDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let Json(body) = body?;
    let contact = services::create(state.contacts.as_ref(), user.id, body).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

#[instrument(skip(state, user))]
pub async fn list_contacts(
    State(state): State<AppState>,
    ActiveUser(user): ActiveUser,
    page: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let Query(p) = page?;
    Ok(Json(services::list(state.contacts.as_ref(), user.id, p).await?))
}

#[instrument(skip(state, user))]
pub async fn get_contact(
    State(state): State<AppState>,
    ActiveUser(user): ActiveUser,
    contact_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Contact>, AppError> {
    let Path(contact_id) = contact_id?;
    Ok(Json(services::get(state.contacts.as_ref(), user.id, contact_id).await?))
}

#[instrument(skip(state, user, patch))]
pub async fn update_contact(
    State(state): State<AppState>,
    ActiveUser(user): ActiveUser,
    contact_id: Result<Path<i64>, PathRejection>,
    patch: Result<Json<ContactUpdate>, JsonRejection>,
) -> Result<Json<Contact>, AppError> {
    let Path(contact_id) = contact_id?;
    let Json(patch) = patch?;
    let contact = services::update(state.contacts.as_ref(), user.id, contact_id, patch).await?;
    Ok(Json(contact))
}

#[instrument(skip(state, user))]
pub async fn delete_contact(
    State(state): State<AppState>,
    ActiveUser(user): ActiveUser,
    contact_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Contact>, AppError> {
    let Path(contact_id) = contact_id?;
    Ok(Json(services::delete(state.contacts.as_ref(), user.id, contact_id).await?))
}

#[instrument(skip(state, user))]
pub async fn search_contacts(
    State(state): State<AppState>,
    ActiveUser(user): ActiveUser,
    q: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let Query(q) = q?;
    Ok(Json(services::search(state.contacts.as_ref(), user.id, &q.query).await?))
}

#[instrument(skip(state, user))]
pub async fn upcoming_birthdays(
    State(state): State<AppState>,
    ActiveUser(user): ActiveUser,
) -> Result<Json<Vec<Contact>>, AppError> {
    let today = OffsetDateTime::now_utc().date();
    Ok(Json(
        services::upcoming_birthdays(state.contacts.as_ref(), user.id, today).await?,
    ))
}
