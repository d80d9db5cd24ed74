//! Venue endpoints
//!
//! Listing by area, search, detail page, create, edit and delete.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::PgConnection;

use super::{begin, EditOutcome, SearchForm};
use crate::db::{self, DbError, VenueRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{DeleteId, RecordId, Submission, Submitted, UrlEncoded};
use crate::http::server::AppState;
use crate::models::{
    group_by_area, Area, FormChoices, SearchResults, Venue, VenueDetail, VenueForm, VenuePatch,
};

/// Venues page: every venue, grouped by area
#[derive(Serialize)]
pub struct VenuesPage {
    pub areas: Vec<Area>,
}

/// GET /venues
async fn list_venues(State(state): State<Arc<AppState>>) -> Result<Json<VenuesPage>, ApiError> {
    let now = Utc::now();
    let mut tx = begin(&state).await?;
    let result = VenueRepo::new(&mut tx).list_with_upcoming(now).await;
    let rows = db::settle(tx, result).await?;

    Ok(Json(VenuesPage {
        areas: group_by_area(rows),
    }))
}

/// POST /venues/search
async fn search_venues(
    State(state): State<Arc<AppState>>,
    UrlEncoded(search): UrlEncoded<SearchForm>,
) -> Result<Json<SearchResults>, ApiError> {
    let now = Utc::now();
    let mut tx = begin(&state).await?;
    let result = VenueRepo::new(&mut tx).search(&search.search_term, now).await;
    let data = db::settle(tx, result).await?;

    Ok(Json(SearchResults::new(search.search_term, data)))
}

/// GET /venues/{id}
async fn show_venue(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<VenueDetail>, ApiError> {
    let now = Utc::now();
    let mut tx = begin(&state).await?;
    let result = VenueRepo::new(&mut tx).detail(id, now).await;

    Ok(Json(db::settle(tx, result).await?))
}

/// GET /venues/create - blank form
async fn create_venue_form() -> Json<Value> {
    Json(json!({
        "form": VenueForm::default(),
        "choices": FormChoices::default()
    }))
}

/// POST /venues/create
async fn create_venue(
    State(state): State<Arc<AppState>>,
    Submitted(form): Submitted<VenueForm>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let valid = form.validate().map_err(|errors| {
        tracing::warn!(%errors, "venue form rejected");
        ApiError::rejected(
            VenueForm::rejection_notice(form.name.trim()),
            errors,
            &form,
        )
    })?;

    let mut tx = begin(&state).await.map_err(ApiError::write)?;
    let result = VenueRepo::new(&mut tx).create(&valid).await;
    let venue = db::settle(tx, result).await.map_err(ApiError::write)?;

    tracing::info!(venue_id = venue.id, name = %venue.name, "venue listed");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Venue {} was successfully listed!", venue.name),
            "venue": venue
        })),
    ))
}

/// POST|DELETE /venues/{id} - deleting a missing venue is a no-op
async fn delete_venue(
    State(state): State<Arc<AppState>>,
    DeleteId(id): DeleteId,
) -> Result<Json<Value>, ApiError> {
    let mut tx = begin(&state).await.map_err(ApiError::write)?;
    let result = VenueRepo::new(&mut tx).delete(id).await;
    let deleted = db::settle(tx, result).await.map_err(ApiError::write)?;

    let message = if deleted > 0 {
        tracing::info!(venue_id = id, "venue deleted");
        format!("Venue {} was successfully deleted.", id)
    } else {
        format!("No venue {}; nothing deleted.", id)
    };

    Ok(Json(json!({ "message": message, "deleted": deleted })))
}

/// GET /venues/{id}/edit - form prefilled from the stored venue
async fn edit_venue_form(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<Value>, ApiError> {
    let mut tx = begin(&state).await?;
    let result = VenueRepo::new(&mut tx).get(id).await;
    let venue = db::settle(tx, result).await?;

    Ok(Json(json!({
        "form": VenueForm::from(&venue),
        "venue": venue,
        "choices": FormChoices::default()
    })))
}

/// POST /venues/{id}/edit - partial update
async fn edit_venue(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    Submitted(patch): Submitted<VenuePatch>,
) -> Result<Json<Value>, ApiError> {
    let mut tx = begin(&state).await.map_err(ApiError::write)?;
    let result = apply_patch(&mut tx, id, patch).await;

    match db::settle(tx, result).await.map_err(ApiError::write)? {
        EditOutcome::Saved(venue) => {
            tracing::info!(venue_id = venue.id, "venue edited");
            Ok(Json(json!({
                "message": format!("Venue {} was successfully edited!", venue.name),
                "venue": venue
            })))
        }
        EditOutcome::Rejected(form, errors) => {
            tracing::warn!(venue_id = id, %errors, "venue edit rejected");
            Err(ApiError::rejected(
                VenuePatch::rejection_notice(form.name.trim()),
                errors,
                &form,
            ))
        }
    }
}

/// Load, merge and validate; write only if the merged form is valid.
async fn apply_patch(
    conn: &mut PgConnection,
    id: i32,
    patch: VenuePatch,
) -> Result<EditOutcome<Venue, VenueForm>, DbError> {
    let mut repo = VenueRepo::new(conn);
    let stored = repo.get(id).await?;
    let form = patch.apply(&stored);

    match form.validate() {
        Ok(valid) => Ok(EditOutcome::Saved(repo.update(id, &valid).await?)),
        Err(errors) => Ok(EditOutcome::Rejected(form, errors)),
    }
}

/// Venue routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/venues", get(list_venues))
        .route("/venues/search", post(search_venues))
        .route("/venues/create", get(create_venue_form).post(create_venue))
        .route(
            "/venues/{id}",
            get(show_venue).post(delete_venue).delete(delete_venue),
        )
        .route("/venues/{id}/edit", get(edit_venue_form).post(edit_venue))
}
