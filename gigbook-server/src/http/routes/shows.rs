//! Show endpoints: list every show, and book a new one

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use super::begin;
use crate::db::{self, ShowRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{Submission, Submitted};
use crate::http::server::AppState;
use crate::models::{ShowForm, ShowListing};

#[derive(Serialize)]
pub struct ShowsPage {
    pub shows: Vec<ShowListing>,
}

/// GET /shows
async fn list_shows(State(state): State<Arc<AppState>>) -> Result<Json<ShowsPage>, ApiError> {
    let mut tx = begin(&state).await?;
    let result = ShowRepo::new(&mut tx).list().await;
    let shows = db::settle(tx, result).await?;

    Ok(Json(ShowsPage { shows }))
}

/// GET /shows/create - start time preset to now
async fn create_show_form() -> Json<Value> {
    Json(json!({ "form": ShowForm::blank(Utc::now()) }))
}

/// POST /shows/create
///
/// Unknown venue or artist ids, or a second show for the same pair, fail
/// in the database and come back as a 400.
async fn create_show(
    State(state): State<Arc<AppState>>,
    Submitted(form): Submitted<ShowForm>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let valid = form.validate().map_err(|errors| {
        tracing::warn!(%errors, "show form rejected");
        ApiError::rejected(ShowForm::rejection_notice(""), errors, &form)
    })?;

    let mut tx = begin(&state).await.map_err(ApiError::write)?;
    let result = ShowRepo::new(&mut tx).create(&valid).await;
    let show = db::settle(tx, result).await.map_err(ApiError::write)?;

    tracing::info!(
        venue_id = show.venue_id,
        artist_id = show.artist_id,
        start_time = %show.start_time,
        "show listed"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Show was successfully listed!",
            "show": show
        })),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows", get(list_shows))
        .route("/shows/create", get(create_show_form).post(create_show))
}
