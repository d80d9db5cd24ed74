//! Artist endpoints
//!
//! Artists are listed, searched, created and edited. There is no delete.

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
use crate::db::{self, ArtistRepo, DbError};
use crate::http::error::ApiError;
use crate::http::extractors::{RecordId, Submission, Submitted, UrlEncoded};
use crate::http::server::AppState;
use crate::models::{
    Artist, ArtistDetail, ArtistForm, ArtistPatch, EntityRef, FormChoices, SearchResults,
};

#[derive(Serialize)]
pub struct ArtistsPage {
    pub artists: Vec<EntityRef>,
}

/// GET /artists
async fn list_artists(State(state): State<Arc<AppState>>) -> Result<Json<ArtistsPage>, ApiError> {
    let mut tx = begin(&state).await?;
    let result = ArtistRepo::new(&mut tx).list().await;
    let artists = db::settle(tx, result).await?;

    Ok(Json(ArtistsPage { artists }))
}

/// POST /artists/search
async fn search_artists(
    State(state): State<Arc<AppState>>,
    UrlEncoded(search): UrlEncoded<SearchForm>,
) -> Result<Json<SearchResults>, ApiError> {
    let now = Utc::now();
    let mut tx = begin(&state).await?;
    let result = ArtistRepo::new(&mut tx).search(&search.search_term, now).await;
    let data = db::settle(tx, result).await?;

    Ok(Json(SearchResults::new(search.search_term, data)))
}

/// GET /artists/{id}
async fn show_artist(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<ArtistDetail>, ApiError> {
    let now = Utc::now();
    let mut tx = begin(&state).await?;
    let result = ArtistRepo::new(&mut tx).detail(id, now).await;

    Ok(Json(db::settle(tx, result).await?))
}

async fn create_artist_form() -> Json<Value> {
    Json(json!({
        "form": ArtistForm::default(),
        "choices": FormChoices::default()
    }))
}

/// POST /artists/create
async fn create_artist(
    State(state): State<Arc<AppState>>,
    Submitted(form): Submitted<ArtistForm>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let valid = form.validate().map_err(|errors| {
        tracing::warn!(%errors, "artist form rejected");
        ApiError::rejected(
            ArtistForm::rejection_notice(form.name.trim()),
            errors,
            &form,
        )
    })?;

    let mut tx = begin(&state).await.map_err(ApiError::write)?;
    let result = ArtistRepo::new(&mut tx).create(&valid).await;
    let artist = db::settle(tx, result).await.map_err(ApiError::write)?;

    tracing::info!(artist_id = artist.id, name = %artist.name, "artist listed");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Artist {} was successfully listed!", artist.name),
            "artist": artist
        })),
    ))
}

/// GET /artists/{id}/edit
async fn edit_artist_form(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<Value>, ApiError> {
    let mut tx = begin(&state).await?;
    let result = ArtistRepo::new(&mut tx).get(id).await;
    let artist = db::settle(tx, result).await?;

    Ok(Json(json!({
        "form": ArtistForm::from(&artist),
        "artist": artist,
        "choices": FormChoices::default()
    })))
}

/// POST /artists/{id}/edit
async fn edit_artist(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    Submitted(patch): Submitted<ArtistPatch>,
) -> Result<Json<Value>, ApiError> {
    let mut tx = begin(&state).await.map_err(ApiError::write)?;
    let result = apply_patch(&mut tx, id, patch).await;

    match db::settle(tx, result).await.map_err(ApiError::write)? {
        EditOutcome::Saved(artist) => {
            tracing::info!(artist_id = artist.id, "artist edited");
            Ok(Json(json!({
                "message": format!("Artist {} was successfully edited!", artist.name),
                "artist": artist
            })))
        }
        EditOutcome::Rejected(form, errors) => {
            tracing::warn!(artist_id = id, %errors, "artist edit rejected");
            Err(ApiError::rejected(
                ArtistPatch::rejection_notice(form.name.trim()),
                errors,
                &form,
            ))
        }
    }
}

async fn apply_patch(
    conn: &mut PgConnection,
    id: i32,
    patch: ArtistPatch,
) -> Result<EditOutcome<Artist, ArtistForm>, DbError> {
    let mut repo = ArtistRepo::new(conn);
    let stored = repo.get(id).await?;
    let form = patch.apply(&stored);

    match form.validate() {
        Ok(valid) => Ok(EditOutcome::Saved(repo.update(id, &valid).await?)),
        Err(errors) => Ok(EditOutcome::Rejected(form, errors)),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/artists", get(list_artists))
        .route("/artists/search", post(search_artists))
        .route("/artists/create", get(create_artist_form).post(create_artist))
        .route("/artists/{id}", get(show_artist))
        .route("/artists/{id}/edit", get(edit_artist_form).post(edit_artist))
}
