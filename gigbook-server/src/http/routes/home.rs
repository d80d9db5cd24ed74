//! Home page: the most recently listed venues and artists

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgConnection;

use super::{begin, RECENT_LIMIT};
use crate::db::{self, ArtistRepo, DbError, VenueRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::EntityRef;

#[derive(Serialize)]
pub struct HomePage {
    pub recent_venues: Vec<EntityRef>,
    pub recent_artists: Vec<EntityRef>,
}

/// GET /
async fn home(State(state): State<Arc<AppState>>) -> Result<Json<HomePage>, ApiError> {
    let mut tx = begin(&state).await?;
    let result = load_home(&mut tx).await;
    Ok(Json(db::settle(tx, result).await?))
}

async fn load_home(conn: &mut PgConnection) -> Result<HomePage, DbError> {
    let recent_venues = VenueRepo::new(conn).recent(RECENT_LIMIT).await?;
    let recent_artists = ArtistRepo::new(conn).recent(RECENT_LIMIT).await?;
    Ok(HomePage {
        recent_venues,
        recent_artists,
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(home))
}
