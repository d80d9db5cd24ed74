//! Artist repository
//!
//! Same read contracts as venues. Artists are created and edited, never
//! deleted through the app.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use super::like_pattern;
use crate::db::DbError;
use crate::models::{
    Artist, ArtistDetail, ArtistShow, EntityRef, EntitySummary, ShowTimeline, ValidArtist,
};

/// Artist repository
pub struct ArtistRepo<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ArtistRepo<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, artist: &ValidArtist) -> Result<Artist, DbError> {
        let created = sqlx::query_as::<_, Artist>(
            r#"
            INSERT INTO artists (
                name, city, state, phone, genres, image_link, facebook_link,
                seeking_venue, seeking_description, website
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, name, city, state, phone, genres, image_link, facebook_link,
                      seeking_venue, seeking_description, website
            "#,
        )
        .bind(&artist.name)
        .bind(&artist.city)
        .bind(&artist.state)
        .bind(artist.phone.as_deref())
        .bind(artist.genres.as_slice())
        .bind(artist.image_link.as_deref())
        .bind(artist.facebook_link.as_deref())
        .bind(artist.seeking_venue)
        .bind(artist.seeking_description.as_deref())
        .bind(artist.website.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(created)
    }

    pub async fn get(&mut self, id: i32) -> Result<Artist, DbError> {
        sqlx::query_as::<_, Artist>(
            r#"
            SELECT id, name, city, state, phone, genres, image_link, facebook_link,
                   seeking_venue, seeking_description, website
            FROM artists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "artist",
            id: id.to_string(),
        })
    }

    pub async fn update(&mut self, id: i32, artist: &ValidArtist) -> Result<Artist, DbError> {
        sqlx::query_as::<_, Artist>(
            r#"
            UPDATE artists SET
                name = $2, city = $3, state = $4, phone = $5, genres = $6,
                image_link = $7, facebook_link = $8, seeking_venue = $9,
                seeking_description = $10, website = $11
            WHERE id = $1
            RETURNING id, name, city, state, phone, genres, image_link, facebook_link,
                      seeking_venue, seeking_description, website
            "#,
        )
        .bind(id)
        .bind(&artist.name)
        .bind(&artist.city)
        .bind(&artist.state)
        .bind(artist.phone.as_deref())
        .bind(artist.genres.as_slice())
        .bind(artist.image_link.as_deref())
        .bind(artist.facebook_link.as_deref())
        .bind(artist.seeking_venue)
        .bind(artist.seeking_description.as_deref())
        .bind(artist.website.as_deref())
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "artist",
            id: id.to_string(),
        })
    }

    /// All artists, in listing order.
    pub async fn list(&mut self) -> Result<Vec<EntityRef>, DbError> {
        let rows = sqlx::query_as::<_, EntityRef>("SELECT id, name FROM artists ORDER BY id")
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(rows)
    }

    /// Artists whose name contains `term`, ignoring case. Empty matches all.
    pub async fn search(
        &mut self,
        term: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<EntitySummary>, DbError> {
        let rows = sqlx::query_as::<_, EntitySummary>(
            r#"
            SELECT
                a.id,
                a.name,
                COUNT(s.artist_id) FILTER (WHERE s.start_time > $2) AS num_upcoming_shows
            FROM artists a
            LEFT JOIN shows s ON s.artist_id = a.id
            WHERE a.name ILIKE $1 ESCAPE '\'
            GROUP BY a.id
            ORDER BY a.name, a.id
            "#,
        )
        .bind(like_pattern(term))
        .bind(now)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    /// Shows of this artist with their venues, newest first.
    pub async fn shows(&mut self, id: i32) -> Result<Vec<ArtistShow>, DbError> {
        let rows = sqlx::query_as::<_, ArtistShow>(
            r#"
            SELECT
                s.venue_id,
                v.name AS venue_name,
                v.image_link AS venue_image_link,
                s.start_time
            FROM shows s
            JOIN venues v ON v.id = s.venue_id
            WHERE s.artist_id = $1
            ORDER BY s.start_time DESC
            "#,
        )
        .bind(id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    pub async fn detail(&mut self, id: i32, now: DateTime<Utc>) -> Result<ArtistDetail, DbError> {
        let artist = self.get(id).await?;
        let shows = self.shows(id).await?;

        Ok(ArtistDetail {
            artist,
            shows: ShowTimeline::partition(shows, now),
        })
    }

    pub async fn recent(&mut self, limit: i64) -> Result<Vec<EntityRef>, DbError> {
        let rows = sqlx::query_as::<_, EntityRef>(
            "SELECT id, name FROM artists ORDER BY id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }
}
