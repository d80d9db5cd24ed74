//! Venue repository
//!
//! - list: LEFT JOIN with upcoming-show count; venues without shows count 0
//! - search: literal, case-insensitive substring on the name
//! - delete: reports rows affected; zero is a no-op, not an error

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use super::like_pattern;
use crate::db::DbError;
use crate::models::{
    EntityRef, EntitySummary, ShowTimeline, ValidVenue, Venue, VenueDetail, VenueShow,
    VenueSummaryRow,
};

/// Venue repository
pub struct VenueRepo<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> VenueRepo<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a venue, returning the stored row with its new id.
    pub async fn create(&mut self, venue: &ValidVenue) -> Result<Venue, DbError> {
        let created = sqlx::query_as::<_, Venue>(
            r#"
            INSERT INTO venues (
                name, city, state, address, phone, image_link, facebook_link,
                website, genres, seeking_talent, seeking_description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, name, city, state, address, phone, image_link, facebook_link,
                      website, genres, seeking_talent, seeking_description
            "#,
        )
        .bind(&venue.name)
        .bind(&venue.city)
        .bind(&venue.state)
        .bind(&venue.address)
        .bind(venue.phone.as_deref())
        .bind(venue.image_link.as_deref())
        .bind(venue.facebook_link.as_deref())
        .bind(venue.website.as_deref())
        .bind(venue.genres.as_slice())
        .bind(venue.seeking_talent)
        .bind(venue.seeking_description.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(created)
    }

    pub async fn get(&mut self, id: i32) -> Result<Venue, DbError> {
        sqlx::query_as::<_, Venue>(
            r#"
            SELECT id, name, city, state, address, phone, image_link, facebook_link,
                   website, genres, seeking_talent, seeking_description
            FROM venues
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "venue",
            id: id.to_string(),
        })
    }

    /// Overwrite every editable column of an existing venue.
    pub async fn update(&mut self, id: i32, venue: &ValidVenue) -> Result<Venue, DbError> {
        sqlx::query_as::<_, Venue>(
            r#"
            UPDATE venues SET
                name = $2, city = $3, state = $4, address = $5, phone = $6,
                image_link = $7, facebook_link = $8, website = $9, genres = $10,
                seeking_talent = $11, seeking_description = $12
            WHERE id = $1
            RETURNING id, name, city, state, address, phone, image_link, facebook_link,
                      website, genres, seeking_talent, seeking_description
            "#,
        )
        .bind(id)
        .bind(&venue.name)
        .bind(&venue.city)
        .bind(&venue.state)
        .bind(&venue.address)
        .bind(venue.phone.as_deref())
        .bind(venue.image_link.as_deref())
        .bind(venue.facebook_link.as_deref())
        .bind(venue.website.as_deref())
        .bind(venue.genres.as_slice())
        .bind(venue.seeking_talent)
        .bind(venue.seeking_description.as_deref())
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "venue",
            id: id.to_string(),
        })
    }

    /// Delete by id. Its shows go with it (`ON DELETE CASCADE`).
    pub async fn delete(&mut self, id: i32) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Every venue with its count of shows starting after `now`.
    ///
    /// Ordered by state, city, name so areas come out grouped.
    pub async fn list_with_upcoming(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<VenueSummaryRow>, DbError> {
        let rows = sqlx::query_as::<_, VenueSummaryRow>(
            r#"
            SELECT
                v.id,
                v.name,
                v.city,
                v.state,
                COUNT(s.venue_id) FILTER (WHERE s.start_time > $1) AS num_upcoming_shows
            FROM venues v
            LEFT JOIN shows s ON s.venue_id = v.id
            GROUP BY v.id
            ORDER BY v.state, v.city, v.name, v.id
            "#,
        )
        .bind(now)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    /// Venues whose name contains `term`, ignoring case. Empty matches all.
    pub async fn search(
        &mut self,
        term: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<EntitySummary>, DbError> {
        let rows = sqlx::query_as::<_, EntitySummary>(
            r#"
            SELECT
                v.id,
                v.name,
                COUNT(s.venue_id) FILTER (WHERE s.start_time > $2) AS num_upcoming_shows
            FROM venues v
            LEFT JOIN shows s ON s.venue_id = v.id
            WHERE v.name ILIKE $1 ESCAPE '\'
            GROUP BY v.id
            ORDER BY v.name, v.id
            "#,
        )
        .bind(like_pattern(term))
        .bind(now)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    /// Shows at this venue with their artists, newest first.
    pub async fn shows(&mut self, id: i32) -> Result<Vec<VenueShow>, DbError> {
        let rows = sqlx::query_as::<_, VenueShow>(
            r#"
            SELECT
                s.artist_id,
                a.name AS artist_name,
                a.image_link AS artist_image_link,
                s.start_time
            FROM shows s
            JOIN artists a ON a.id = s.artist_id
            WHERE s.venue_id = $1
            ORDER BY s.start_time DESC
            "#,
        )
        .bind(id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    /// Venue page: the venue plus its shows split around `now`.
    pub async fn detail(&mut self, id: i32, now: DateTime<Utc>) -> Result<VenueDetail, DbError> {
        let venue = self.get(id).await?;
        let shows = self.shows(id).await?;

        Ok(VenueDetail {
            venue,
            shows: ShowTimeline::partition(shows, now),
        })
    }

    /// Most recently listed venues.
    pub async fn recent(&mut self, limit: i64) -> Result<Vec<EntityRef>, DbError> {
        let rows = sqlx::query_as::<_, EntityRef>(
            "SELECT id, name FROM venues ORDER BY id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }
}
