//! Show repository - create and list only
//!
//! A venue/artist pair holds at most one show (composite primary key); a
//! second one surfaces as a unique-constraint violation.

use sqlx::PgConnection;

use crate::db::DbError;
use crate::models::{Show, ShowListing, ValidShow};

/// Show repository
pub struct ShowRepo<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ShowRepo<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a show. Unknown venue or artist ids fail the foreign keys.
    pub async fn create(&mut self, show: &ValidShow) -> Result<Show, DbError> {
        let created = sqlx::query_as::<_, Show>(
            r#"
            INSERT INTO shows (venue_id, artist_id, start_time)
            VALUES ($1, $2, $3)
            RETURNING venue_id, artist_id, start_time
            "#,
        )
        .bind(show.venue_id)
        .bind(show.artist_id)
        .bind(show.start_time)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(created)
    }

    /// Every show with venue and artist names, newest first.
    pub async fn list(&mut self) -> Result<Vec<ShowListing>, DbError> {
        let rows = sqlx::query_as::<_, ShowListing>(
            r#"
            SELECT
                s.venue_id,
                v.name AS venue_name,
                s.artist_id,
                a.name AS artist_name,
                a.image_link AS artist_image_link,
                s.start_time
            FROM shows s
            JOIN venues v ON v.id = s.venue_id
            JOIN artists a ON a.id = s.artist_id
            ORDER BY s.start_time DESC
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }
}
