use super::schema::Database;
use super::types::{Artwork, DatabaseError, NewArtwork};
use crate::util::strip_control_chars;

impl Database {
    /// Insert an artwork into a gallery and return its id.
    pub async fn create_artwork(
        &self,
        gallery_id: i64,
        artwork: &NewArtwork,
    ) -> Result<i64, DatabaseError> {
        let title = strip_control_chars(artwork.title.trim());
        if title.is_empty() {
            return Err(DatabaseError::Other(sqlx::Error::Protocol(
                "Artwork title must not be empty".into(),
            )));
        }

        let row: (i64,) = sqlx::query_as(
            "INSERT INTO artworks
               (gallery_id, title, description, image_url, year, medium,
                dimensions, available, sort_order, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(gallery_id)
        .bind(title.as_ref())
        .bind(&artwork.description)
        .bind(&artwork.image_url)
        .bind(&artwork.year)
        .bind(&artwork.medium)
        .bind(&artwork.dimensions)
        .bind(artwork.available)
        .bind(artwork.sort_order)
        .bind(chrono::Utc::now().timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(row.0)
    }

    /// Fetch a single artwork by id.
    pub async fn get_artwork(&self, id: i64) -> Result<Option<Artwork>, DatabaseError> {
        sqlx::query_as("SELECT * FROM artworks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    /// List artworks in a gallery ordered by sort_order, then id.
    pub async fn list_artworks(&self, gallery_id: i64) -> Result<Vec<Artwork>, DatabaseError> {
        sqlx::query_as("SELECT * FROM artworks WHERE gallery_id = ? ORDER BY sort_order, id")
            .bind(gallery_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    /// List featured artworks across all galleries.
    pub async fn list_featured_artworks(&self) -> Result<Vec<Artwork>, DatabaseError> {
        sqlx::query_as("SELECT * FROM artworks WHERE featured = 1 ORDER BY sort_order, id")
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    /// Replace all editable fields of an artwork. Returns false if the id
    /// does not exist.
    pub async fn update_artwork(
        &self,
        id: i64,
        artwork: &NewArtwork,
    ) -> Result<bool, DatabaseError> {
        let title = strip_control_chars(artwork.title.trim());
        if title.is_empty() {
            return Err(DatabaseError::Other(sqlx::Error::Protocol(
                "Artwork title must not be empty".into(),
            )));
        }

        let result = sqlx::query(
            "UPDATE artworks SET
               title = ?, description = ?, image_url = ?, year = ?,
               medium = ?, dimensions = ?, available = ?, sort_order = ?
             WHERE id = ?",
        )
        .bind(title.as_ref())
        .bind(&artwork.description)
        .bind(&artwork.image_url)
        .bind(&artwork.year)
        .bind(&artwork.medium)
        .bind(&artwork.dimensions)
        .bind(artwork.available)
        .bind(artwork.sort_order)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Rewrite an artwork's image URL, backing up the current URL into
    /// `original_image_url` the first time. Later rewrites keep the first
    /// backup so the pre-remap URL is never lost.
    ///
    /// Returns true if this call created the backup.
    pub async fn set_artwork_image_url(
        &self,
        id: i64,
        new_url: &str,
    ) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from_sqlx)?;

        let backed_up: Option<(bool,)> =
            sqlx::query_as("SELECT original_image_url IS NULL FROM artworks WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(DatabaseError::from_sqlx)?;
        let Some((first_rewrite,)) = backed_up else {
            return Err(DatabaseError::Other(sqlx::Error::RowNotFound));
        };

        sqlx::query(
            "UPDATE artworks SET
               original_image_url = COALESCE(original_image_url, image_url),
               image_url = ?
             WHERE id = ?",
        )
        .bind(new_url)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        tx.commit().await.map_err(DatabaseError::from_sqlx)?;
        Ok(first_rewrite)
    }

    /// Mark or unmark an artwork as featured. Returns false if the id does
    /// not exist.
    pub async fn set_artwork_featured(
        &self,
        id: i64,
        featured: bool,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE artworks SET featured = ? WHERE id = ?")
            .bind(featured)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every artwork in a gallery. Returns the number removed.
    pub async fn clear_gallery_artworks(&self, gallery_id: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM artworks WHERE gallery_id = ?")
            .bind(gallery_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        Ok(result.rows_affected())
    }

    /// Delete an artwork. Returns false if the id does not exist.
    pub async fn delete_artwork(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM artworks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }
}
