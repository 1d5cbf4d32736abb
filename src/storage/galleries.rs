use super::schema::Database;
use super::types::{DatabaseError, Gallery};
use crate::util::{slugify, strip_control_chars};

impl Database {
    /// Create a gallery under a category and return its id.
    ///
    /// `slug` overrides the name-derived slug; importers pass the slug
    /// taken from the source page URL so site links survive the import.
    pub async fn create_gallery(
        &self,
        category_id: i64,
        name: &str,
        slug: Option<&str>,
        description: Option<&str>,
        sort_order: i64,
    ) -> Result<i64, DatabaseError> {
        let name = strip_control_chars(name.trim());
        let slug = match slug {
            Some(s) => slugify(s),
            None => slugify(&name),
        };
        if slug.is_empty() {
            return Err(DatabaseError::Other(sqlx::Error::Protocol(
                "Gallery slug must contain at least one letter or digit".into(),
            )));
        }

        let row: (i64,) = sqlx::query_as(
            "INSERT INTO galleries (category_id, name, slug, description, sort_order)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(category_id)
        .bind(name.as_ref())
        .bind(&slug)
        .bind(description)
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        tracing::debug!(id = row.0, category_id, slug = %slug, "Created gallery");
        Ok(row.0)
    }

    /// Insert a gallery, or return the existing one with the same slug in
    /// the same category. Re-running an import must not duplicate galleries.
    pub async fn upsert_gallery(
        &self,
        category_id: i64,
        name: &str,
        slug: &str,
        sort_order: i64,
    ) -> Result<i64, DatabaseError> {
        let name = strip_control_chars(name.trim());
        let slug = slugify(slug);
        if slug.is_empty() {
            return Err(DatabaseError::Other(sqlx::Error::Protocol(
                "Gallery slug must contain at least one letter or digit".into(),
            )));
        }

        let row: (i64,) = sqlx::query_as(
            "INSERT INTO galleries (category_id, name, slug, sort_order)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(category_id, slug) DO UPDATE SET name = excluded.name
             RETURNING id",
        )
        .bind(category_id)
        .bind(name.as_ref())
        .bind(&slug)
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(row.0)
    }

    /// List galleries in a category ordered by sort_order, then name.
    pub async fn list_galleries(&self, category_id: i64) -> Result<Vec<Gallery>, DatabaseError> {
        sqlx::query_as(
            "SELECT * FROM galleries WHERE category_id = ? ORDER BY sort_order, name",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    /// Look up a gallery by slug across all categories.
    ///
    /// Gallery pages are addressed by slug alone, so the first match wins
    /// if two categories happen to share a slug.
    pub async fn get_gallery_by_slug(&self, slug: &str) -> Result<Option<Gallery>, DatabaseError> {
        sqlx::query_as("SELECT * FROM galleries WHERE slug = ? ORDER BY id LIMIT 1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    /// Update a gallery's description. Returns false if the id does not exist.
    pub async fn set_gallery_description(
        &self,
        id: i64,
        description: Option<&str>,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE galleries SET description = ? WHERE id = ?")
            .bind(description)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a gallery and its artworks. Returns false if the id does not exist.
    pub async fn delete_gallery(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM galleries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        if result.rows_affected() > 0 {
            tracing::debug!(id, "Deleted gallery");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
