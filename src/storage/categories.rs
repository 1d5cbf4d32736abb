use super::schema::Database;
use super::types::{Category, DatabaseError};
use crate::util::{slugify, strip_control_chars};

impl Database {
    /// Create a category and return its id.
    ///
    /// The slug is derived from the name. Names that slugify to nothing
    /// (all punctuation, empty) are rejected.
    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
        sort_order: i64,
    ) -> Result<i64, DatabaseError> {
        let name = strip_control_chars(name.trim());
        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(DatabaseError::Other(sqlx::Error::Protocol(
                "Category name must contain at least one letter or digit".into(),
            )));
        }

        let row: (i64,) = sqlx::query_as(
            "INSERT INTO categories (name, slug, description, sort_order)
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(name.as_ref())
        .bind(&slug)
        .bind(description)
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        tracing::debug!(id = row.0, slug = %slug, "Created category");
        Ok(row.0)
    }

    /// List all categories ordered by sort_order, then name.
    pub async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        sqlx::query_as("SELECT * FROM categories ORDER BY sort_order, name")
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    /// Look up a category by its slug.
    pub async fn get_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, DatabaseError> {
        sqlx::query_as("SELECT * FROM categories WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    /// Rename a category. The slug is left untouched so existing page URLs
    /// keep working. Returns false if the id does not exist.
    pub async fn rename_category(&self, id: i64, new_name: &str) -> Result<bool, DatabaseError> {
        let name = strip_control_chars(new_name.trim());
        if name.is_empty() {
            return Ok(false);
        }

        let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
            .bind(name.as_ref())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a category. Galleries and artworks underneath it go with it
    /// via foreign-key cascade. Returns false if the id does not exist.
    pub async fn delete_category(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        if result.rows_affected() > 0 {
            tracing::debug!(id, "Deleted category");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
