use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another process has the catalog database locked
    #[error("Another process appears to be using the catalog database. Close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let error_string = err.to_string().to_lowercase();

        // SQLITE_BUSY (5), SQLITE_LOCKED (6), SQLITE_CANTOPEN (14)
        if error_string.contains("database is locked")
            || error_string.contains("database table is locked")
            || error_string.contains("sqlite_busy")
            || error_string.contains("sqlite_locked")
            || error_string.contains("unable to open database file")
        {
            return DatabaseError::InstanceLocked;
        }

        DatabaseError::Other(err)
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// Top-level portfolio section (e.g. "New Work", "Sculpture").
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i64,
}

/// A gallery of artworks within a category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Gallery {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i64,
}

/// A single artwork record.
///
/// `original_image_url` holds the pre-remap URL the first time the image
/// URL is rewritten; later rewrites leave the backup untouched.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Artwork {
    pub id: i64,
    pub gallery_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub original_image_url: Option<String>,
    pub year: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub available: bool,
    pub featured: bool,
    pub sort_order: i64,
    pub created_at: i64,
}

/// Field set for inserting or fully updating an artwork.
#[derive(Debug, Clone)]
pub struct NewArtwork {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub year: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub available: bool,
    pub sort_order: i64,
}
