//! SQLite-backed catalog storage.
//!
//! Three tables model the portfolio: categories contain galleries, galleries
//! contain artworks. Deletes cascade downward. All access goes through
//! [`Database`], one impl block per table.

mod artworks;
mod categories;
mod galleries;
mod schema;
mod types;

pub use schema::Database;
pub use types::{Artwork, Category, DatabaseError, Gallery, NewArtwork};
