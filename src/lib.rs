//! Backend toolkit for an artist-portfolio site.
//!
//! Two halves:
//!
//! - [`blog`] — ingests the artist's external blog feed (Atom or RSS) into
//!   a short list of displayable posts, rewriting hosted thumbnail URLs up
//!   to display size
//! - [`storage`] and [`catalog`] — the SQLite artwork catalog
//!   (categories, galleries, artworks) plus the one-shot tools that
//!   migrated the old site's scraped data into it

pub mod blog;
pub mod catalog;
pub mod config;
pub mod storage;
pub mod util;
