//! One-shot catalog migration tools.
//!
//! The portfolio catalog was originally scraped from the old site into a
//! JSON fixture, with image files downloaded separately. Two operations
//! move that material into the database:
//!
//! - [`import_fixture`] — load scraped galleries and artworks, mining
//!   year/medium/dimensions/availability out of the prose descriptions
//! - [`remap_images`] — point artwork records at the downloaded image
//!   files by fuzzy title-to-filename matching

mod fixture;
mod import;
mod remap;

pub use fixture::{load_fixture, ArtFixture, FixtureArtwork, FixtureError, FixtureGallery};
pub use import::{import_fixture, ImportError, ImportSummary, MetadataMiner};
pub use remap::{remap_images, RemapError, RemapSummary};
