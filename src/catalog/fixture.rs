use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::util::{slugify, title_from_slug};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in fixture file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Root of a scraped-catalog fixture file.
///
/// The fixture is a JSON dump of the old site: one object per gallery page,
/// holding the page URL and the artworks scraped from it.
#[derive(Debug, Deserialize)]
pub struct ArtFixture {
    pub galleries: Vec<FixtureGallery>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureGallery {
    /// Source page URL; the gallery slug is derived from its last segment.
    pub url: String,

    #[serde(rename = "gallery", default)]
    pub artworks: Vec<FixtureArtwork>,
}

impl FixtureGallery {
    /// Gallery slug derived from the page URL's final path segment.
    ///
    /// `https://example.com/p/playful-chaos.html` → `playful-chaos`.
    pub fn slug(&self) -> String {
        let trimmed = self.url.trim_end_matches('/');
        let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
        let stem = last.strip_suffix(".html").unwrap_or(last);
        slugify(stem)
    }

    /// Human-readable gallery name reconstructed from the slug.
    pub fn display_name(&self) -> String {
        title_from_slug(&self.slug())
    }
}

/// A scraped artwork. All fields default to empty: the scrape is lossy and
/// the importer decides what a usable record needs.
#[derive(Debug, Default, Deserialize)]
pub struct FixtureArtwork {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

/// Read and parse a fixture file.
pub fn load_fixture(path: &Path) -> Result<ArtFixture, FixtureError> {
    let content = std::fs::read_to_string(path)?;
    let fixture: ArtFixture = serde_json::from_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        galleries = fixture.galleries.len(),
        "Loaded catalog fixture"
    );
    Ok(fixture)
}
