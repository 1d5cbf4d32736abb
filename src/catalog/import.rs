use regex::Regex;
use thiserror::Error;

use super::fixture::ArtFixture;
use crate::storage::{Database, DatabaseError, NewArtwork};
use crate::util::slugify;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Invalid metadata pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Counters reported after an import run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportSummary {
    pub galleries: usize,
    pub artworks: usize,
    /// Fixture entries dropped for having no image URL.
    pub skipped: usize,
}

/// Mines structured metadata out of free-text artwork descriptions.
///
/// The scraped descriptions are prose ("Oil on canvas, 2021. 24 x 36
/// inches. Private collection."); these patterns pull out the fields the
/// catalog stores as columns.
pub struct MetadataMiner {
    year: Regex,
    medium: Regex,
    dimensions: Regex,
    unavailable: Regex,
}

impl MetadataMiner {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            year: Regex::new(r"\b(19|20)\d{2}\b")?,
            medium: Regex::new(
                r"(?i)\b(acrylic|oil|watercolor|pastel|charcoal|bronze|marble|mixed media)\b",
            )?,
            dimensions: Regex::new(r"(?i)\d+\s*x\s*\d+\s*(inches|cm|centimeters)")?,
            unavailable: Regex::new(r"(?i)not available|private collection|sold")?,
        })
    }

    pub fn year(&self, text: &str) -> Option<String> {
        self.year.find(text).map(|m| m.as_str().to_string())
    }

    pub fn medium(&self, text: &str) -> Option<String> {
        self.medium.find(text).map(|m| m.as_str().to_lowercase())
    }

    pub fn dimensions(&self, text: &str) -> Option<String> {
        self.dimensions.find(text).map(|m| m.as_str().to_string())
    }

    /// An artwork counts as available unless the description says otherwise.
    pub fn available(&self, text: &str) -> bool {
        !self.unavailable.is_match(text)
    }
}

/// Import a scraped fixture into the catalog under the named category.
///
/// The category is created if missing. Galleries are upserted by slug and
/// their artworks replaced wholesale, so re-running an import converges on
/// the fixture contents instead of duplicating rows. Entries without an
/// image URL are skipped and counted.
pub async fn import_fixture(
    db: &Database,
    fixture: &ArtFixture,
    category_name: &str,
) -> Result<ImportSummary, ImportError> {
    let miner = MetadataMiner::new()?;

    let category_slug = slugify(category_name);
    let category_id = match db.get_category_by_slug(&category_slug).await? {
        Some(category) => category.id,
        None => db.create_category(category_name, None, 0).await?,
    };

    let mut summary = ImportSummary::default();

    for (gallery_index, fixture_gallery) in fixture.galleries.iter().enumerate() {
        let slug = fixture_gallery.slug();
        if slug.is_empty() {
            tracing::warn!(url = %fixture_gallery.url, "Gallery URL yields no usable slug, skipping");
            summary.skipped += fixture_gallery.artworks.len();
            continue;
        }

        let gallery_id = db
            .upsert_gallery(
                category_id,
                &fixture_gallery.display_name(),
                &slug,
                gallery_index as i64,
            )
            .await?;
        db.clear_gallery_artworks(gallery_id).await?;
        summary.galleries += 1;

        for (artwork_index, entry) in fixture_gallery.artworks.iter().enumerate() {
            let image_url = entry.image_url.trim();
            if image_url.is_empty() {
                summary.skipped += 1;
                continue;
            }

            let title = match entry.title.trim() {
                "" => format!("Untitled {}", artwork_index + 1),
                t => t.to_string(),
            };
            let description = entry.description.trim();

            let artwork = NewArtwork {
                title,
                description: (!description.is_empty()).then(|| description.to_string()),
                image_url: image_url.to_string(),
                year: miner.year(description),
                medium: miner.medium(description),
                dimensions: miner.dimensions(description),
                available: miner.available(description),
                sort_order: artwork_index as i64,
            };
            db.create_artwork(gallery_id, &artwork).await?;
            summary.artworks += 1;
        }
    }

    tracing::info!(
        galleries = summary.galleries,
        artworks = summary.artworks,
        skipped = summary.skipped,
        "Fixture import complete"
    );
    Ok(summary)
}
