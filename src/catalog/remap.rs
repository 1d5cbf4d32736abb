use std::path::Path;
use thiserror::Error;

use crate::storage::{Database, DatabaseError};
use crate::util::match_key;

/// File extensions treated as gallery images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

#[derive(Debug, Error)]
pub enum RemapError {
    #[error("Failed to scan images directory: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Counters reported after a remap run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RemapSummary {
    /// Artworks for which a local image file was found.
    pub matched: usize,
    /// Artworks left untouched (no gallery directory or no candidate file).
    pub unmatched: usize,
    /// Artworks whose remote URL was backed up on this run.
    pub backed_up: usize,
}

#[derive(Debug)]
struct ImageFile {
    /// Normalized filename stem used for title matching.
    key: String,
    /// Site-relative path stored into the catalog.
    web_path: String,
}

#[derive(Debug)]
struct GalleryDir {
    slug: String,
    files: Vec<ImageFile>,
}

/// Point catalog artworks at locally downloaded image files.
///
/// The images directory holds one subdirectory per gallery slug. Some
/// download runs nested a second slug directory inside the first
/// (`harbor-light/harbor-light/morning.jpg`); both layouts are scanned.
/// Matching is fuzzy on normalized keys (lowercase, letters and digits
/// only): exact filename-stem match first, then substring containment,
/// then the gallery's first file as a last resort. The first rewrite of
/// each artwork backs up its remote URL (see
/// [`Database::set_artwork_image_url`]).
pub async fn remap_images(db: &Database, images_dir: &Path) -> Result<RemapSummary, RemapError> {
    let dirs = scan_images(images_dir)?;
    tracing::debug!(
        path = %images_dir.display(),
        galleries = dirs.len(),
        "Scanned local image directories"
    );

    let mut summary = RemapSummary::default();

    for category in db.list_categories().await? {
        for gallery in db.list_galleries(category.id).await? {
            let artworks = db.list_artworks(gallery.id).await?;
            let Some(dir) = find_gallery_dir(&dirs, &gallery.slug) else {
                if !artworks.is_empty() {
                    tracing::warn!(slug = %gallery.slug, "No image directory for gallery");
                    summary.unmatched += artworks.len();
                }
                continue;
            };

            for artwork in artworks {
                let Some(file) = find_image(&dir.files, &artwork.title) else {
                    tracing::warn!(
                        slug = %gallery.slug,
                        title = %artwork.title,
                        "No image file matched artwork"
                    );
                    summary.unmatched += 1;
                    continue;
                };

                if artwork.image_url != file.web_path {
                    let backed_up = db.set_artwork_image_url(artwork.id, &file.web_path).await?;
                    if backed_up {
                        summary.backed_up += 1;
                    }
                }
                summary.matched += 1;
            }
        }
    }

    tracing::info!(
        matched = summary.matched,
        unmatched = summary.unmatched,
        backed_up = summary.backed_up,
        "Image remap complete"
    );
    Ok(summary)
}

/// Collect per-gallery image files, handling the doubled-slug layout.
fn scan_images(images_dir: &Path) -> Result<Vec<GalleryDir>, std::io::Error> {
    let mut dirs = Vec::new();

    let mut entries: Vec<_> = std::fs::read_dir(images_dir)?
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let slug = entry.file_name().to_string_lossy().into_owned();

        let mut files = Vec::new();
        collect_image_files(&entry.path(), &format!("/images/{}", slug), &mut files)?;

        let nested = entry.path().join(&slug);
        if nested.is_dir() {
            collect_image_files(&nested, &format!("/images/{}/{}", slug, slug), &mut files)?;
        }

        if !files.is_empty() {
            dirs.push(GalleryDir { slug, files });
        }
    }

    Ok(dirs)
}

fn collect_image_files(
    dir: &Path,
    web_prefix: &str,
    out: &mut Vec<ImageFile>,
) -> Result<(), std::io::Error> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some((stem, extension)) = name.rsplit_once('.') else {
            continue;
        };
        if !IMAGE_EXTENSIONS.contains(&extension.to_lowercase().as_str()) {
            continue;
        }
        out.push(ImageFile {
            key: match_key(stem),
            web_path: format!("{}/{}", web_prefix, name),
        });
    }

    Ok(())
}

fn find_gallery_dir<'a>(dirs: &'a [GalleryDir], slug: &str) -> Option<&'a GalleryDir> {
    let key = match_key(slug);
    if key.is_empty() {
        return None;
    }
    dirs.iter()
        .find(|d| match_key(&d.slug) == key)
        .or_else(|| {
            dirs.iter().find(|d| {
                let dir_key = match_key(&d.slug);
                !dir_key.is_empty() && (dir_key.contains(&key) || key.contains(&dir_key))
            })
        })
}

fn find_image<'a>(files: &'a [ImageFile], title: &str) -> Option<&'a ImageFile> {
    let key = match_key(title);
    if key.is_empty() {
        return files.first();
    }
    files
        .iter()
        .find(|f| f.key == key)
        .or_else(|| {
            files
                .iter()
                .find(|f| !f.key.is_empty() && (f.key.contains(&key) || key.contains(&f.key)))
        })
        .or_else(|| files.first())
}
