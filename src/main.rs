use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use atelier::blog;
use atelier::catalog;
use atelier::config::Config;
use atelier::storage::{Database, DatabaseError};
use atelier::util::validate_url;

/// Get the config directory path (~/.config/atelier/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("atelier"))
}

#[derive(Parser, Debug)]
#[command(name = "atelier", about = "Portfolio backend: blog feed and artwork catalog")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the blog feed and print the latest posts as JSON
    Blog {
        /// Override the configured feed URL
        #[arg(long, value_name = "URL")]
        feed_url: Option<String>,
    },

    /// Import a scraped-catalog JSON fixture into the database
    Import {
        /// Path to the fixture file
        fixture: PathBuf,

        /// Category to import into (created if missing)
        #[arg(long, default_value = "Paintings")]
        category: String,
    },

    /// Point catalog artworks at locally downloaded image files
    RemapImages {
        /// Directory holding one subdirectory of images per gallery slug
        images_dir: PathBuf,
    },

    /// List categories, galleries, and artwork counts
    Catalog,

    /// Delete and recreate the catalog database
    ResetDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // User-only access: the directory holds the catalog database
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config = Config::load(&config_dir.join("config.toml"))?;
    let db_path = config
        .database_path
        .clone()
        .unwrap_or_else(|| config_dir.join("catalog.db").display().to_string());

    match args.command {
        Command::Blog { feed_url } => {
            let feed_url = feed_url.unwrap_or_else(|| config.feed_url.clone());
            validate_url(&feed_url)
                .map_err(|e| anyhow::anyhow!("Refusing to fetch '{}': {}", feed_url, e))?;

            let client = reqwest::Client::new();
            let digest = blog::latest_posts(&client, &feed_url, &config.user_agent)
                .await
                .context("Failed to fetch blog feed")?;

            println!("{}", serde_json::to_string_pretty(&digest.posts)?);
            if digest.skipped > 0 {
                eprintln!(
                    "Note: {} entries skipped for missing required fields",
                    digest.skipped
                );
            }
        }

        Command::Import { fixture, category } => {
            let fixture = catalog::load_fixture(&fixture).context("Failed to load fixture")?;
            let db = open_database(&db_path).await?;
            let summary = catalog::import_fixture(&db, &fixture, &category)
                .await
                .context("Import failed")?;
            println!(
                "Imported {} galleries, {} artworks ({} entries skipped)",
                summary.galleries, summary.artworks, summary.skipped
            );
        }

        Command::RemapImages { images_dir } => {
            let db = open_database(&db_path).await?;
            let summary = catalog::remap_images(&db, &images_dir)
                .await
                .context("Image remap failed")?;
            println!(
                "Remapped {} artworks ({} unmatched, {} originals backed up)",
                summary.matched, summary.unmatched, summary.backed_up
            );
        }

        Command::Catalog => {
            let db = open_database(&db_path).await?;
            for category in db.list_categories().await? {
                println!("{} ({})", category.name, category.slug);
                for gallery in db.list_galleries(category.id).await? {
                    let artworks = db.list_artworks(gallery.id).await?;
                    println!("  {} — {} artworks", gallery.name, artworks.len());
                }
            }
        }

        Command::ResetDb => {
            let path = PathBuf::from(&db_path);
            if path.exists() {
                std::fs::remove_file(&path).context("Failed to delete database")?;
            }
            open_database(&db_path).await?;
            println!("Database reset.");
        }
    }

    Ok(())
}

async fn open_database(db_path: &str) -> Result<Database> {
    match Database::open(db_path).await {
        Ok(db) => Ok(db),
        Err(DatabaseError::InstanceLocked) => {
            eprintln!("Error: Another process is using the catalog database. Close it and try again.");
            std::process::exit(1);
        }
        Err(e) => Err(anyhow::anyhow!("Failed to open database: {}", e)),
    }
}
