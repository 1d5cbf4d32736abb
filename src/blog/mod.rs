//! Blog feed ingestion pipeline.
//!
//! Retrieves the artist's external blog feed and normalizes it into a short
//! list of displayable posts:
//!
//! - [`fetcher`] — single-shot HTTP retrieval with a custom client header
//! - [`parser`] — dialect detection (Atom vs RSS) and per-entry field
//!   extraction with a hard ten-entry cap
//! - [`image`] — thumbnail-to-display-size URL rewriting
//!
//! The pipeline is one synchronous pass per invocation: fetch, detect,
//! extract, normalize. Nothing is cached or persisted; every call
//! re-fetches the source document.

mod fetcher;
mod image;
mod parser;

pub use fetcher::{latest_posts, FetchError};
pub use image::{first_inline_image, upscale_thumbnail};
pub use parser::{detect_dialect, parse_feed, Dialect, ParseError, ParsedFeed, Post, MAX_POSTS};
