//! Utility functions shared across the crate.
//!
//! - **URL validation**: security-focused validation of user-configured
//!   fetch targets (SSRF prevention)
//! - **Text folding**: slugs and match keys used by the catalog importer
//!   and the image remapper

mod text;
mod url_validator;

pub use text::{match_key, slugify, strip_control_chars, title_from_slug};
pub use url_validator::{validate_url, UrlValidationError};
