use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use thiserror::Error;

use super::image::{first_inline_image, upscale_thumbnail};

/// Hard cap on the number of entry blocks examined per document.
///
/// The cap is a scan budget, not a post-hoc truncation: once this many
/// entries have been opened, the rest of the document is not read. Entries
/// dropped for missing fields still consume budget.
pub const MAX_POSTS: usize = 10;

/// The two feed dialects the blog source is known to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Atom,
    Rss,
}

/// A normalized blog post ready for display.
///
/// `published` is the dialect-native timestamp string (ISO 8601-ish for
/// Atom, RFC 822-ish for RSS); parsing and localization are the consumer's
/// concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub title: String,
    pub link: String,
    pub published: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Result of one parse pass over a feed document.
///
/// `skipped` counts entry blocks dropped for missing required fields; they
/// are a diagnostic signal only and never an error.
#[derive(Debug)]
pub struct ParsedFeed {
    pub dialect: Dialect,
    pub posts: Vec<Post>,
    pub skipped: usize,
}

/// Errors from parsing a feed document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed enough to scan.
    #[error("XML parse error: {0}")]
    Xml(String),
}

/// Classifies a raw feed document as Atom or RSS.
///
/// A single substring test on the Atom entry marker, not schema validation:
/// the two dialects are structurally disjoint for this source. Documents
/// matching neither marker fall back to RSS extraction (which then yields
/// zero posts); a warning is logged so the case is visible.
pub fn detect_dialect(document: &str) -> Dialect {
    if document.contains("<entry>") {
        Dialect::Atom
    } else {
        if !has_rss_marker(document) {
            tracing::warn!("Document matches neither dialect marker, defaulting to RSS");
        }
        Dialect::Rss
    }
}

/// True when the document carries any RSS structure at all. An empty
/// channel with no items is still recognizably RSS and should not trip
/// the unknown-dialect warning.
fn has_rss_marker(document: &str) -> bool {
    document.contains("<item") || document.contains("<rss") || document.contains("<channel")
}

/// Which element's text is currently being captured inside an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Title,
    Link,
    Published,
    Body,
}

/// Field accumulator for one entry block.
#[derive(Debug, Default)]
struct EntryDraft {
    title: Option<String>,
    link: Option<String>,
    published: Option<String>,
    thumbnail: Option<String>,
    body: Option<String>,
    /// First `<img>` seen as real markup inside the body element
    /// (unescaped XHTML content, as opposed to HTML-escaped text).
    markup_img: Option<String>,
}

impl EntryDraft {
    /// Builds a post if title, link, and published all extracted non-empty.
    /// The image is best-effort: dedicated thumbnail first, then the first
    /// `<img>` in the body, upscaled either way.
    fn into_post(self) -> Option<Post> {
        let title = non_empty(self.title)?;
        let link = non_empty(self.link)?;
        let published = non_empty(self.published)?;

        let image = non_empty(self.thumbnail)
            .or_else(|| self.body.as_deref().and_then(first_inline_image))
            .or(self.markup_img)
            .map(|url| upscale_thumbnail(url.trim()));

        Some(Post {
            title,
            link,
            published,
            image,
        })
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    let trimmed = field?.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Extracts at most [`MAX_POSTS`] posts from a raw feed document.
///
/// Detects the dialect, then walks the document once with an XML event
/// reader, isolating entry blocks and pulling the dialect-specific fields.
/// Entries missing title, link, or the publish timestamp are dropped and
/// counted in [`ParsedFeed::skipped`]; a missing image never drops an entry.
///
/// # Errors
///
/// Returns [`ParseError::Xml`] when the reader cannot make sense of the
/// document structure (mismatched tags, truncated markup). Text that is
/// merely not a feed parses cleanly to zero posts.
pub fn parse_feed(document: &str) -> Result<ParsedFeed, ParseError> {
    let dialect = detect_dialect(document);

    let (entry_tag, date_tag, body_tag): (&[u8], &[u8], &[u8]) = match dialect {
        Dialect::Atom => (b"entry", b"published", b"content"),
        Dialect::Rss => (b"item", b"pubDate", b"description"),
    };

    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);

    let mut posts = Vec::new();
    let mut skipped = 0usize;
    let mut examined = 0usize;
    let mut in_entry = false;
    let mut draft = EntryDraft::default();
    let mut capture: Option<Capture> = None;
    let mut capture_buf = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if !in_entry && e.name().as_ref() == entry_tag => {
                if examined == MAX_POSTS {
                    break;
                }
                examined += 1;
                in_entry = true;
                draft = EntryDraft::default();
                capture = None;
            }
            Ok(Event::Start(e)) if in_entry => {
                handle_field_open(
                    &e, &reader, dialect, date_tag, body_tag, &mut draft, &mut capture,
                    &mut capture_buf,
                );
            }
            Ok(Event::Empty(e)) if in_entry => {
                handle_empty_element(&e, &reader, dialect, &mut draft, capture);
            }
            Ok(Event::End(e)) if in_entry && e.name().as_ref() == entry_tag => {
                in_entry = false;
                capture = None;
                match std::mem::take(&mut draft).into_post() {
                    Some(post) => posts.push(post),
                    None => {
                        skipped += 1;
                        tracing::debug!(entry = examined, "Dropping entry with missing fields");
                    }
                }
            }
            Ok(Event::End(e)) if in_entry => {
                if let Some(target) = capture {
                    if end_matches(target, e.name().as_ref(), date_tag, body_tag) {
                        commit_capture(target, &mut capture_buf, &mut draft);
                        capture = None;
                    }
                }
            }
            Ok(Event::Text(t)) if in_entry && capture.is_some() => {
                // Unknown entities degrade to the raw node text rather than
                // failing the entry.
                match t.unescape() {
                    Ok(text) => capture_buf.push_str(&text),
                    Err(_) => capture_buf.push_str(&String::from_utf8_lossy(t.as_ref())),
                }
            }
            Ok(Event::CData(t)) if in_entry && capture.is_some() => {
                capture_buf.push_str(&String::from_utf8_lossy(t.as_ref()));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ParseError::Xml(e.to_string())),
        }
        buf.clear();
    }

    Ok(ParsedFeed {
        dialect,
        posts,
        skipped,
    })
}

/// Dispatches a start tag inside an entry to the right field.
#[allow(clippy::too_many_arguments)]
fn handle_field_open(
    e: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
    dialect: Dialect,
    date_tag: &[u8],
    body_tag: &[u8],
    draft: &mut EntryDraft,
    capture: &mut Option<Capture>,
    capture_buf: &mut String,
) {
    // A capture in progress means we are inside a field element (e.g. real
    // XHTML markup inside <content>); the only thing worth noticing there
    // is an inline image.
    if capture.is_some() {
        if e.name().as_ref() == b"img" && draft.markup_img.is_none() {
            draft.markup_img = attr_value(e, reader, b"src");
        }
        return;
    }

    let name = e.name();
    let name = name.as_ref();

    if name == b"title" && draft.title.is_none() {
        *capture = Some(Capture::Title);
        capture_buf.clear();
    } else if name == date_tag && draft.published.is_none() {
        *capture = Some(Capture::Published);
        capture_buf.clear();
    } else if name == body_tag && draft.body.is_none() {
        *capture = Some(Capture::Body);
        capture_buf.clear();
    } else if name == b"link" {
        match dialect {
            // Atom carries the URL in the href of the rel="alternate" link.
            Dialect::Atom => {
                if draft.link.is_none() {
                    if let Some(href) = alternate_href(e, reader) {
                        draft.link = Some(href);
                    }
                }
            }
            // RSS carries it as element text.
            Dialect::Rss => {
                if draft.link.is_none() {
                    *capture = Some(Capture::Link);
                    capture_buf.clear();
                }
            }
        }
    } else if name == b"media:thumbnail" && draft.thumbnail.is_none() {
        draft.thumbnail = attr_value(e, reader, b"url");
    }
}

/// Self-closing elements inside an entry: Atom links, media thumbnails, and
/// bare `<img/>` tags inside unescaped body markup.
fn handle_empty_element(
    e: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
    dialect: Dialect,
    draft: &mut EntryDraft,
    capture: Option<Capture>,
) {
    if capture.is_some() {
        if e.name().as_ref() == b"img" && draft.markup_img.is_none() {
            draft.markup_img = attr_value(e, reader, b"src");
        }
        return;
    }

    let name = e.name();
    let name = name.as_ref();

    if name == b"link" && dialect == Dialect::Atom && draft.link.is_none() {
        if let Some(href) = alternate_href(e, reader) {
            draft.link = Some(href);
        }
    } else if name == b"media:thumbnail" && draft.thumbnail.is_none() {
        draft.thumbnail = attr_value(e, reader, b"url");
    }
}

fn end_matches(target: Capture, name: &[u8], date_tag: &[u8], body_tag: &[u8]) -> bool {
    match target {
        Capture::Title => name == b"title",
        Capture::Link => name == b"link",
        Capture::Published => name == date_tag,
        Capture::Body => name == body_tag,
    }
}

fn commit_capture(target: Capture, capture_buf: &mut String, draft: &mut EntryDraft) {
    let text = std::mem::take(capture_buf);
    let slot = match target {
        Capture::Title => &mut draft.title,
        Capture::Link => &mut draft.link,
        Capture::Published => &mut draft.published,
        Capture::Body => &mut draft.body,
    };
    if slot.is_none() {
        *slot = Some(text);
    }
}

/// Reads the `href` of an Atom link element whose `rel` is `alternate`.
fn alternate_href(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Option<String> {
    let mut href = None;
    let mut rel = None;

    for attr_result in e.attributes() {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed link attribute");
                continue;
            }
        };
        match attr.key.as_ref() {
            b"href" => {
                href = attr
                    .decode_and_unescape_value(reader.decoder())
                    .ok()
                    .map(|v| v.to_string());
            }
            b"rel" => {
                rel = attr
                    .decode_and_unescape_value(reader.decoder())
                    .ok()
                    .map(|v| v.to_string());
            }
            _ => {}
        }
    }

    if rel.as_deref() == Some("alternate") {
        href
    } else {
        None
    }
}

/// Reads a single attribute value from an element, skipping malformed
/// attributes with a warning.
fn attr_value(e: &BytesStart<'_>, reader: &Reader<&[u8]>, key: &[u8]) -> Option<String> {
    for attr_result in e.attributes() {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed attribute");
                continue;
            }
        };
        if attr.key.as_ref() == key {
            return attr
                .decode_and_unescape_value(reader.decoder())
                .ok()
                .map(|v| v.to_string());
        }
    }
    None
}
