use std::borrow::Cow;

/// Builds a URL-safe slug from free text.
///
/// Lowercases the input, collapses every run of non-alphanumeric characters
/// into a single `-`, and trims leading/trailing dashes.
///
/// # Examples
///
/// ```
/// use atelier::util::slugify;
///
/// assert_eq!(slugify("Playful Chaos"), "playful-chaos");
/// assert_eq!(slugify("  Flowers B&W  "), "flowers-b-w");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Folds a title or filename stem into a key for fuzzy matching.
///
/// Lowercases and drops everything that is not ASCII alphanumeric, so
/// `"Menina #3 (study)"` and `"menina-3-study.jpg"`'s stem compare equal.
pub fn match_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Derives a display title from a gallery slug: `"playful-chaos"` becomes
/// `"Playful Chaos"`.
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strips ASCII control characters from text before it reaches the store.
///
/// Removes 0x00-0x1F (except tab/newline/CR) and 0x7F, and drops ESC so ANSI
/// sequence introducers cannot survive into logs or terminal output.
///
/// Returns `Cow::Borrowed` when the input is already clean (common case).
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let is_stripped = |c: char| {
        c == '\u{7f}' || (c.is_control() && c != '\t' && c != '\n' && c != '\r')
    };

    if !s.chars().any(is_stripped) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(s.chars().filter(|&c| !is_stripped(c)).collect())
}
