//! Upload filename derivation

use chrono::NaiveDateTime;

use crate::domain::capture::CaptureSource;

/// Replace every character outside the whitelist with an underscore.
///
/// Whitelist: ASCII alphanumerics, Hangul syllables, underscore, hyphen.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if is_allowed(c) { c } else { '_' })
        .collect()
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{AC00}'..='\u{D7A3}').contains(&c) || c == '_' || c == '-'
}

/// Derive the upload filename: `{prefix}_{YYYYMMDD_HHMMSS}_{sanitizedTitle}.{ext}`.
///
/// Pure function of the source kind, the given instant, and the title.
pub fn derive_filename(
    source: CaptureSource,
    at: NaiveDateTime,
    title: &str,
    extension: &str,
) -> String {
    format!(
        "{}_{}_{}.{}",
        source.filename_prefix(),
        at.format("%Y%m%d_%H%M%S"),
        sanitize_title(title),
        extension
    )
}
