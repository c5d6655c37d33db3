//! Output filename generation.
//!
//! Pure string transforms consumed by the batch pipeline: title
//! sanitization, sequential per-file names, and the archive's own name.
//! Two distinct fallbacks exist and both matter: a title that was never
//! provided yields `"untitled"`, while a provided title that sanitizes
//! away to nothing yields `"image"`.

/// Fallback when no title was ever provided.
const UNTITLED: &str = "untitled";

/// Fallback when sanitization strips a provided title to nothing.
const EMPTY_TITLE: &str = "image";

/// Fallback archive stem for an unusable title.
const ARCHIVE_FALLBACK: &str = "images";

/// Suffix of the delivered archive file.
const ARCHIVE_SUFFIX: &str = ".zip";

/// Sanitize a title for use in filenames.
///
/// Steps, in order: trim; turn each run of `&` (with any surrounding
/// whitespace) into `-and-`; collapse whitespace/underscore runs into a
/// hyphen; drop everything that is not ASCII alphanumeric or a hyphen;
/// collapse hyphen runs; trim hyphens; lower-case.
pub fn sanitize_title(title: &str) -> String {
    if title.is_empty() {
        return UNTITLED.to_string();
    }

    let chars: Vec<char> = title.trim().chars().collect();
    let mut replaced = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '&' || (chars[i].is_whitespace() && run_leads_to_amp(&chars, i)) {
            // Consume `ws* &+ ws*` as one unit.
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            while i < chars.len() && chars[i] == '&' {
                i += 1;
            }
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            replaced.push_str("-and-");
        } else {
            replaced.push(chars[i]);
            i += 1;
        }
    }

    let mut cleaned = String::with_capacity(replaced.len());
    for c in replaced.chars() {
        if c.is_whitespace() || c == '_' {
            cleaned.push('-');
        } else if c.is_ascii_alphanumeric() || c == '-' {
            cleaned.push(c.to_ascii_lowercase());
        }
        // anything else is dropped
    }

    let mut collapsed = String::with_capacity(cleaned.len());
    for c in cleaned.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }

    let result = collapsed.trim_matches('-');
    if result.is_empty() {
        EMPTY_TITLE.to_string()
    } else {
        result.to_string()
    }
}

/// Whether the whitespace run starting at `from` runs into a `&`.
fn run_leads_to_amp(chars: &[char], from: usize) -> bool {
    let mut i = from;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i < chars.len() && chars[i] == '&'
}

/// Generate the sequential output filename for one batch item.
///
/// Format: `{sanitized-title}-{sequence}{extension}` where the sequence is
/// `index + 1` zero-padded to at least two digits (a third digit is kept,
/// never truncated) and the extension is everything from the last `.` of
/// the original filename, inclusive, or empty when there is none.
pub fn generate_filename(title: &str, index: usize, original_filename: &str) -> String {
    let extension = original_filename
        .rfind('.')
        .map(|at| &original_filename[at..])
        .unwrap_or("");
    format!("{}-{:02}{}", sanitize_title(title), index + 1, extension)
}

/// Derive the archive's own filename from the batch title.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`, the result is
/// lower-cased and trimmed of leading/trailing underscores; an unusable
/// title falls back to `"images"`. The `.zip` suffix is fixed.
pub fn archive_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches('_');
    let stem = if stem.is_empty() {
        ARCHIVE_FALLBACK
    } else {
        stem
    };
    format!("{stem}{ARCHIVE_SUFFIX}")
}


// ============================================================================
// Property-Based Tests
// ============================================================================
