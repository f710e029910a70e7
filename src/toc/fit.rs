//! Title fitting for TOC entries.
//!
//! Long chapter titles must not run into the page-number column, so the
//! renderer fits each title to the available width first: if the full
//! title fits it is drawn unchanged, otherwise the longest prefix that
//! leaves room for an ellipsis marker is used. This is a best-effort
//! visual constraint, not a correctness invariant.

/// Marker appended to truncated titles.
pub const ELLIPSIS: &str = "...";

/// Minimum number of title characters kept when truncating.
///
/// Guarantees termination even when `max_width` is narrower than the
/// ellipsis itself: at the floor the prefix is returned regardless of
/// overflow.
const MIN_PREFIX_CHARS: usize = 3;

/// Approximate rendered width of `text` at `font_size`, in page units.
///
/// Helvetica metrics approximated per character class; exact metrics are
/// not needed because the layout keeps a gutter between the title and
/// the page number.
pub fn approx_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(|c| char_factor(c) * font_size).sum()
}

/// Width factor of a character relative to the font size.
fn char_factor(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | 't' | 'f' | 'I' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
        ' ' => 0.28,
        'm' | 'w' | 'M' | 'W' | '@' => 0.82,
        _ => 0.52,
    }
}

/// Fit a title to `max_width` using the default width approximation.
pub fn fit_title(title: &str, max_width: f32, font_size: f32) -> String {
    fit_title_with(title, max_width, |text| approx_text_width(text, font_size))
}

/// Fit a title to `max_width` using a caller-provided metric function.
///
/// Returns the title unchanged when it already fits. Otherwise returns
/// the longest prefix (right-trimmed of trailing whitespace) whose width
/// plus the ellipsis marker stays within `max_width`, down to a floor of
/// [`MIN_PREFIX_CHARS`] characters; at the floor the prefix plus
/// ellipsis is returned even if it overflows.
///
/// Fitting is idempotent: refitting an already-fitted title at the same
/// width returns it unchanged (whenever the floor was not hit).
pub fn fit_title_with<F>(title: &str, max_width: f32, measure: F) -> String
where
    F: Fn(&str) -> f32,
{
    if measure(title) <= max_width {
        return title.to_string();
    }

    let ellipsis_width = measure(ELLIPSIS);

    // Byte offsets of every char boundary, so prefixes never split a
    // multi-byte character.
    let boundaries: Vec<usize> = title
        .char_indices()
        .map(|(idx, _)| idx)
        .skip(1)
        .chain(std::iter::once(title.len()))
        .collect();
    let char_count = boundaries.len();

    for kept in (MIN_PREFIX_CHARS..char_count).rev() {
        let prefix = title[..boundaries[kept - 1]].trim_end();
        if measure(prefix) + ellipsis_width <= max_width {
            return format!("{prefix}{ELLIPSIS}");
        }
    }

    // Floor reached: return the shortest allowed prefix regardless of
    // overflow so fitting always terminates.
    let floor_end = boundaries
        .get(MIN_PREFIX_CHARS - 1)
        .copied()
        .unwrap_or(title.len());
    let prefix = title[..floor_end].trim_end();
    format!("{prefix}{ELLIPSIS}")
}
