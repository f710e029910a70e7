//! Natural-order filename comparison.
//!
//! Orders filenames so that embedded numbers sort numerically rather
//! than lexically: `"ch2.pdf" < "ch10.pdf"`, where a plain string sort
//! would put `"ch10.pdf"` first. This is what keeps chapter files in
//! reading order without requiring zero-padded names.

use std::cmp::Ordering;

/// Compare two filenames in natural order.
///
/// Each name is split into alternating non-digit/digit runs. Digit runs
/// compare as integers (leading zeros ignored, arbitrary length);
/// non-digit runs compare case-insensitively; the run sequences compare
/// lexicographically. Equal inputs always compare equal, and names whose
/// runs are numerically equal (`"ch01"` vs `"ch1"`) are tie-broken by
/// plain string comparison so the ordering stays strict.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let runs_a = split_runs(a);
    let runs_b = split_runs(b);

    for (run_a, run_b) in runs_a.iter().zip(runs_b.iter()) {
        let ord = compare_runs(run_a, run_b);
        if ord != Ordering::Equal {
            return ord;
        }
    }

    runs_a
        .len()
        .cmp(&runs_b.len())
        .then_with(|| a.cmp(b))
}

/// A maximal run of digit or non-digit characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run<'a> {
    text: &'a str,
    is_digits: bool,
}

/// Split a string into alternating digit / non-digit runs.
fn split_runs(s: &str) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut current_is_digits = None;

    for (idx, ch) in s.char_indices() {
        let is_digit = ch.is_ascii_digit();
        match current_is_digits {
            Some(flag) if flag == is_digit => {}
            Some(flag) => {
                runs.push(Run {
                    text: &s[start..idx],
                    is_digits: flag,
                });
                start = idx;
                current_is_digits = Some(is_digit);
            }
            None => current_is_digits = Some(is_digit),
        }
    }

    if let Some(flag) = current_is_digits {
        runs.push(Run {
            text: &s[start..],
            is_digits: flag,
        });
    }

    runs
}

/// Compare a pair of runs.
fn compare_runs(a: &Run<'_>, b: &Run<'_>) -> Ordering {
    if a.is_digits && b.is_digits {
        compare_digit_runs(a.text, b.text)
    } else {
        // Mixed or textual runs compare as case-insensitive text.
        let lower_a = a.text.to_lowercase();
        let lower_b = b.text.to_lowercase();
        lower_a.cmp(&lower_b)
    }
}

/// Compare two digit runs as integers of arbitrary length.
///
/// Leading zeros are stripped first; a longer remaining run is the
/// larger number, and equal-length runs compare digit by digit.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let stripped_a = a.trim_start_matches('0');
    let stripped_b = b.trim_start_matches('0');

    stripped_a
        .len()
        .cmp(&stripped_b.len())
        .then_with(|| stripped_a.cmp(stripped_b))
}
