//! Cleanup of mis-decoded document text
//!
//! Extracted PDF text often arrives as mojibake: UTF-8 bytes that were read
//! as Latin-1 (or Windows-1252) somewhere upstream. Two passes repair it: a
//! fixed table for the common punctuation sequences, then a best-effort
//! re-decode that is kept only when it removes corruption markers.

/// Known mis-decoded sequences and their intended characters
///
/// Longer sequences come before their prefixes (`Â·` before `Â`).
const SUBSTITUTIONS: &[(&str, &str)] = &[
    // UTF-8 read as Latin-1
    ("\u{e2}\u{80}\u{a2}", "\u{2022}"), // bullet
    ("\u{e2}\u{80}\u{93}", "\u{2013}"), // en dash
    ("\u{e2}\u{80}\u{94}", "\u{2014}"), // em dash
    ("\u{e2}\u{80}\u{98}", "\u{2018}"),
    ("\u{e2}\u{80}\u{99}", "\u{2019}"),
    ("\u{e2}\u{80}\u{9c}", "\u{201c}"),
    ("\u{e2}\u{80}\u{9d}", "\u{201d}"),
    ("\u{e2}\u{80}\u{a6}", "\u{2026}"), // ellipsis
    // UTF-8 read as Windows-1252
    ("\u{e2}\u{20ac}\u{a2}", "\u{2022}"),
    ("\u{e2}\u{20ac}\u{201c}", "\u{2013}"),
    ("\u{e2}\u{20ac}\u{201d}", "\u{2014}"),
    ("\u{e2}\u{20ac}\u{2dc}", "\u{2018}"),
    ("\u{e2}\u{20ac}\u{2122}", "\u{2019}"),
    ("\u{e2}\u{20ac}\u{153}", "\u{201c}"),
    ("\u{e2}\u{20ac}\u{9d}", "\u{201d}"),
    ("\u{e2}\u{20ac}\u{a6}", "\u{2026}"),
    // Stray markers
    ("\u{c2}\u{b7}", "\u{b7}"), // middle dot
    ("\u{c2}", ""),
];

/// Characters that almost only appear in corrupted text: `Ã`, `Â`, `â`
const MARKERS: [char; 3] = ['\u{c3}', '\u{c2}', '\u{e2}'];

/// Repair common transcoding artifacts
///
/// Total and pure. Clean ASCII passes through unchanged.
///
/// # Examples
///
/// ```
/// use navigator_core::normalize_text;
///
/// assert_eq!(normalize_text("It\u{e2}\u{80}\u{99}s here"), "It\u{2019}s here");
/// assert_eq!(normalize_text("caf\u{c3}\u{a9}"), "caf\u{e9}");
/// assert_eq!(normalize_text("plain text"), "plain text");
/// ```
pub fn normalize_text(raw: &str) -> String {
    let substituted = SUBSTITUTIONS
        .iter()
        .fold(raw.to_string(), |text, (bad, good)| text.replace(bad, good));

    let markers = marker_count(&substituted);
    if markers == 0 {
        return substituted;
    }

    let alternative = redecode(&substituted);
    if marker_count(&alternative) < markers {
        alternative
    } else {
        substituted
    }
}

fn marker_count(text: &str) -> usize {
    text.chars().filter(|c| MARKERS.contains(c)).count()
}

/// Encode as Latin-1 and decode as UTF-8, dropping what does not fit
///
/// Characters above U+00FF have no Latin-1 byte and are skipped; byte runs
/// that are not valid UTF-8 are skipped too.
fn redecode(text: &str) -> String {
    let bytes: Vec<u8> = text.chars().filter_map(|c| u8::try_from(c).ok()).collect();
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_right_single_quote() {
        let cleaned = normalize_text("The agency\u{e2}\u{80}\u{99}s rule");
        assert_eq!(cleaned, "The agency\u{2019}s rule");
        assert_eq!(marker_count(&cleaned), 0);
    }

    #[test]
    fn test_windows1252_right_single_quote() {
        let cleaned = normalize_text("The agency\u{e2}\u{20ac}\u{2122}s rule");
        assert_eq!(cleaned, "The agency\u{2019}s rule");
        assert_eq!(marker_count(&cleaned), 0);
    }

    #[test]
    fn test_punctuation_table() {
        let raw = "\u{e2}\u{80}\u{a2} item \u{e2}\u{80}\u{93} range \u{e2}\u{80}\u{94} aside \
                   \u{e2}\u{80}\u{9c}quoted\u{e2}\u{80}\u{9d} more\
                   \u{e2}\u{80}\u{a6} a\u{c2}\u{b7}b";
        assert_eq!(
            normalize_text(raw),
            "\u{2022} item \u{2013} range \u{2014} aside \
             \u{201c}quoted\u{201d} more\u{2026} a\u{b7}b"
        );
    }

    #[test]
    fn test_stray_marker_removed() {
        assert_eq!(normalize_text("Section\u{c2} 2"), "Section 2");
    }

    #[test]
    fn test_accented_mojibake_redecoded() {
        assert_eq!(normalize_text("d\u{c3}\u{a9}cret n\u{c3}\u{b0} 5"), "d\u{e9}cret n\u{f0} 5");
    }

    #[test]
    fn test_correct_unicode_left_alone() {
        let text = "r\u{e9}sum\u{e9} \u{2014} na\u{ef}ve \u{201c}caf\u{e9}\u{201d}";
        assert_eq!(normalize_text(text), text);
    }

    #[test]
    fn test_redecode_is_kept_only_when_strictly_better() {
        // A lone marker with no valid continuation: re-decoding drops it,
        // which is strictly fewer markers, so the alternative wins.
        assert_eq!(normalize_text("\u{c3}x"), "x");
        // Nothing to fix: marker count is zero, input is returned as is.
        assert_eq!(normalize_text("abc"), "abc");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_text(""), "");
    }
}
