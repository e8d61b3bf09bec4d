//! Text normalisation for complaint descriptions.
//!
//! Keyword matching runs on a canonical form of the text:
//!
//! - Lower-cased
//! - Every character outside `a-z` becomes a separator
//! - Runs of separators collapse to a single space
//! - No leading or trailing whitespace
//!
//! "Live-wire near Pole #12!!" → "live wire near pole"

/// Normalise raw complaint text for keyword scoring.
///
/// Total function: empty input (or input with no letters) yields an empty string.
pub fn normalize_text(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string() {
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn only_punctuation_and_digits() {
        assert_eq!(normalize_text("123 !!! ---"), "");
    }

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(
            normalize_text("Live-wire near Pole #12!!"),
            "live wire near pole"
        );
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize_text("  no \t\n water   here  "), "no water here");
    }

    #[test]
    fn digits_split_words() {
        // Digits are separators, not deleted: "pipe2leak" keeps two tokens.
        assert_eq!(normalize_text("pipe2leak"), "pipe leak");
    }

    #[test]
    fn non_ascii_letters_are_separators() {
        assert_eq!(normalize_text("pani ka pāipa"), "pani ka p ipa");
    }

    #[test]
    fn idempotent() {
        let once = normalize_text("Open MANHOLE, near bus-stop!");
        assert_eq!(normalize_text(&once), once);
    }
}
