//! Turns a results-page score cell into a single comparable integer.
//!
//! Cells look like `"<b>12</b>"`, `"<b>0</b> (-3)"` or a bare `"7"`. A zero
//! score carrying a penalty is mapped to `offset + penalty`, which lands in
//! `[0, offset)` and stays below genuine positive scores as long as the
//! penalty magnitude is smaller than the offset.

use anyhow::{bail, Result};

/// Added to the (negative) penalty of a zero score.
pub const PENALTY_OFFSET: i64 = 100;

/// Inclusive bounds accepted for a configured offset.
pub const PENALTY_OFFSET_RANGE: (i64, i64) = (1, 100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreText {
    pub score: i64,
    /// Never positive.
    pub penalty: i64,
}

impl ScoreText {
    /// Best-effort parse. Anything that is not a number becomes 0.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let (score_part, rest) = match bold_segment(text) {
            Some((inner, rest)) => (inner, rest),
            None => {
                let end = text.find('(').unwrap_or(text.len());
                (&text[..end], &text[end..])
            }
        };

        // A penalty without a readable score carries no meaning.
        let Some(score) = parse_int(score_part) else {
            tracing::debug!(text, "no numeric score in cell, using 0");
            return Self::default();
        };
        let penalty = parenthesized(rest).and_then(parse_int).unwrap_or(0).min(0);

        Self { score, penalty }
    }

    pub fn value(&self, offset: i64) -> i64 {
        normalized_value(self.score, self.penalty, offset)
    }
}

/// `normalize_with_offset` with the default [`PENALTY_OFFSET`].
pub fn normalize(raw_score_text: &str) -> i64 {
    normalize_with_offset(raw_score_text, PENALTY_OFFSET)
}

pub fn normalize_with_offset(raw_score_text: &str, offset: i64) -> i64 {
    ScoreText::parse(raw_score_text).value(offset)
}

/// Positive scores pass through. A zero score with a negative penalty becomes
/// `offset + penalty`, floored at 0. Everything else is 0.
pub fn normalized_value(score: i64, penalty: i64, offset: i64) -> i64 {
    if score > 0 {
        score
    } else if score == 0 && penalty < 0 {
        offset.saturating_add(penalty).max(0)
    } else {
        0
    }
}

pub fn validate_penalty_offset(offset: i64) -> Result<()> {
    let (low, high) = PENALTY_OFFSET_RANGE;
    if offset < low || offset > high {
        bail!("must be between {} and {} (got {})", low, high, offset);
    }
    Ok(())
}

/// Inner text of the first `<b>…</b>` and whatever follows the closing tag.
fn bold_segment(text: &str) -> Option<(&str, &str)> {
    // ASCII lowercasing keeps byte offsets valid for slicing `text`.
    let lc = text.to_ascii_lowercase();
    let open = lc.find("<b>")? + "<b>".len();
    let close = lc[open..].find("</b>")? + open;
    Some((&text[open..close], &text[close + "</b>".len()..]))
}

fn parenthesized(text: &str) -> Option<&str> {
    let open = text.find('(')? + 1;
    let close = text[open..].find(')')? + open;
    Some(&text[open..close])
}

fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_score() {
        assert_eq!(normalize("<b>12</b>"), 12);
    }

    #[test]
    fn test_zero_with_penalty() {
        assert_eq!(normalize("<b>0</b> (-3)"), 97);
    }

    #[test]
    fn test_zero_with_zero_penalty() {
        assert_eq!(normalize("<b>0</b> (0)"), 0);
    }

    #[test]
    fn test_bare_integer() {
        assert_eq!(normalize("7"), 7);
        assert_eq!(normalize("  42 "), 42);
    }

    #[test]
    fn test_positive_score_ignores_penalty() {
        assert_eq!(normalize("<b>15</b> (-2)"), 15);
    }

    #[test]
    fn test_bare_zero_with_penalty() {
        assert_eq!(normalize("0 (-10)"), 90);
    }

    #[test]
    fn test_uppercase_bold_tag() {
        assert_eq!(normalize("<B>9</B>"), 9);
    }

    #[test]
    fn test_malformed_text_is_zero() {
        assert_eq!(normalize(""), 0);
        assert_eq!(normalize("DNS"), 0);
        assert_eq!(normalize("<b>abc</b> (-3)"), 0);
        assert_eq!(normalize("<b>12"), 0);
    }

    #[test]
    fn test_malformed_penalty_is_ignored() {
        let parsed = ScoreText::parse("<b>0</b> (n/a)");
        assert_eq!(parsed, ScoreText { score: 0, penalty: 0 });
        assert_eq!(parsed.value(PENALTY_OFFSET), 0);
    }

    #[test]
    fn test_positive_penalty_is_clamped() {
        let parsed = ScoreText::parse("<b>0</b> (5)");
        assert_eq!(parsed.penalty, 0);
        assert_eq!(parsed.value(PENALTY_OFFSET), 0);
    }

    #[test]
    fn test_negative_score_is_zero() {
        assert_eq!(normalize("-4"), 0);
    }

    #[test]
    fn test_penalty_beyond_offset_floors_at_zero() {
        assert_eq!(normalized_value(0, -150, PENALTY_OFFSET), 0);
        assert_eq!(normalized_value(0, i64::MIN, -1), 0);
    }

    #[test]
    fn test_custom_offset() {
        assert_eq!(normalize_with_offset("<b>0</b> (-3)", 50), 47);
    }

    #[test]
    fn test_validate_penalty_offset() {
        assert!(validate_penalty_offset(100).is_ok());
        assert!(validate_penalty_offset(1).is_ok());
        assert!(validate_penalty_offset(0).is_err());
        assert!(validate_penalty_offset(101).is_err());
        assert!(validate_penalty_offset(-5).is_err());
    }
}
