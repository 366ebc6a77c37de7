/// Collapses every whitespace run (newlines and non-breaking spaces included) to one space
/// and trims both ends.
pub(crate) fn clean_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ranks and priorities are only trusted when the cell holds nothing but ASCII digits.
pub(crate) fn parse_rank(value: &str) -> u32 {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return 0;
    }
    value.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_runs_and_trims() {
        assert_eq!(clean_text("  12\n\t 345 \u{a0}678  "), "12 345 678");
        assert_eq!(clean_text("\n\n"), "");
    }

    #[test]
    fn clean_text_is_idempotent() {
        for raw in ["  a  b ", "Есть", "\u{a0}x\ny\r\nz", "", "already clean"] {
            let once = clean_text(raw);
            assert_eq!(clean_text(&once), once);
        }
    }

    #[test]
    fn parse_rank_accepts_only_decimal_digits() {
        assert_eq!(parse_rank("17"), 17);
        assert_eq!(parse_rank("007"), 7);
        assert_eq!(parse_rank(""), 0);
        assert_eq!(parse_rank("1a"), 0);
        assert_eq!(parse_rank("-3"), 0);
        assert_eq!(parse_rank("+3"), 0);
        assert_eq!(parse_rank("1 2"), 0);
        assert_eq!(parse_rank("---"), 0);
        assert_eq!(parse_rank("٣"), 0);
    }

    #[test]
    fn parse_rank_defaults_on_overflow() {
        assert_eq!(parse_rank("99999999999999999999"), 0);
    }
}
