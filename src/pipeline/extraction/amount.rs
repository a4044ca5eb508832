use crate::models::Amount;

/// Phrases the documents use for "no declared amount".
const INDETERMINATE_MARKERS: &[&str] = &["INDETERMINAD", "N/A", "S/N", "SIN CUANTIA", "SIN CUANTÍA"];

/// Normalize a raw currency-like capture to a finite value or the
/// indeterminate sentinel. Never fails: anything unparsable collapses
/// to `Indeterminate`.
///
/// The documents mix `$ 1.234,56` (dot thousands, comma decimals) with
/// `$1,234.56`; the rightmost of `,` and `.` is taken as the decimal
/// separator and the other is dropped as a thousands separator.
pub fn normalize_amount(raw: &str) -> Amount {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Amount::Indeterminate;
    }

    let upper = trimmed.to_uppercase();
    if INDETERMINATE_MARKERS.iter().any(|m| upper.contains(m)) {
        return Amount::Indeterminate;
    }

    // Keep only digits and separators; drops "$", "USD", "DOLARES"...
    let numeric: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.'))
        .collect();
    if numeric.is_empty() {
        return Amount::Indeterminate;
    }

    let last_comma = numeric.rfind(',');
    let last_dot = numeric.rfind('.');
    let normalized = match (last_comma, last_dot) {
        (Some(c), Some(d)) => {
            if c > d {
                numeric.replace('.', "").replace(',', ".")
            } else {
                numeric.replace(',', "")
            }
        }
        (Some(c), None) => {
            // A lone comma followed by exactly three digits reads as a
            // thousands separator, anything else as decimals.
            if numeric.len() - c == 4 {
                numeric.replace(',', "")
            } else {
                numeric.replace(',', ".")
            }
        }
        (None, Some(d)) => {
            if numeric.len() - d == 4 && numeric.matches('.').count() == 1 && d >= 1 {
                numeric.replace('.', "")
            } else if numeric.matches('.').count() > 1 {
                // "1.234.567" style thousands grouping.
                numeric.replace('.', "")
            } else {
                numeric
            }
        }
        (None, None) => numeric,
    };

    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Amount::Value(v),
        _ => Amount::Indeterminate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn european_format_with_symbol() {
        assert_eq!(normalize_amount("$ 1.234,56"), Amount::Value(1234.56));
    }

    #[test]
    fn us_format_with_symbol() {
        assert_eq!(normalize_amount("$1,234.56"), Amount::Value(1234.56));
    }

    #[test]
    fn plain_integer() {
        assert_eq!(normalize_amount("1500"), Amount::Value(1500.0));
    }

    #[test]
    fn integer_with_currency_words() {
        assert_eq!(
            normalize_amount("USD 25.000 DOLARES"),
            Amount::Value(25_000.0)
        );
    }

    #[test]
    fn decimal_comma_without_thousands() {
        assert_eq!(normalize_amount("350,75"), Amount::Value(350.75));
    }

    #[test]
    fn multi_group_thousands_dots() {
        assert_eq!(normalize_amount("1.234.567"), Amount::Value(1_234_567.0));
    }

    #[test]
    fn indeterminate_markers() {
        assert_eq!(normalize_amount("INDETERMINADA"), Amount::Indeterminate);
        assert_eq!(normalize_amount("indeterminado"), Amount::Indeterminate);
        assert_eq!(normalize_amount("N/A"), Amount::Indeterminate);
        assert_eq!(normalize_amount("S/N"), Amount::Indeterminate);
        assert_eq!(normalize_amount("SIN CUANTÍA"), Amount::Indeterminate);
    }

    #[test]
    fn empty_and_garbage() {
        assert_eq!(normalize_amount(""), Amount::Indeterminate);
        assert_eq!(normalize_amount("   "), Amount::Indeterminate);
        assert_eq!(normalize_amount("VER ANEXO"), Amount::Indeterminate);
    }
}
