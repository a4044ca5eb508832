/// Sanitize raw extracted text before pattern matching.
/// Strips control characters, normalizes whitespace, preserves the
/// punctuation notarial extracts actually use (labels, amounts, ids).
pub fn sanitize_extracted_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || matches!(
                    c,
                    '.' | ','
                        | ';'
                        | ':'
                        | '-'
                        | '/'
                        | '('
                        | ')'
                        | '['
                        | ']'
                        | '+'
                        | '='
                        | '%'
                        | '#'
                        | '@'
                        | '&'
                        | '\''
                        | '"'
                        | '!'
                        | '?'
                        | '*'
                        | '_'
                        | '|'
                        | '$'
                        | '°'
                        | 'º'
                        | 'ª'
                        | '¿'
                        | '¡'
                        | '\u{2013}' // En-dash –
                        | '\u{2014}' // Em-dash —
                )
        })
        .collect::<String>()
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_null_bytes() {
        let raw = "OTORGADO POR: JUAN\x00PEREZ";
        let clean = sanitize_extracted_text(raw);
        assert!(!clean.contains('\x00'));
        assert!(clean.contains("JUANPEREZ") || clean.contains("JUAN"));
    }

    #[test]
    fn strips_control_characters() {
        let raw = "CUANTÍA: $ 1.500,00\x01\x02\nFECHA: 12 DE MAYO DEL 2025";
        let clean = sanitize_extracted_text(raw);
        assert!(!clean.contains('\x01'));
        assert!(clean.contains("$ 1.500,00"));
        assert!(clean.contains("12 DE MAYO DEL 2025"));
    }

    #[test]
    fn preserves_notarial_punctuation() {
        let raw = "ESCRITURA N°: 20251701018P02183 | CÉDULA: 171234567-8";
        let clean = sanitize_extracted_text(raw);
        assert!(clean.contains("N°"));
        assert!(clean.contains('|'));
        assert!(clean.contains("171234567-8"));
    }

    #[test]
    fn collapses_blank_lines() {
        let raw = "ACTO: PODER\n\n\n\nNOTARIO: GLENDA ZAPATA\n\n\nFIN";
        let clean = sanitize_extracted_text(raw);
        assert_eq!(clean, "ACTO: PODER\nNOTARIO: GLENDA ZAPATA\nFIN");
    }

    #[test]
    fn trims_whitespace_per_line() {
        let raw = "  OTORGADO POR:  \n  MARIA TORRES  ";
        let clean = sanitize_extracted_text(raw);
        assert_eq!(clean, "OTORGADO POR:\nMARIA TORRES");
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(sanitize_extracted_text(""), "");
    }

    #[test]
    fn preserves_spanish_characters() {
        let raw = "NOTARÍA DÉCIMA OCTAVA DEL CANTÓN QUITO, PEÑAFIEL";
        let clean = sanitize_extracted_text(raw);
        assert!(clean.contains("NOTARÍA"));
        assert!(clean.contains("CANTÓN"));
        assert!(clean.contains("PEÑAFIEL"));
    }
}
