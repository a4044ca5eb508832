//! Ordered pattern alternatives per extracted field.
//!
//! Each field carries a fixed list of regexes tried in order; the first
//! match wins. Earlier patterns are more specific, later ones more
//! permissive. The order is a committed contract: reordering changes
//! extractor output and must be treated as a breaking change (tests pin
//! sample inputs to specific indices).

use std::sync::LazyLock;

use regex::Regex;

fn table(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invalid field pattern"))
        .collect()
}

/// Deed number ("20251701018P02183"): labeled forms first, then the
/// bare year+sequence+letter+sequence shape with optional separators.
pub static DEED_NUMBER: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    table(&[
        r"(?i)ESCRITURA\s+N[°º]?\s*:?\s*([A-Z0-9]{10,20})",
        r"(?i)N[°º]?\s*DE\s+ESCRITURA\s*:?\s*([A-Z0-9]{10,20})",
        r"(?i)MATRIZ\s+N[°º]?\s*:?\s*([A-Z0-9]{10,20})",
        r"(?i)([0-9]{4}\s*[0-9]{7}\s*[A-Z]\s*[0-9]{5})",
        r"(?i)([0-9]{4}[^A-Za-z0-9\n]?[0-9]{7}[^A-Za-z0-9\n]?[A-Z][^A-Za-z0-9\n]?[0-9]{5})",
    ])
});

/// Act / contract label. Values are captured to end of line and then
/// cut at trailing section labels by `cut_trailing_labels`.
pub static ACT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    table(&[
        r"(?i)ACTO\s*(?:/|\s+[OY]\s+|\s*[–-]\s*)\s*CONTRATO\s*:?\s*([A-ZÁÉÍÓÚÑÜ0-9 ,.;:()-]+)",
        r"(?i)ACTO\s*:\s*([A-ZÁÉÍÓÚÑÜ0-9 ,.;:()-]+)",
        r"(?i)CONTRATO\s*:\s*([A-ZÁÉÍÓÚÑÜ0-9 ,.;:()-]+)",
        r"(?i)(AUTORIZACI[ÓO]N\s+DE\s+[A-ZÁÉÍÓÚÑÜ0-9 ,.;:-]+)",
    ])
});

/// Grant date, Spanish long form with optional "(HH:MM)" suffix.
pub static GRANT_DATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    table(&[
        r"(?i)FECHA\s+DE\s+OTORGAMIENTO\s*:?\s*([0-9]{1,2}\s+DE\s+[A-ZÁÉÍÓÚÑÜ]+\s+DEL?\s+[0-9]{4}(?:\s*,?\s*\([0-9]{1,2}:[0-9]{2}\))?)",
        r"(?i)OTORGAD[OA]\s+EL\s*:?\s*([0-9]{1,2}\s+DE\s+[A-ZÁÉÍÓÚÑÜ]+\s+DEL?\s+[0-9]{4}(?:\s*,?\s*\([0-9]{1,2}:[0-9]{2}\))?)",
    ])
});

/// Notary name. Leading "(A)" and professional titles are stripped
/// afterwards by `clean_notary_name`.
pub static NOTARY: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    table(&[
        r"(?i)NOTARIO\s*(?:\(\s*A\s*\))?\s*:?\s+([A-ZÁÉÍÓÚÑÜ][A-ZÁÉÍÓÚÑÜ .,-]+)",
        r"(?i)ANTE\s+M[IÍ]\s*:?,?\s*([A-ZÁÉÍÓÚÑÜ][A-ZÁÉÍÓÚÑÜ .,-]+)",
    ])
});

/// Notary office designation.
pub static NOTARY_OFFICE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    table(&[
        r"(?i)NOTAR[IÍ]A\s*:?\s+([A-ZÁÉÍÓÚÑÜ0-9][A-ZÁÉÍÓÚÑÜ0-9 .,-]+)",
        r"(?i)(D[EÉ]CIMA\s+OCTAVA\s+DEL\s+CANT[OÓ]N\s+QUITO)",
    ])
});

/// Raw amount field; normalization happens in `amount::normalize_amount`.
pub static AMOUNT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    table(&[
        r"(?i)CUANT[IÍ]A(?:\s+DEL\s+ACTO(?:\s+O\s+CONTRATO)?)?\s*:?\s*([$0-9A-ZÁÉÍÓÚÑÜ/ .,-]+)",
        r"(?i)VALOR\s*:?\s*([$0-9A-ZÁÉÍÓÚÑÜ/ .,-]+)",
    ])
});

/// Location block: province / canton / parish in one sweep.
pub static LOCATION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    table(&[
        r"(?is)UBICACI[OÓ]N\s*:?\s*PROVINCIA\s*:?\s*([A-ZÁÉÍÓÚÑÜ ]+?)\s*CANT[OÓ]N\s*:?\s*([A-ZÁÉÍÓÚÑÜ ]+?)\s*PARROQUIA\s*:?\s*([A-ZÁÉÍÓÚÑÜ]+(?: [A-ZÁÉÍÓÚÑÜ]+)*)",
        r"(?is)PROVINCIA\s*:?\s*([A-ZÁÉÍÓÚÑÜ ]+?)\s*.{0,40}?CANT[OÓ]N\s*:?\s*([A-ZÁÉÍÓÚÑÜ ]+?)\s*.{0,40}?PARROQUIA\s*:?\s*([A-ZÁÉÍÓÚÑÜ]+(?: [A-ZÁÉÍÓÚÑÜ]+)*)",
    ])
});

/// Remarks / object block; spans lines up to a blank line or the next
///// `LABEL:` line. Sanitation removes blank lines, so the labeled-line
/// terminator is the one that fires in practice.
pub static REMARKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    table(&[
        r"(?is)OBJETO\s*(?:/|\s+[OY]\s+|\s*[–-]\s*)\s*OBSERVACIONES\s*:?\s*(.+?)(?:\n\s*\n|\n[A-ZÁÉÍÓÚÑÜ/() \t]{3,}:|\z)",
        r"(?is)OBSERVACIONES\s*:?\s*(.+?)(?:\n\s*\n|\n[A-ZÁÉÍÓÚÑÜ/() \t]{3,}:|\z)",
        r"(?is)OBJETO\s*:?\s*(.+?)(?:\n\s*\n|\n[A-ZÁÉÍÓÚÑÜ/() \t]{3,}:|\z)",
    ])
});

/// Section labels that may trail an act captured to end of line.
static TRAILING_LABELS: &[&str] = &["OTORGADO", "FECHA", "CUANTÍA", "CUANTIA", "UBICACIÓN", "UBICACION"];

/// Run an ordered table against the text. Returns the matched pattern
/// index together with the first capture group, trimmed.
pub fn first_match(text: &str, patterns: &[Regex]) -> Option<(usize, String)> {
    for (idx, re) in patterns.iter().enumerate() {
        if let Some(caps) = re.captures(text) {
            if let Some(m) = caps.get(1) {
                let value = m.as_str().trim();
                if !value.is_empty() {
                    return Some((idx, value.to_string()));
                }
            }
        }
    }
    None
}

/// Case-insensitive substring search over the original string. Offsets
/// from an uppercased copy are unusable here: case folding can change
/// byte lengths ('ſ' uppercases to "S"), so the match position must be
/// a char boundary of `value` itself.
fn find_label(value: &str, label: &str) -> Option<usize> {
    let label: Vec<char> = label.chars().collect();
    for (start, _) in value.char_indices() {
        let mut rest = value[start..].chars();
        if label
            .iter()
            .all(|lc| rest.next().is_some_and(|c| c.to_uppercase().eq(lc.to_uppercase())))
        {
            return Some(start);
        }
    }
    None
}

/// Cut a line-scoped capture at the first trailing section label that
/// leaked into it ("PODER ESPECIAL OTORGADO POR..." → "PODER ESPECIAL").
pub fn cut_trailing_labels(value: &str) -> String {
    let mut cut = value.len();
    for label in TRAILING_LABELS {
        if let Some(idx) = find_label(value, label) {
            if idx > 0 {
                cut = cut.min(idx);
            }
        }
    }
    value[..cut].trim().trim_end_matches([',', ';', ':', '-']).trim().to_string()
}

/// Strip "(A)" markers and professional titles off a notary capture.
pub fn clean_notary_name(raw: &str) -> String {
    static LEADING: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)^(\(\s*A\s*\)\s*|ABG?\.?\s+|DRA?\.?\s+)+").unwrap());
    let cleaned = LEADING.replace(raw.trim(), "");
    cut_trailing_labels(cleaned.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Pattern-index pins: these inputs must keep matching the stated
    // alternative. A shift means the committed order was broken.

    #[test]
    fn deed_number_labeled_form_hits_first_pattern() {
        let (idx, v) = first_match("ESCRITURA N°: 20251701018P02183", &DEED_NUMBER).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(v, "20251701018P02183");
    }

    #[test]
    fn deed_number_bare_sequence_falls_through_to_fourth_pattern() {
        let (idx, v) = first_match("2025 1701018 P 02183", &DEED_NUMBER).unwrap();
        assert_eq!(idx, 3);
        assert_eq!(v.replace(' ', ""), "20251701018P02183");
    }

    #[test]
    fn act_combined_label_hits_first_pattern() {
        let (idx, v) = first_match("ACTO O CONTRATO: PODER ESPECIAL", &ACT).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(v, "PODER ESPECIAL");
    }

    #[test]
    fn act_plain_label_hits_second_pattern() {
        let (idx, v) = first_match("ACTO: COMPRAVENTA DE INMUEBLE", &ACT).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(v, "COMPRAVENTA DE INMUEBLE");
    }

    #[test]
    fn act_authorization_falls_through_to_fourth_pattern() {
        let (idx, v) = first_match("SE TRAMITA AUTORIZACIÓN DE SALIDA DEL PAÍS", &ACT).unwrap();
        assert_eq!(idx, 3);
        assert!(v.starts_with("AUTORIZACIÓN DE SALIDA"));
    }

    #[test]
    fn grant_date_with_time_suffix() {
        let text = "FECHA DE OTORGAMIENTO: 12 DE MAYO DEL 2025, (10:30)";
        let (idx, v) = first_match(text, &GRANT_DATE).unwrap();
        assert_eq!(idx, 0);
        assert!(v.contains("12 DE MAYO DEL 2025"));
        assert!(v.contains("(10:30)"));
    }

    #[test]
    fn trailing_label_cut_from_act() {
        assert_eq!(
            cut_trailing_labels("PODER GENERAL OTORGADO POR"),
            "PODER GENERAL"
        );
        assert_eq!(cut_trailing_labels("COMPRAVENTA"), "COMPRAVENTA");
    }

    #[test]
    fn trailing_label_cut_respects_multibyte_boundaries() {
        // 'ſ' matches the pattern classes under case folding but shrinks
        // from 2 bytes to 1 when uppercased, shifting every later offset.
        assert_eq!(
            cut_trailing_labels("PODERſÑFECHA DE OTORGAMIENTO"),
            "PODERſÑ"
        );
        assert_eq!(cut_trailing_labels("ſaſb CUANTÍA: 500"), "ſaſb");
    }

    #[test]
    fn notary_name_strips_marker_and_title() {
        assert_eq!(
            clean_notary_name("(A) ABG. GLENDA ELIZABETH ZAPATA SILVA"),
            "GLENDA ELIZABETH ZAPATA SILVA"
        );
    }

    #[test]
    fn location_three_part_capture() {
        let text = "UBICACIÓN: PROVINCIA: PICHINCHA CANTÓN: QUITO PARROQUIA: IÑAQUITO";
        let caps = LOCATION[0].captures(text).unwrap();
        assert_eq!(caps.get(1).unwrap().as_str().trim(), "PICHINCHA");
        assert_eq!(caps.get(2).unwrap().as_str().trim(), "QUITO");
        assert_eq!(caps.get(3).unwrap().as_str().trim(), "IÑAQUITO");
    }

    #[test]
    fn no_match_returns_none() {
        assert!(first_match("texto sin etiquetas", &DEED_NUMBER).is_none());
    }
}
