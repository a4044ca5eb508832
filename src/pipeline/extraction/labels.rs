//! Generic `LABEL: value` scanner for lines no known field consumed.

use std::sync::LazyLock;

use std::collections::BTreeMap;

use regex::Regex;

use super::persons::normalize_name;

static LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([A-ZÁÉÍÓÚÑÜ0-9][A-ZÁÉÍÓÚÑÜ0-9/() .,-]{2,}?)\s*:\s*(.+?)\s*$").unwrap()
});

/// Labels already owned by a dedicated field; kept out of the generic map.
const KNOWN_LABELS: &[&str] = &[
    "ACTO",
    "CONTRATO",
    "ACTO O CONTRATO",
    "ACTO / CONTRATO",
    "ESCRITURA N",
    "ESCRITURA",
    "FECHA DE OTORGAMIENTO",
    "OTORGADO POR",
    "A FAVOR DE",
    "OTORGADO A FAVOR DE",
    "BENEFICIARIO",
    "NOTARIO",
    "NOTARIO (A)",
    "NOTARIA",
    "UBICACION",
    "PROVINCIA",
    "CANTON",
    "PARROQUIA",
    "CUANTIA",
    "CUANTIA DEL ACTO O CONTRATO",
    "VALOR",
    "OBJETO",
    "OBSERVACIONES",
    "OBJETO / OBSERVACIONES",
    "CEDULA",
    "NACIONALIDAD",
];

/// Normalize a label for lookup: upper, accent-stripped, collapsed.
pub fn normalize_label(raw: &str) -> String {
    normalize_name(raw)
}

/// Capture every `LABEL: value` line not covered by a known field.
pub fn extract_generic_labels(text: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for line in text.lines() {
        let Some(caps) = LABEL_LINE.captures(line) else {
            continue;
        };
        let key = normalize_label(&caps[1]);
        let value = caps[2].trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        if KNOWN_LABELS.contains(&key.as_str()) {
            continue;
        }
        map.insert(key, value.to_string());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_unknown_labels_only() {
        let text = "ACTO: PODER ESPECIAL\nMATRIZ ARCHIVADA EN: TOMO 12\nCUANTÍA: INDETERMINADA\nREPERTORIO: 4521";
        let map = extract_generic_labels(text);
        assert_eq!(map.get("MATRIZ ARCHIVADA EN").map(String::as_str), Some("TOMO 12"));
        assert_eq!(map.get("REPERTORIO").map(String::as_str), Some("4521"));
        assert!(!map.contains_key("ACTO"));
        assert!(!map.contains_key("CUANTIA"));
    }

    #[test]
    fn label_is_normalized_for_lookup() {
        assert_eq!(normalize_label("  Cuantía  del  acto "), "CUANTIA DEL ACTO");
    }

    #[test]
    fn lines_without_colon_are_ignored() {
        let map = extract_generic_labels("JUAN PEREZ\nsolo texto libre");
        assert!(map.is_empty());
    }
}
