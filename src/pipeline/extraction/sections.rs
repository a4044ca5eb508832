//! Section scoping for person-bearing blocks.
//!
//! "OTORGADO POR" and "A FAVOR DE" introduce free-form blocks that run
//! until the next recognized header. Person extraction only ever sees
//! the scoped slice, never the whole document.

use std::sync::LazyLock;

use regex::Regex;

/// Labels opening a grantor block, tried in order.
pub static GRANTOR_LABELS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)OTORGADO\s+POR\s*:?").unwrap(),
        Regex::new(r"(?i)COMPARECIENTES?\s*:?").unwrap(),
    ]
});

/// Labels opening a beneficiary block, tried in order.
pub static BENEFICIARY_LABELS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)(?:OTORGADO\s+)?A\s+FAVOR\s+DE\s*:?").unwrap(),
        Regex::new(r"(?i)BENEFICIARI[OA]S?\s*(?:\(\s*A\s*\))?\s*:?").unwrap(),
    ]
});

/// Any header that terminates the current section.
static NEXT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(OTORGADO\s+POR|OTORGADO\s+A\s+FAVOR|A\s+FAVOR\s+DE|BENEFICIARIO|UBICACI[ÓO]N|CUANT[IÍ]A|OBJETO|OBSERVACIONES|ACTO|CONTRATO|FECHA|NOTAR[IÍ]A|NOTARIO)\s*:?",
    )
    .unwrap()
});

/// Slice the text from just after the first matching label up to the
/// next recognized header. Labels are tried in order; the first hit
/// wins. Returns `None` when no label matches.
pub fn section_after<'a>(text: &'a str, labels: &[Regex]) -> Option<&'a str> {
    for label in labels {
        if let Some(m) = label.find(text) {
            let after = &text[m.end()..];
            let end = NEXT_HEADER
                .find(after)
                .map(|h| h.start())
                .filter(|&s| s > 0)
                .unwrap_or(after.len());
            return Some(&after[..end]);
        }
    }
    None
}
