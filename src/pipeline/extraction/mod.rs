//! Local field extraction: raw notarial text to a normalized record.
//!
//! Stateless and soft-failing. Malformed input degrades to a
//! `revision_requerida` outcome with warnings, never an error.

pub mod amount;
pub mod labels;
pub mod patterns;
pub mod persons;
pub mod sanitize;
pub mod sections;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{
    ExtractionOutcome, ExtractionStatus, Location, NormalizedRecord, Person,
};

/// Anything shorter carries no extractable structure.
pub const MIN_TEXT_LEN: usize = 100;

/// Warning attached whenever the outcome needs manual review.
pub const REVIEW_WARNING: &str =
    "Campos críticos incompletos; se requiere revisión manual";

// Other sections' headers leak into captured remarks blocks routinely.
static REMARK_JUNK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:CUANT[IÍ]A(?:\s+DEL\s+ACTO(?:\s+O(?:\s+CONTRATO)?)?)?|VALOR|UBICACI[ÓO]N)\s*:?$",
    )
    .unwrap()
});
static REMARK_JUNK_EDGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:CUANT[IÍ]A(?:\s+DEL\s+ACTO(?:\s+O(?:\s+CONTRATO)?)?)?|VALOR|UBICACI[ÓO]N)\s*:?\s*|\s*(?:CUANT[IÍ]A(?:\s+DEL\s+ACTO(?:\s+O(?:\s+CONTRATO)?)?)?|VALOR|UBICACI[ÓO]N)\s*:?\s*$",
    )
    .unwrap()
});

/// Scrub leaked section headers out of a remarks capture and collapse
/// whitespace. Fewer than 5 chars left after cleaning means the block
/// carried no real remarks.
fn clean_remarks(raw: &str) -> Option<String> {
    let kept: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !REMARK_JUNK_LINE.is_match(l))
        .collect();
    let joined = kept.join(" ");
    let scrubbed = REMARK_JUNK_EDGE.replace_all(&joined, "");
    let cleaned = scrubbed.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.len() < 5 {
        None
    } else {
        Some(cleaned)
    }
}

/// Extract a best-effort record from raw document text.
///
/// Status policy: of the three critical fields (acto, fecha de
/// otorgamiento, número de escritura) at least two must be present for
/// an `activo` outcome; anything less is flagged for review.
pub fn extract(raw_text: &str, source_file: Option<&str>) -> ExtractionOutcome {
    let text = sanitize::sanitize_extracted_text(raw_text);
    if text.trim().len() < MIN_TEXT_LEN {
        debug!(len = text.trim().len(), "extraction input below minimum length");
        return ExtractionOutcome::needs_review(
            "Texto insuficiente para extracción (menos de 100 caracteres)",
        );
    }

    let mut warnings = Vec::new();

    let act = patterns::first_match(&text, &patterns::ACT)
        .map(|(idx, v)| {
            debug!(pattern = idx, "acto matched");
            patterns::cut_trailing_labels(&v)
        })
        .filter(|v| !v.is_empty());
    let deed_number = patterns::first_match(&text, &patterns::DEED_NUMBER).map(|(_, v)| {
        v.chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_uppercase()
    });
    let grant_date = patterns::first_match(&text, &patterns::GRANT_DATE).map(|(_, v)| v);
    let notary_name =
        patterns::first_match(&text, &patterns::NOTARY).map(|(_, v)| patterns::clean_notary_name(&v));
    let notary_office = patterns::first_match(&text, &patterns::NOTARY_OFFICE)
        .map(|(_, v)| patterns::cut_trailing_labels(&v));

    let amount = patterns::first_match(&text, &patterns::AMOUNT)
        .map(|(_, v)| amount::normalize_amount(&v))
        .unwrap_or(crate::models::Amount::Indeterminate);

    let location = extract_location(&text);
    let remarks = patterns::first_match(&text, &patterns::REMARKS)
        .and_then(|(_, v)| clean_remarks(&v));

    let grantors = person_section(&text, &sections::GRANTOR_LABELS, "COMPARECIENTE");
    let beneficiaries = person_section(&text, &sections::BENEFICIARY_LABELS, "BENEFICIARIO");
    if grantors.is_empty() {
        warnings.push("No se identificaron otorgantes".to_string());
    }

    let extra_fields = labels::extract_generic_labels(&text);

    let critical_present = [&act, &grant_date, &deed_number]
        .iter()
        .filter(|f| f.is_some())
        .count();
    let status = if critical_present >= 2 {
        ExtractionStatus::Active
    } else {
        warnings.push(REVIEW_WARNING.to_string());
        ExtractionStatus::NeedsReview
    };

    debug!(
        status = %status,
        grantors = grantors.len(),
        beneficiaries = beneficiaries.len(),
        critical_present,
        "extraction finished"
    );

    let record = NormalizedRecord {
        act_description: act,
        deed_number,
        grant_date,
        grantors,
        beneficiaries,
        notary_name,
        notary_office,
        location,
        amount,
        remarks,
        extra_fields,
        source_file: source_file.map(str::to_string),
        extracted_at: chrono::Utc::now(),
    };

    ExtractionOutcome {
        success: true,
        status,
        record: Some(record),
        warnings,
    }
}

fn person_section(text: &str, label_set: &[regex::Regex], role: &str) -> Vec<Person> {
    sections::section_after(text, label_set)
        .map(|section| persons::extract_persons(section, role))
        .unwrap_or_default()
}

fn extract_location(text: &str) -> Option<Location> {
    for re in patterns::LOCATION.iter() {
        if let Some(caps) = re.captures(text) {
            if caps.len() >= 4 {
                return Some(Location {
                    province: caps[1].trim().to_uppercase(),
                    canton: caps[2].trim().to_uppercase(),
                    parish: caps[3].trim().to_uppercase(),
                });
            }
        }
    }
    None
}
