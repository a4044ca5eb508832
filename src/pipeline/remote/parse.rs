//! Defensive parsing of remote extraction responses.
//!
//! The service is asked for bare JSON but routinely wraps it in prose
//! or code fences. The first `{` to the last `}` is scraped out and
//! parsed; anything that fails to parse or misses the expected shape
//! counts as a failed attempt upstream, never as an error.

use serde_json::Value;

use crate::models::{NormalizedRecord, Person};

/// Scrape the outermost JSON object out of a free-text response.
pub fn scrape_json(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

fn persons_from(value: &Value, key: &str, default_role: &str) -> Vec<Person> {
    let Some(entries) = value.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.get("nombre").and_then(Value::as_str)?.trim();
            if name.is_empty() {
                return None;
            }
            let role = entry
                .get("calidad")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .unwrap_or(default_role);
            Some(Person::named(name).with_role(role))
        })
        .collect()
}

/// Map the remote schema (`acto_o_contrato`, `otorgantes`,
/// `beneficiarios`, `notario`) onto a normalized record. Returns `None`
/// when the response carries no usable data at all.
pub fn record_from_remote(value: &Value, source_file: Option<&str>) -> Option<NormalizedRecord> {
    let mut record = NormalizedRecord::empty();
    record.act_description = value
        .get("acto_o_contrato")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    record.grantors = persons_from(value, "otorgantes", "COMPARECIENTE");
    record.beneficiaries = persons_from(value, "beneficiarios", "BENEFICIARIO");
    record.notary_name = value
        .get("notario")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    record.source_file = source_file.map(str::to_string);

    if record.act_description.is_none() && record.grantors.is_empty() {
        return None;
    }
    Some(record)
}
