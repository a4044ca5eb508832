use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::Person;

/// Wire literal for an amount the document declares or leaves undetermined.
pub const INDETERMINATE: &str = "INDETERMINADA";

/// A monetary amount, already normalized. Raw currency strings are
/// never stored: parsing happens at the extraction boundary and
/// anything unparsable collapses to `Indeterminate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Value(f64),
    Indeterminate,
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::Indeterminate => serializer.serialize_str(INDETERMINATE),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Amount::Value)
                .ok_or_else(|| de::Error::custom("amount out of f64 range")),
            serde_json::Value::String(_) | serde_json::Value::Null => Ok(Amount::Indeterminate),
            other => Err(de::Error::custom(format!(
                "amount must be a number or a string, got {other}"
            ))),
        }
    }
}

/// Ubicación block of the extract (province / canton / parish).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub province: String,
    pub canton: String,
    pub parish: String,
}

/// Normalized output of extraction, local or remote. Created fresh per
/// document and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub act_description: Option<String>,
    pub deed_number: Option<String>,
    pub grant_date: Option<String>,
    pub grantors: Vec<Person>,
    pub beneficiaries: Vec<Person>,
    pub notary_name: Option<String>,
    pub notary_office: Option<String>,
    pub location: Option<Location>,
    pub amount: Amount,
    pub remarks: Option<String>,
    /// Generic LABEL: value pairs not covered by known fields,
    /// label normalized (upper, accent-stripped).
    pub extra_fields: BTreeMap<String, String>,
    pub source_file: Option<String>,
    pub extracted_at: DateTime<Utc>,
}

impl NormalizedRecord {
    pub fn empty() -> Self {
        Self {
            act_description: None,
            deed_number: None,
            grant_date: None,
            grantors: Vec::new(),
            beneficiaries: Vec::new(),
            notary_name: None,
            notary_office: None,
            location: None,
            amount: Amount::Indeterminate,
            remarks: None,
            extra_fields: BTreeMap::new(),
            source_file: None,
            extracted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_serializes_value_as_number() {
        let json = serde_json::to_string(&Amount::Value(1234.56)).unwrap();
        assert_eq!(json, "1234.56");
    }

    #[test]
    fn amount_serializes_indeterminate_as_literal() {
        let json = serde_json::to_string(&Amount::Indeterminate).unwrap();
        assert_eq!(json, "\"INDETERMINADA\"");
    }

    #[test]
    fn amount_deserializes_number_and_string() {
        let v: Amount = serde_json::from_str("1500").unwrap();
        assert_eq!(v, Amount::Value(1500.0));
        let s: Amount = serde_json::from_str("\"INDETERMINADA\"").unwrap();
        assert_eq!(s, Amount::Indeterminate);
        let n: Amount = serde_json::from_str("null").unwrap();
        assert_eq!(n, Amount::Indeterminate);
    }

    #[test]
    fn empty_record_defaults_to_indeterminate_amount() {
        let r = NormalizedRecord::empty();
        assert_eq!(r.amount, Amount::Indeterminate);
        assert!(r.grantors.is_empty());
        assert!(r.extra_fields.is_empty());
    }
}
