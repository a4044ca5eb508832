use serde::{Deserialize, Serialize};

/// One grantor, beneficiary or represented party as extracted from a
/// notarial extract. Defaults mirror the most common case in the
/// source documents: a natural person identified by cédula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub document_type: String,
    pub document_number: Option<String>,
    pub nationality: String,
    pub role: String,
    /// Single-level representation link (company represented by its
    /// legal representative, minor by a parent). A represented party
    /// never points back.
    pub represented_by: Option<Box<Person>>,
}

/// Sentinel used when the identity document type is unknown.
pub const DEFAULT_DOCUMENT_TYPE: &str = "CÉDULA";
/// Locale default applied when the document states no nationality.
pub const DEFAULT_NATIONALITY: &str = "ECUATORIANA";
/// Free-form role applied when the document states no capacity.
pub const DEFAULT_ROLE: &str = "COMPARECIENTE";

impl Person {
    /// A person known only by name; every other field takes its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document_type: DEFAULT_DOCUMENT_TYPE.to_string(),
            document_number: None,
            nationality: DEFAULT_NATIONALITY.to_string(),
            role: DEFAULT_ROLE.to_string(),
            represented_by: None,
        }
    }

    pub fn with_document(mut self, doc_type: &str, number: &str) -> Self {
        self.document_type = doc_type.to_string();
        self.document_number = Some(number.to_string());
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = role.to_string();
        self
    }

    pub fn represented_by(mut self, representative: Person) -> Self {
        self.represented_by = Some(Box::new(representative));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_person_takes_locale_defaults() {
        let p = Person::named("JUAN PEREZ");
        assert_eq!(p.document_type, "CÉDULA");
        assert_eq!(p.nationality, "ECUATORIANA");
        assert_eq!(p.role, "COMPARECIENTE");
        assert!(p.document_number.is_none());
        assert!(p.represented_by.is_none());
    }

    #[test]
    fn representation_link_is_single_level() {
        let company = Person::named("ACME CIA. LTDA.")
            .with_document("RUC", "1790012345001")
            .represented_by(Person::named("MARIA TORRES VACA"));
        let rep = company.represented_by.as_ref().unwrap();
        assert_eq!(rep.name, "MARIA TORRES VACA");
        assert!(rep.represented_by.is_none());
    }
}
