//! Spanish agreement helpers for concuerdo wording.
//!
//! All pure. Gender for natural persons is a heuristic over common
//! Ecuadorian given names, falling back to the trailing-A rule.

use crate::models::{Gender, Person, PersonKind};

const MALE_GIVEN: &[&str] = &[
    "JOSE", "JUAN", "CARLOS", "DANIEL", "MIGUEL", "DIEGO", "ANDRES", "LUIS", "PEDRO", "PABLO",
    "FRANCISCO", "JAVIER", "FERNANDO", "ROBERTO", "WILLIAM", "STALIN", "IGNACIO", "ENRIQUE",
    "EDUARDO", "ANTONIO", "RAFAEL", "RICARDO", "ALFREDO", "MARCO", "OSCAR", "GUSTAVO",
];

const FEMALE_GIVEN: &[&str] = &[
    "MARIA", "ANA", "ROSA", "ELENA", "FERNANDA", "LUISA", "VALERIA", "CAMILA", "GABRIELA",
    "SOFIA", "ISABEL", "PATRICIA", "VERONICA", "SUSAN", "MAGDALENA", "CARMEN", "TERESA",
    "BEATRIZ", "ELIZABETH", "NOELIA", "PAULA", "PAOLA", "MERCEDES", "PILAR", "GUADALUPE",
];

const COMPANY_TOKENS: &[&str] = &[
    "S.A.", "S.A.S", "CIA", "CÍA", "LTDA", "CORP", "INC", "COMPAÑIA", "COMPAÑÍA", "FUNDACION",
    "FUNDACIÓN", "COOPERATIVA", "BANCO",
];

/// Verb agreement for the granting clause.
pub fn verbo_otorgar(grantor_count: usize) -> &'static str {
    if grantor_count == 1 {
        "que otorga"
    } else {
        "que otorgan"
    }
}

/// Gendered "hijo"/"hija" with a slash fallback when unknown.
pub fn hijo_o_hija(gender: Gender) -> &'static str {
    match gender {
        Gender::M => "hijo",
        Gender::F => "hija",
        Gender::Unknown => "hijo/a",
    }
}

/// Natural vs. juridical person, from document type or company tokens
/// in the name.
pub fn person_kind(person: &Person) -> PersonKind {
    if person.document_type.to_uppercase().contains("RUC") {
        return PersonKind::Juridica;
    }
    let upper = person.name.to_uppercase();
    if COMPANY_TOKENS
        .iter()
        .any(|t| upper.split_whitespace().any(|w| w.trim_matches('.') == t.trim_matches('.')))
    {
        PersonKind::Juridica
    } else {
        PersonKind::Natural
    }
}

/// Gender heuristic for a natural person's full name. Checks the given
/// names against the known lists, then falls back to the trailing-A
/// rule. Never returns `Unknown`; "hijo/a" forms come from explicit
/// flags only.
pub fn detect_natural_gender(full_name: &str) -> Gender {
    let upper = full_name.trim().to_uppercase();
    let tokens: Vec<&str> = upper.split_whitespace().collect();
    if tokens.iter().any(|t| MALE_GIVEN.contains(t)) {
        return Gender::M;
    }
    if tokens.iter().any(|t| FEMALE_GIVEN.contains(t)) {
        return Gender::F;
    }
    // Surname-first documents put the given name last.
    let probe = tokens.last().copied().unwrap_or("");
    if probe.ends_with('A') {
        Gender::F
    } else {
        Gender::M
    }
}

fn group_profile(persons: &[Person]) -> (bool, bool, usize, usize) {
    let all_juridica = persons
        .iter()
        .all(|p| person_kind(p) == PersonKind::Juridica);
    let all_natural = persons.iter().all(|p| person_kind(p) == PersonKind::Natural);
    let fem = persons
        .iter()
        .filter(|p| {
            person_kind(p) == PersonKind::Natural && detect_natural_gender(&p.name) == Gender::F
        })
        .count();
    let masc = persons
        .iter()
        .filter(|p| {
            person_kind(p) == PersonKind::Natural && detect_natural_gender(&p.name) == Gender::M
        })
        .count();
    (all_juridica, all_natural, fem, masc)
}

/// Article + noun for a group of parties ("el señor", "las señoras",
/// "la compañía"...). Empty for an empty group.
pub fn tratamiento_grupo(persons: &[Person]) -> &'static str {
    if persons.is_empty() {
        return "";
    }
    let (all_juridica, all_natural, fem, masc) = group_profile(persons);
    if persons.len() == 1 {
        return match person_kind(&persons[0]) {
            PersonKind::Juridica => "la compañía",
            PersonKind::Natural => {
                if detect_natural_gender(&persons[0].name) == Gender::F {
                    "la señora"
                } else {
                    "el señor"
                }
            }
        };
    }
    if all_juridica {
        return "las compañías";
    }
    if all_natural && masc == 0 && fem > 0 {
        return "las señoras";
    }
    "los señores"
}

/// "a favor de" with the Spanish "de + el" contraction applied against
/// the group's tratamiento.
pub fn contraccion_a_favor(persons: &[Person]) -> String {
    let tratamiento = tratamiento_grupo(persons);
    if tratamiento.is_empty() {
        "a favor de".to_string()
    } else if let Some(rest) = tratamiento.strip_prefix("el ") {
        format!("a favor del {rest}")
    } else {
        format!("a favor de {tratamiento}")
    }
}

/// One person, with a single-level representation clause when present.
pub fn render_person(person: &Person) -> String {
    match &person.represented_by {
        Some(rep) => format!(
            "{}, debidamente representada por {}",
            person.name, rep.name
        ),
        None => person.name.clone(),
    }
}

/// Comma list with the final pair joined by "y".
pub fn human_join(items: &[String]) -> String {
    let list: Vec<&String> = items.iter().filter(|s| !s.is_empty()).collect();
    match list.len() {
        0 => String::new(),
        1 => list[0].clone(),
        _ => {
            let head = &list[..list.len() - 1];
            let joined: Vec<&str> = head.iter().map(|s| s.as_str()).collect();
            format!("{} y {}", joined.join(", "), list[list.len() - 1])
        }
    }
}

/// Render a party list for template substitution.
pub fn render_person_list(persons: &[Person]) -> String {
    let names: Vec<String> = persons.iter().map(render_person).collect();
    human_join(&names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_agrees_with_grantor_count() {
        assert_eq!(verbo_otorgar(1), "que otorga");
        assert_eq!(verbo_otorgar(2), "que otorgan");
        assert_eq!(verbo_otorgar(5), "que otorgan");
    }

    #[test]
    fn hijo_forms_follow_gender_flag() {
        assert_eq!(hijo_o_hija(Gender::M), "hijo");
        assert_eq!(hijo_o_hija(Gender::F), "hija");
        assert_eq!(hijo_o_hija(Gender::Unknown), "hijo/a");
    }

    #[test]
    fn human_join_uses_spanish_conjunction() {
        let items = vec!["Ana".to_string(), "Luis".to_string(), "Eva".to_string()];
        assert_eq!(human_join(&items), "Ana, Luis y Eva");
        assert_eq!(human_join(&items[..1]), "Ana");
        assert_eq!(human_join(&items[..2]), "Ana y Luis");
        assert_eq!(human_join(&[]), "");
    }

    #[test]
    fn gender_heuristic_on_common_names() {
        assert_eq!(detect_natural_gender("PEREZ LOPEZ JUAN CARLOS"), Gender::M);
        assert_eq!(detect_natural_gender("TORRES VACA MARIA ELENA"), Gender::F);
        assert_eq!(detect_natural_gender("ZHANG WEI SELENA"), Gender::F);
    }

    #[test]
    fn company_detection_from_name_and_document() {
        let company = Person::named("ACME CIA. LTDA.");
        assert_eq!(person_kind(&company), PersonKind::Juridica);
        let by_ruc = Person::named("CONSORCIO ANDINO").with_document("RUC", "1790012345001");
        assert_eq!(person_kind(&by_ruc), PersonKind::Juridica);
        let natural = Person::named("JUAN PEREZ");
        assert_eq!(person_kind(&natural), PersonKind::Natural);
    }

    #[test]
    fn tratamiento_for_single_and_group() {
        let one_m = vec![Person::named("JUAN PEREZ")];
        assert_eq!(tratamiento_grupo(&one_m), "el señor");
        let one_f = vec![Person::named("MARIA TORRES")];
        assert_eq!(tratamiento_grupo(&one_f), "la señora");
        let mixed = vec![Person::named("JUAN PEREZ"), Person::named("MARIA TORRES")];
        assert_eq!(tratamiento_grupo(&mixed), "los señores");
        let two_f = vec![Person::named("MARIA TORRES"), Person::named("ANA SALAS")];
        assert_eq!(tratamiento_grupo(&two_f), "las señoras");
        let company = vec![Person::named("ACME CIA. LTDA.")];
        assert_eq!(tratamiento_grupo(&company), "la compañía");
    }

    #[test]
    fn a_favor_contraction() {
        let one_m = vec![Person::named("JUAN PEREZ")];
        assert_eq!(contraccion_a_favor(&one_m), "a favor del señor");
        let one_f = vec![Person::named("MARIA TORRES")];
        assert_eq!(contraccion_a_favor(&one_f), "a favor de la señora");
        assert_eq!(contraccion_a_favor(&[]), "a favor de");
    }

    #[test]
    fn representation_clause_is_rendered() {
        let person = Person::named("ACME CIA. LTDA.")
            .represented_by(Person::named("MARIA TORRES VACA"));
        assert_eq!(
            render_person(&person),
            "ACME CIA. LTDA., debidamente representada por MARIA TORRES VACA"
        );
    }
}
