//! Person extraction inside a scoped section.
//!
//! Three strategies run in order and merge with de-duplication by
//! normalized name: structured table parsing with recognized column
//! headers, generic delimited table parsing under a "NOMBRES / RAZÓN
//! SOCIAL" header, and line-by-line heuristics (vertical person blocks
//! and cédula/nationality detection). A sanitation filter drops the
//! header leakage and junk rows the source extracts are full of.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Person, DEFAULT_NATIONALITY};

static REPRESENTED_BY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s+REPRESENTAD[OA]\s+POR[:\s]+(.+?)\s*[,.]?$").unwrap()
});

static CEDULA_IN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]{10})\b").unwrap());

static DOCUMENT_IN_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(C[ÉE]DULA|RUC|PASAPORTE)\s*:?\s*([0-9A-Z-]+)").unwrap()
});

static PERSON_KIND_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(NATURAL|JUR[IÍ]DICA)$").unwrap());

static ROLE_NOISE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)PROPIOS|DERECHOS|POR\s+SUS|COMPARECIEN|BENEFICIARI|REPRESENTA|INTERVINIENTE|OTORGA|ESTADO\s+CIVIL|PROFESI[ÓO]N|DOMICILIADO").unwrap()
});

static NATIONALITY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(ECUATORIA\w*|EXTRANJER\w*|COLOMBIAN\w*|PERUAN\w*|VENEZOLAN\w*)").unwrap()
});

static HEADER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(PERSONA|NOMBRES|RAZ[ÓO]N|SOCIAL|TIPO|INTERVINIENTE|DOCUMENTO|IDENTIDAD|NO\.|NACIONALIDAD|CALIDAD|REPRES|CUANT[IÍ]A|UBICACI[ÓO]N|NATURAL\b|JUR[IÍ]DICA)").unwrap()
});

static NAMES_TABLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)NOMBRES\s*(?:/|\s*[–-]\s*)?\s*RAZ[ÓO]N\s+SOCIAL").unwrap()
});

/// Multi-word junk entries that survive the token-count filter.
const JUNK_NAMES: &[&str] = &[
    "OTORGADO POR",
    "A FAVOR DE",
    "DE A FAVOR",
    "POR SUS PROPIOS",
    "POR SUS PROPIOS DERECHOS",
    "PROPIOS POR SUS",
    "DOCUMENTO DE IDENTIDAD",
    "DOCUMENTO DE",
    "PERSONA QUE REPRESENTA",
    "PERSONA QUE LE",
    "REPRESENTADO POR",
    "REPRESENTANTE LEGAL",
    "NO IDENTIFICACION",
    "CUANTIA DEL ACTO",
    "ACTO O CONTRATO",
];

/// Case-fold, strip accents and collapse whitespace for comparisons.
pub fn normalize_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_space = true;
    for c in s.chars() {
        let mapped = match c.to_uppercase().next().unwrap_or(c) {
            'Á' | 'À' | 'Ä' | 'Â' => 'A',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            upper => upper,
        };
        if mapped.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(mapped);
            last_space = false;
        }
    }
    out.trim().to_string()
}

/// Sanitation filter applied before accepting any extracted person.
/// Rejects short entries, header leakage, purely numeric rows and
/// single-token values.
pub fn is_valid_person_name(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.len() < 5 {
        return false;
    }
    if !trimmed.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    if trimmed.split_whitespace().count() < 2 {
        return false;
    }
    let norm = normalize_name(trimmed);
    if JUNK_NAMES.contains(&norm.as_str()) {
        return false;
    }
    if HEADER_PREFIX.is_match(&norm) {
        return false;
    }
    true
}

/// Drop junk suffixes the "Tipo" column sometimes glues onto the name
/// ("LIU WEINatural" style concatenation), then apply the filter.
fn clean_name(raw: &str) -> Option<String> {
    static GLUED_KIND: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)(NATURAL|JUR[IÍ]DICA)[A-ZÁÉÍÓÚÑÜ]*$").unwrap());
    let cleaned = GLUED_KIND.replace(raw.trim(), "").trim().to_string();
    if is_valid_person_name(&cleaned) {
        Some(cleaned)
    } else {
        None
    }
}

/// Split a name on "representado por", keeping the representation link.
fn split_representation(raw: &str) -> (String, Option<String>) {
    if let Some(caps) = REPRESENTED_BY.captures(raw) {
        let principal = caps[1].trim().to_string();
        let representative = caps[2].trim().to_string();
        (principal, Some(representative))
    } else {
        (raw.trim().to_string(), None)
    }
}

fn build_person(raw_name: &str, role: &str) -> Option<Person> {
    let (principal_raw, rep_raw) = split_representation(raw_name);
    let name = clean_name(&principal_raw)?;
    let mut person = Person::named(name).with_role(role);
    if let Some(rep) = rep_raw {
        if let Some(rep_name) = clean_name(&rep) {
            person = person.represented_by(
                Person::named(rep_name).with_role("REPRESENTANTE LEGAL"),
            );
        }
    }
    Some(person)
}

fn split_row(line: &str) -> Vec<&str> {
    static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}|\t+").unwrap());
    if line.contains('|') {
        line.split('|').map(str::trim).filter(|c| !c.is_empty()).collect()
    } else {
        MULTI_SPACE
            .split(line)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Column {
    Name,
    DocType,
    DocNumber,
    Nationality,
    Role,
    Ignored,
}

fn classify_column(header: &str) -> Column {
    let n = normalize_name(header);
    if n.contains("NOMBRES") || n.contains("RAZON SOCIAL") {
        Column::Name
    } else if n.contains("CEDULA")
        || n.contains("RUC")
        || n.contains("PASAPORTE")
        || n.contains("IDENTIFICACION")
        || n.contains("NUMERO")
    {
        Column::DocNumber
    } else if n.contains("DOCUMENTO") || n.contains("TIPO") {
        Column::DocType
    } else if n.contains("NACIONALIDAD") {
        Column::Nationality
    } else if n.contains("CALIDAD") || n.contains("INTERV") {
        Column::Role
    } else {
        Column::Ignored
    }
}

/// Strategy 1: a table with recognized column headers ("Nombres/Razón
/// social", "Documento", "Cédula", "Nacionalidad", "Calidad").
fn parse_structured_table(section: &str, default_role: &str) -> Vec<Person> {
    let lines: Vec<&str> = section.lines().collect();

    let mut header_idx = None;
    let mut columns: Vec<Column> = Vec::new();
    for (i, line) in lines.iter().take(25).enumerate() {
        let cells = split_row(line);
        if cells.len() < 2 {
            continue;
        }
        let cols: Vec<Column> = cells.iter().map(|c| classify_column(c)).collect();
        let has_name = cols.contains(&Column::Name);
        let has_id = cols.contains(&Column::DocNumber);
        let has_kind = cells.iter().any(|c| normalize_name(c) == "PERSONA");
        if (has_name && has_id) || (has_kind && has_name) {
            header_idx = Some(i);
            columns = cols;
            break;
        }
    }

    let Some(start) = header_idx else {
        return Vec::new();
    };

    let mut persons = Vec::new();
    for line in &lines[start + 1..] {
        if line.trim().is_empty() {
            break;
        }
        if HEADER_PREFIX.is_match(line.trim()) && split_row(line).len() < 2 {
            break;
        }
        let cells = split_row(line);
        if cells.is_empty() {
            continue;
        }

        let mut name_raw = None;
        let mut doc_type = None;
        let mut doc_number = None;
        let mut nationality = None;
        let mut role = None;
        for (idx, val) in cells.iter().enumerate() {
            match columns.get(idx).copied().unwrap_or(Column::Ignored) {
                Column::Name => name_raw = Some(*val),
                Column::DocType => doc_type = Some(*val),
                Column::DocNumber => {
                    let digits: String =
                        val.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
                    if !digits.is_empty() {
                        doc_number = Some(digits);
                    }
                }
                Column::Nationality => nationality = Some(*val),
                Column::Role => role = Some(*val),
                Column::Ignored => {}
            }
        }

        let Some(raw) = name_raw else { continue };
        let Some(mut person) = build_person(raw, role.unwrap_or(default_role)) else {
            continue;
        };
        if let Some(dt) = doc_type {
            person.document_type = normalize_name(dt).replace("CEDULA", "CÉDULA");
        }
        person.document_number = doc_number;
        if let Some(nat) = nationality {
            if !nat.trim().is_empty() {
                person.nationality = nat.trim().to_uppercase();
            }
        }
        persons.push(person);
    }
    persons
}

/// Strategy 2: rows under a bare "NOMBRES / RAZÓN SOCIAL" header,
/// first column only.
fn parse_delimited_names(section: &str, default_role: &str) -> Vec<Person> {
    let mut persons = Vec::new();
    let mut in_table = false;
    for line in section.lines() {
        if !in_table {
            if NAMES_TABLE_HEADER.is_match(line) {
                in_table = true;
            }
            continue;
        }
        if line.trim().is_empty() {
            break;
        }
        if let Some(first) = split_row(line).first() {
            if first.chars().any(|c| c.is_alphabetic()) {
                if let Some(p) = build_person(first, default_role) {
                    persons.push(p);
                }
            }
        }
    }
    persons
}

/// Strategy 3a: vertical person blocks opened by a bare "Natural" or
/// "Jurídica" line, with name fragments, document and nationality on
/// the following lines.
fn parse_person_blocks(section: &str, default_role: &str) -> Vec<Person> {
    struct Block {
        doc_type: String,
        doc_number: Option<String>,
        nationality: Option<String>,
        name_parts: Vec<String>,
    }

    let mut persons: Vec<Person> = Vec::new();
    let mut current: Option<Block> = None;

    let flush = |block: Option<Block>, persons: &mut Vec<Person>| {
        if let Some(b) = block {
            let raw = b.name_parts.join(" ");
            if let Some(mut p) = build_person(&raw, default_role) {
                p.document_type = b.doc_type;
                p.document_number = b.doc_number;
                if let Some(nat) = b.nationality {
                    p.nationality = nat;
                }
                persons.push(p);
            }
        }
    };

    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(kind) = PERSON_KIND_LINE.captures(line) {
            flush(current.take(), &mut persons);
            let juridica = kind[1].to_uppercase().starts_with("JUR");
            current = Some(Block {
                doc_type: if juridica { "RUC" } else { "CÉDULA" }.to_string(),
                doc_number: None,
                nationality: None,
                name_parts: Vec::new(),
            });
            continue;
        }
        let Some(block) = current.as_mut() else { continue };

        if let Some(caps) = DOCUMENT_IN_LINE.captures(line) {
            block.doc_type = normalize_name(&caps[1]).replace("CEDULA", "CÉDULA");
            block.doc_number = Some(caps[2].to_string());
            continue;
        }
        if ROLE_NOISE_LINE.is_match(line) {
            continue;
        }
        if NATIONALITY_LINE.is_match(line) {
            let upper = line.to_uppercase();
            block.nationality = Some(if upper.starts_with("ECUATORIA") {
                DEFAULT_NATIONALITY.to_string()
            } else {
                upper
            });
            continue;
        }
        if HEADER_PREFIX.is_match(line) {
            continue;
        }
        // Digit-heavy lines are ids or dates, never name fragments.
        if line.chars().filter(|c| c.is_ascii_digit()).count() >= 2 {
            continue;
        }
        if line.len() > 1 {
            block.name_parts.push(line.to_string());
        }
    }
    flush(current.take(), &mut persons);
    persons
}

/// Strategy 3b: naive line-by-line fallback. Each plausible line is a
/// person; embedded cédulas and representation phrases are recognized.
fn parse_person_lines(section: &str, default_role: &str) -> Vec<Person> {
    let blocks = parse_person_blocks(section, default_role);
    if !blocks.is_empty() {
        return blocks;
    }

    let mut persons = Vec::new();
    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut raw = line.to_string();
        let mut number = None;
        if let Some(caps) = CEDULA_IN_LINE.captures(&raw) {
            number = Some(caps[1].to_string());
            raw = CEDULA_IN_LINE.replace(&raw, "").trim().to_string();
        }
        if let Some(mut person) = build_person(&raw, default_role) {
            person.document_number = number;
            persons.push(person);
        }
    }
    persons
}

/// Merge lists keeping the first occurrence per normalized name.
pub fn merge_unique(lists: Vec<Vec<Person>>) -> Vec<Person> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for person in lists.into_iter().flatten() {
        let key = normalize_name(&person.name);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        out.push(person);
    }
    out
}

/// Run all strategies over a scoped section. The structured table wins
/// outright when it matches; otherwise the table-less strategies merge.
pub fn extract_persons(section: &str, default_role: &str) -> Vec<Person> {
    let structured = parse_structured_table(section, default_role);
    if !structured.is_empty() {
        return merge_unique(vec![structured]);
    }
    merge_unique(vec![
        parse_delimited_names(section, default_role),
        parse_person_lines(section, default_role),
    ])
}
