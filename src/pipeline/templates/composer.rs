//! Template rendering with placeholder substitution and family splice.

use std::sync::LazyLock;

use regex::Regex;
use tracing::error;

use super::{family, grammar, store::TemplateStore, TemplateError};
use crate::models::{CopyNumber, NormalizedRecord, RenderMode, Structure};

/// Any placeholder left after substitution renders as empty text,
/// never as an error.
static LEFTOVER_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*[a-z_]+\s*\}\}").unwrap());

static MULTI_BLANK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

const MODIFIER_MARKER: &str = "{{modificadores}}";
const SIGNATURE_PLACEHOLDER: &str = "{{notario_nombre}}";

fn base_template_name(structure: Structure) -> &'static str {
    match structure {
        Structure::A => "estructura_a.txt",
        Structure::B => "estructura_b.txt",
        Structure::C => "estructura_c.txt",
    }
}

fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("{{{{{name}}}}}"), value);
    }
    out
}

/// Splice a family fragment at the explicit `{{modificadores}}` marker,
/// falling back to just before the last notary-name placeholder when a
/// disk override dropped the marker.
fn splice_modifier(base: &str, fragment: &str) -> String {
    if base.contains(MODIFIER_MARKER) {
        return base.replace(MODIFIER_MARKER, fragment);
    }
    if let Some(idx) = base.rfind(SIGNATURE_PLACEHOLDER) {
        let mut out = String::with_capacity(base.len() + fragment.len() + 4);
        out.push_str(&base[..idx]);
        out.push_str("\n\n");
        out.push_str(fragment);
        out.push_str("\n\n");
        out.push_str(&base[idx..]);
        return out;
    }
    format!("{base}\n\n{fragment}")
}

pub struct Composer {
    store: TemplateStore,
}

impl Composer {
    pub fn new(store: TemplateStore) -> Self {
        Self { store }
    }

    /// Render one copy. Failures come back as a marked error string so
    /// batch generation never aborts on a single bad record.
    pub fn render(
        &self,
        structure: Structure,
        record: &NormalizedRecord,
        mode: RenderMode,
        copy: CopyNumber,
    ) -> String {
        match self.try_render(structure, record, mode, copy) {
            Ok(text) => text,
            Err(err) => {
                error!(structure = %structure, error = %err, "template rendering failed");
                defaults_error(structure)
            }
        }
    }

    fn try_render(
        &self,
        structure: Structure,
        record: &NormalizedRecord,
        mode: RenderMode,
        copy: CopyNumber,
    ) -> Result<String, TemplateError> {
        let mut source = self.store.load(base_template_name(structure))?;

        let act = record.act_description.clone().unwrap_or_default();
        let otorgantes = grammar::render_person_list(&record.grantors);
        let beneficiarios = grammar::render_person_list(&record.beneficiaries);
        let que_otorga = grammar::verbo_otorgar(record.grantors.len().max(1));
        let tratamiento = grammar::tratamiento_grupo(&record.grantors);
        let a_favor = grammar::contraccion_a_favor(&record.beneficiaries);
        let notario = record.notary_name.clone().unwrap_or_default();
        let notaria = record.notary_office.clone().unwrap_or_default();

        let vars: Vec<(&str, &str)> = vec![
            ("numero_copia", copy.as_str()),
            ("acto", &act),
            ("que_otorga", que_otorga),
            ("tratamiento_otorgantes", tratamiento),
            ("otorgantes", &otorgantes),
            ("a_favor_de", &a_favor),
            ("beneficiarios", &beneficiarios),
            ("notario_nombre", &notario),
            ("notaria_numero", &notaria),
        ];

        if mode == RenderMode::Family {
            let family = family::detect_family(&act);
            let fragment_source = self.store.load(&format!("mods/{}.txt", family.as_str()))?;
            let fragment = substitute(&fragment_source, &vars);
            source = splice_modifier(&source, &fragment);
        }

        let mut rendered = substitute(&source, &vars);
        rendered = LEFTOVER_PLACEHOLDER.replace_all(&rendered, "").into_owned();
        rendered = MULTI_BLANK.replace_all(&rendered, "\n\n").into_owned();
        Ok(rendered.trim().to_string())
    }
}

/// Marked error text embedding the structure code.
fn defaults_error(structure: Structure) -> String {
    format!(
        "ERROR: No se pudo renderizar template para estructura {}",
        structure.as_str()
    )
}
