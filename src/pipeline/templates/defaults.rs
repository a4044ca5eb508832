//! Built-in template texts.
//!
//! Used when no file overrides them under the templates directory, so
//! the pipeline works out of the box. The `{{modificadores}}` marker is
//! the insertion point for family fragments; it is removed when no
//! fragment applies.

pub const BASE_A: &str = "\
{{numero_copia}} COPIA CERTIFICADA de la escritura pública de {{acto}} \
{{que_otorga}} {{tratamiento_otorgantes}} {{otorgantes}}, {{a_favor_de}} {{beneficiarios}}. \
Se otorgó ante mí y en fe de ello confiero esta copia firmada y sellada.

{{modificadores}}

{{notaria_numero}}
{{notario_nombre}}
NOTARIO(A)
";

pub const BASE_B: &str = "\
{{numero_copia}} COPIA CERTIFICADA de la escritura pública de {{acto}} \
{{que_otorga}} {{tratamiento_otorgantes}} {{otorgantes}}. \
Se otorgó ante mí y en fe de ello confiero esta copia firmada y sellada.

{{modificadores}}

{{notaria_numero}}
{{notario_nombre}}
NOTARIO(A)
";

pub const BASE_C: &str = "\
{{numero_copia}} COPIA CERTIFICADA del acta de {{acto}}, \
trámite especial sustanciado en esta Notaría con intervención de \
{{tratamiento_otorgantes}} {{otorgantes}}. \
Se otorgó ante mí y en fe de ello confiero esta copia firmada y sellada.

{{modificadores}}

{{notaria_numero}}
{{notario_nombre}}
NOTARIO(A)
";

pub const MOD_PODER: &str = "\
El poder conferido faculta a {{beneficiarios}} para actuar a nombre y \
representación de {{otorgantes}} en los términos del instrumento.";

pub const MOD_COMPRAVENTA: &str = "\
La transferencia de dominio materia de la {{acto}} queda perfeccionada \
entre {{otorgantes}} y {{beneficiarios}} conforme al instrumento.";

pub const MOD_HIPOTECA: &str = "\
El gravamen hipotecario constituido por {{otorgantes}} queda detallado \
en el instrumento, con las obligaciones garantizadas a favor de \
{{beneficiarios}}.";

pub const MOD_AUTORIZACION: &str = "\
La autorización consta otorgada por {{otorgantes}} en los términos y \
por el plazo que el instrumento señala.";

pub const MOD_RECONOCIMIENTO: &str = "\
Las firmas y rúbricas que anteceden fueron reconocidas ante mí por \
{{otorgantes}}.";

pub const MOD_GENERICA: &str = "\
El contenido íntegro del acto de {{acto}} consta en el instrumento que \
antecede.";

/// Resolve a template name to its built-in text.
pub fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "estructura_a.txt" => Some(BASE_A),
        "estructura_b.txt" => Some(BASE_B),
        "estructura_c.txt" => Some(BASE_C),
        "mods/poder.txt" => Some(MOD_PODER),
        "mods/compraventa.txt" => Some(MOD_COMPRAVENTA),
        "mods/hipoteca.txt" => Some(MOD_HIPOTECA),
        "mods/autorizacion.txt" => Some(MOD_AUTORIZACION),
        "mods/reconocimiento.txt" => Some(MOD_RECONOCIMIENTO),
        "mods/generica.txt" => Some(MOD_GENERICA),
        _ => None,
    }
}
