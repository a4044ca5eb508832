//! Act family detection for template modifiers.

use crate::models::ActFamily;

/// Keyword routing, first match wins. Anything unrecognized takes the
/// generic modifier.
pub fn detect_family(act: &str) -> ActFamily {
    let upper = act.to_uppercase();
    if upper.contains("PODER") || upper.contains("MANDATO") {
        ActFamily::Poder
    } else if upper.contains("COMPRAVENTA") || upper.contains("COMPRA VENTA") {
        ActFamily::Compraventa
    } else if upper.contains("HIPOTECA") {
        ActFamily::Hipoteca
    } else if upper.contains("AUTORIZACIÓN") || upper.contains("AUTORIZACION") {
        ActFamily::Autorizacion
    } else if upper.contains("RECONOCIMIENTO") {
        ActFamily::Reconocimiento
    } else {
        ActFamily::Generica
    }
}
