//! PII masking for audit payloads and log output.

use std::sync::LazyLock;

use regex::Regex;

// Rule order matters: a 10-digit run is taken as a cédula before the
// phone rule sees it.
static CEDULA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2})(\d{6})(\d{2})\b").unwrap());
static RUC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{2})(\d{7})(\d{4})\b").unwrap());
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{3})(\d{3})(\d{4})\b").unwrap());

/// Partially mask cédula, RUC and phone-like sequences, preserving a
/// fixed prefix and suffix.
pub fn mask_pii(text: &str) -> String {
    let masked = CEDULA.replace_all(text, "${1}******${3}");
    let masked = RUC.replace_all(&masked, "${1}*******${3}");
    PHONE.replace_all(&masked, "${1}***${3}").into_owned()
}

fn mask_token(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.count();
            format!("{first}{}", "*".repeat(rest))
        }
        None => String::new(),
    }
}

/// Mask a personal name: first letter of the first two tokens kept,
/// remaining tokens fully masked.
pub fn mask_name(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.len() {
        0 => name.to_string(),
        1 => {
            let only = parts[0];
            let len = only.chars().count();
            if len > 2 {
                let first = only.chars().next().unwrap_or('*');
                let last = only.chars().last().unwrap_or('*');
                format!("{first}{}{last}", "*".repeat(len - 2))
            } else {
                only.to_string()
            }
        }
        _ => {
            let mut out = vec![mask_token(parts[0]), mask_token(parts[1])];
            out.extend(
                parts[2..]
                    .iter()
                    .map(|p| "*".repeat(p.chars().count())),
            );
            out.join(" ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cedula_keeps_prefix_and_suffix() {
        assert_eq!(mask_pii("cédula 1712345678"), "cédula 17******78");
    }

    #[test]
    fn ruc_keeps_two_and_four() {
        assert_eq!(mask_pii("RUC 1790012345001"), "RUC 17*******5001");
    }

    #[test]
    fn text_without_digits_is_untouched() {
        assert_eq!(mask_pii("sin datos sensibles"), "sin datos sensibles");
    }

    #[test]
    fn name_masks_keeping_initials() {
        assert_eq!(mask_name("JUAN PEREZ"), "J*** P****");
        assert_eq!(
            mask_name("MARIA ELENA TORRES VACA"),
            "M**** E**** ****** ****"
        );
    }

    #[test]
    fn single_token_name_keeps_ends() {
        assert_eq!(mask_name("FERNANDA"), "F******A");
        assert_eq!(mask_name("AL"), "AL");
    }
}
