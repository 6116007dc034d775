//! Shared input formats for request validation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Brazilian plate, old (ABC1234) or Mercosul (ABC1D23)
pub static PLACA_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}[0-9][A-Z0-9][0-9]{2}$").expect("valid plate regex"));

/// CPF (11 digits) or CNPJ (14 digits), digits only
pub static DOCUMENTO_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{11}|[0-9]{14})$").expect("valid document regex"));

/// CEP with or without hyphen
pub static CEP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{5}-?[0-9]{3}$").expect("valid CEP regex"));

/// Two-letter state code
pub static UF_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("valid UF regex"));

/// Replace `target` when `value` carries non-blank text. Returns whether it changed.
pub(crate) fn apply_text(target: &mut String, value: Option<&str>) -> bool {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() && text != target => {
            *target = text.to_string();
            true
        }
        _ => false,
    }
}

/// Replace `target` when `value` is present and different. Returns whether it changed.
pub(crate) fn apply_value<T: PartialEq + Clone>(target: &mut T, value: Option<&T>) -> bool {
    match value {
        Some(v) if v != target => {
            *target = v.clone();
            true
        }
        _ => false,
    }
}
