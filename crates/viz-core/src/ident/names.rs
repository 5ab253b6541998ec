//! Normalización de nombres de dataset y utilidades de namespace.

use crate::constants::{ALL_PARAMETERS_NODE_NAME, PARAMS_PREFIX, TRANSCODING_SEPARATOR};

/// Quita el sufijo `@variante` si está presente; identidad en caso contrario.
pub fn strip_transcoding(name: &str) -> &str {
    match name.split_once(TRANSCODING_SEPARATOR) {
        Some((base, _)) => base,
        None => name,
    }
}

/// Sufijo de transcodificación declarado, si lo hay.
pub fn transcoding_variant(name: &str) -> Option<&str> {
    name.split_once(TRANSCODING_SEPARATOR).map(|(_, variant)| variant)
}

pub fn is_transcoded(name: &str) -> bool {
    name.contains(TRANSCODING_SEPARATOR)
}

/// `parameters` o cualquier `params:<ruta>` cuentan como nombre de parámetro;
/// un nombre que solo empieza por `param` es un dataset normal.
pub fn is_parameter_name(name: &str) -> bool {
    name == ALL_PARAMETERS_NODE_NAME || name.starts_with(PARAMS_PREFIX)
}

/// Ruta del parámetro individual (`params:a.b` → `a.b`); `None` para el
/// diccionario global y para nombres que no son parámetros.
pub fn parameter_path(name: &str) -> Option<&str> {
    name.strip_prefix(PARAMS_PREFIX)
}

/// Todo lo anterior al último `.`, o `None` si el nombre no está anidado.
pub fn namespace_of(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(ns, _)| ns)
}

/// Cadena de prefijos de un namespace: `"a.b.c"` → `["a", "a.b", "a.b.c"]`.
/// La cadena vacía produce la lista vacía.
pub fn expand_namespaces(namespace: &str) -> Vec<String> {
    if namespace.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    for (idx, _) in namespace.match_indices('.') {
        out.push(namespace[..idx].to_string());
    }
    out.push(namespace.to_string());
    out
}
