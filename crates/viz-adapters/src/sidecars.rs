//! Ficheros laterales de estadísticas (`stats.json`) y estilos
//! (`styles.json`), mapas de nombre base de dataset a objeto JSON.
//!
//! Su ausencia es normal y no se registra; un fichero ilegible o malformado
//! se degrada a mapa vacío con un único aviso que nombra el fichero.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

pub fn load_stats(path: &Path) -> HashMap<String, Value> {
    load_map(path, "estadísticas")
}

pub fn load_styles(path: &Path) -> HashMap<String, Value> {
    load_map(path, "estilos")
}

fn load_map(path: &Path, what: &str) -> HashMap<String, Value> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return HashMap::new(),
        Err(err) => {
            log::warn!("no se pudo leer el fichero de {what} {}: {err}", path.display());
            return HashMap::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(map) => map,
        Err(err) => {
            log::warn!("fichero de {what} malformado {}: {err}", path.display());
            HashMap::new()
        }
    }
}
