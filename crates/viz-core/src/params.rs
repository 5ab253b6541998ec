//! Utilidades para fusionar y resolver parámetros JSON de forma determinista.
//!
//! El merge es "shallow": las claves del segundo objeto reemplazan a las del
//! primero. La resolución de rutas intenta primero la clave literal y después
//! el descenso por puntos, porque ambos estilos conviven en los proyectos.

use serde_json::{Map, Value};

use crate::constants::ALL_PARAMETERS_NODE_NAME;
use crate::errors::GraphError;
use crate::ident;

/// Merge shallow: keys from `b` override keys from `a` when both are objects.
/// Cuando alguno de los dos valores no es objeto, `b` tiene precedencia.
pub fn merge_json(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Object(ma), Value::Object(mb)) => {
            let mut out = ma.clone();
            for (k, v) in mb.iter() {
                out.insert(k.clone(), v.clone());
            }
            Value::Object(out)
        }
        // Non-objects: override
        (_, other) => other.clone(),
    }
}

/// Valor visible para un nombre de parámetro: el diccionario completo para
/// `parameters`, el valor puntual para `params:<ruta>`, `None` si no resuelve.
pub fn parameter_value(parameters: &Value, name: &str) -> Option<Value> {
    if name == ALL_PARAMETERS_NODE_NAME {
        return parameters.is_object().then(|| parameters.clone());
    }
    let path = ident::parameter_path(name)?;
    lookup_path(parameters, path).cloned()
}

/// Búsqueda de una ruta dentro del objeto de parámetros: clave literal
/// primero, descenso por segmentos después.
pub fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(value) = root.get(path) {
        return Some(value);
    }
    let mut current = root;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Aplica sobrescrituras `clave=valor` sobre el objeto de parámetros.
///
/// Simétrico a `lookup_path`: una clave presente literalmente en el nivel
/// superior se reemplaza tal cual; en caso contrario los puntos descienden
/// creando objetos intermedios. Un valor intermedio que no sea objeto se
/// sustituye por uno vacío antes de seguir bajando.
pub fn apply_overrides(parameters: &mut Value, overrides: &Map<String, Value>) {
    if !parameters.is_object() {
        *parameters = Value::Object(Map::new());
    }
    for (path, value) in overrides {
        set_path(parameters, path, value.clone());
    }
}

fn set_path(root: &mut Value, path: &str, value: Value) {
    let Some(top) = root.as_object_mut() else { return };
    if top.contains_key(path) || !path.contains('.') {
        top.insert(path.to_string(), value);
        return;
    }
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else { return };
    let mut current = root;
    for segment in segments {
        let object = match current {
            Value::Object(map) => map,
            _ => return,
        };
        let child = object
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !child.is_object() {
            *child = Value::Object(Map::new());
        }
        current = child;
    }
    if let Value::Object(map) = current {
        map.insert(leaf.to_string(), value);
    }
}

/// Interpreta la cadena `clave=valor,clave=valor` de la línea de comandos.
/// Cada valor se intenta como JSON y cae a string plano si no parsea.
pub fn parse_overrides(expr: &str) -> Result<Map<String, Value>, GraphError> {
    let mut out = Map::new();
    for pair in expr.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, raw)) = pair.split_once('=') else {
            return Err(GraphError::InvalidOverride(pair.to_string()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(GraphError::InvalidOverride(pair.to_string()));
        }
        let raw = raw.trim();
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        out.insert(key.to_string(), value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_shallow_overrides_keys() {
        let a = json!({"x": 1, "y": {"deep": true}});
        let b = json!({"y": 2, "z": 3});
        assert_eq!(merge_json(&a, &b), json!({"x": 1, "y": 2, "z": 3}));
    }

    #[test]
    fn merge_non_objects_preferring_right() {
        assert_eq!(merge_json(&json!(1), &json!({"a": 2})), json!({"a": 2}));
        assert_eq!(merge_json(&json!({"a": 2}), &json!(null)), json!(null));
    }

    #[test]
    fn parameter_value_resolves_global_and_paths() {
        let params = json!({"ratio": 0.1, "split": {"ratio": 0.2}, "split.ratio": 0.3});
        assert_eq!(parameter_value(&params, "parameters"), Some(params.clone()));
        // La clave literal gana sobre el descenso anidado
        assert_eq!(parameter_value(&params, "params:split.ratio"), Some(json!(0.3)));
        assert_eq!(parameter_value(&params, "params:ratio"), Some(json!(0.1)));
        assert_eq!(parameter_value(&params, "params:missing"), None);
    }

    #[test]
    fn parameter_value_descends_when_no_literal_key() {
        let params = json!({"split": {"ratio": 0.2}});
        assert_eq!(parameter_value(&params, "params:split.ratio"), Some(json!(0.2)));
    }

    #[test]
    fn parse_overrides_reads_json_values_and_strings() {
        let parsed = parse_overrides("epochs=1000, name=baseline, split.ratio=0.2").unwrap();
        assert_eq!(parsed.get("epochs"), Some(&json!(1000)));
        assert_eq!(parsed.get("name"), Some(&json!("baseline")));
        assert_eq!(parsed.get("split.ratio"), Some(&json!(0.2)));
    }

    #[test]
    fn parse_overrides_rejects_missing_equals() {
        assert!(parse_overrides("novalue").is_err());
        assert!(parse_overrides("=5").is_err());
    }

    #[test]
    fn apply_overrides_sets_literal_and_nested_paths() {
        let mut params = json!({"split.ratio": 0.3, "train": {"epochs": 3, "lr": 0.01}});
        let overrides = parse_overrides("split.ratio=0.9,train.epochs=10,model.depth=2").unwrap();
        apply_overrides(&mut params, &overrides);
        assert_eq!(
            params,
            json!({
                "split.ratio": 0.9,
                "train": {"epochs": 10, "lr": 0.01},
                "model": {"depth": 2}
            })
        );
    }

    #[test]
    fn apply_overrides_materializes_objects_where_needed() {
        let mut params = Value::Null;
        apply_overrides(&mut params, &parse_overrides("train.epochs=5").unwrap());
        assert_eq!(params, json!({"train": {"epochs": 5}}));

        let mut scalar_branch = json!({"train": 1});
        apply_overrides(&mut scalar_branch, &parse_overrides("train.epochs=5").unwrap());
        assert_eq!(scalar_branch, json!({"train": {"epochs": 5}}));
    }
}
