//! Previsualización de datasets bajo una política global.
//!
//! El fichero de respaldo del dataset se lee solo si la política lo permite,
//! y se interpreta como filas JSON: un array de filas o una fila por línea.
//! Cualquier fallo deja la previsualización fuera de la respuesta con un
//! único aviso; nunca interrumpe la petición.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::AdapterError;

/// Filas previsualizadas cuando el dataset no declara `nrows`.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
/// Techo absoluto de filas por previsualización.
pub const DEFAULT_CLAMP_ROWS: usize = 40;

/// Política global inyectada en el constructor de metadatos: apagada no se
/// toca ningún fichero, y `clamp_rows` acota cualquier `nrows` declarado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewPolicy {
    pub enabled: bool,
    pub clamp_rows: usize,
}

impl Default for PreviewPolicy {
    fn default() -> Self {
        PreviewPolicy { enabled: true, clamp_rows: DEFAULT_CLAMP_ROWS }
    }
}

impl PreviewPolicy {
    pub fn disabled() -> Self {
        PreviewPolicy { enabled: false, clamp_rows: DEFAULT_CLAMP_ROWS }
    }
}

/// Lee previsualizaciones resolviendo rutas relativas contra la raíz del
/// proyecto.
#[derive(Debug, Clone)]
pub struct PreviewLoader {
    policy: PreviewPolicy,
    root: PathBuf,
}

impl PreviewLoader {
    pub fn new(policy: PreviewPolicy, root: impl Into<PathBuf>) -> Self {
        PreviewLoader { policy, root: root.into() }
    }

    pub fn policy(&self) -> PreviewPolicy {
        self.policy
    }

    /// Previsualización para un dataset, o `None` si la política está apagada,
    /// el dataset no tiene ruta, o la lectura falla.
    pub async fn preview(&self, name: &str, filepath: Option<&str>, nrows: Option<usize>) -> Option<Value> {
        if !self.policy.enabled {
            return None;
        }
        let filepath = filepath?;
        let rows = nrows.unwrap_or(DEFAULT_PREVIEW_ROWS).min(self.policy.clamp_rows);
        match self.read_rows(filepath, rows).await {
            Ok(preview) => preview,
            Err(err) => {
                log::warn!("previsualización fallida para '{name}': {err}");
                None
            }
        }
    }

    async fn read_rows(&self, filepath: &str, rows: usize) -> Result<Option<Value>, AdapterError> {
        let path = self.resolve(filepath);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|err| AdapterError::io(path.display().to_string(), err))?;
        if let Ok(Value::Array(items)) = serde_json::from_slice::<Value>(&bytes) {
            return Ok(Some(Value::Array(items.into_iter().take(rows).collect())));
        }
        let text = String::from_utf8(bytes)
            .map_err(|err| AdapterError::PreviewFailure(format!("{}: {err}", path.display())))?;
        let mut out = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()).take(rows) {
            let row: Value = serde_json::from_str(line)
                .map_err(|err| AdapterError::PreviewFailure(format!("{}: {err}", path.display())))?;
            out.push(row);
        }
        if out.is_empty() {
            return Ok(None);
        }
        Ok(Some(Value::Array(out)))
    }

    fn resolve(&self, filepath: &str) -> PathBuf {
        let path = Path::new(filepath);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
