//! viz-adapters: Capa de adaptación Proyecto ↔ Grafo
//!
//! Este crate implementa:
//! - Carga de proyectos desde disco (pipelines, catálogo, overlays por entorno)
//! - Un `Catalog` respaldado por `CatalogSpec` con caché de descriptores
//! - Ficheros laterales de estadísticas y estilos
//! - Fuentes de eventos de ejecución (fichero o memoria)
//! - Previsualización de datasets bajo una política global

pub mod catalog;
pub mod error;
pub mod events;
pub mod preview;
pub mod project;
pub mod sidecars;

pub use catalog::JsonCatalog;
pub use error::AdapterError;
pub use events::{EventSource, FileEventSource, StaticEventSource};
pub use preview::{PreviewLoader, PreviewPolicy};
pub use project::{ProjectDefinition, ProjectLoader};
