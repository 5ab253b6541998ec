//! Catálogo respaldado por un `CatalogSpec` deserializado de disco.
//!
//! Resuelve nombres declarados (incluidas variantes `@sufijo`) contra las
//! entradas del documento, cacheando cada descriptor resuelto. Un nombre sin
//! entrada produce `DatasetNotFound` y se avisa una sola vez por nombre; el
//! grafo sustituye esos casos por un marcador en memoria.

use dashmap::{DashMap, DashSet};
use serde_json::Value;

use viz_core::{ident, Catalog, GraphError};
use viz_domain::{CatalogSpec, DatasetDescriptor};

pub struct JsonCatalog {
    spec: CatalogSpec,
    resolved: DashMap<String, DatasetDescriptor>,
    missing_warned: DashSet<String>,
}

impl JsonCatalog {
    pub fn new(spec: CatalogSpec) -> Self {
        JsonCatalog {
            spec,
            resolved: DashMap::new(),
            missing_warned: DashSet::new(),
        }
    }

    pub fn spec(&self) -> &CatalogSpec {
        &self.spec
    }
}

impl Catalog for JsonCatalog {
    fn resolve(&self, name: &str) -> Result<DatasetDescriptor, GraphError> {
        if let Some(found) = self.resolved.get(name) {
            return Ok(found.clone());
        }
        let Some(entry) = self.spec.entry(name) else {
            if self.missing_warned.insert(name.to_string()) {
                log::warn!("dataset '{name}' sin entrada en el catálogo; se usará un marcador en memoria");
            }
            return Err(GraphError::DatasetNotFound(name.to_string()));
        };
        let descriptor = DatasetDescriptor::from_entry(name, entry)
            .with_layer_fallback(self.spec.flat_layer_of(ident::strip_transcoding(name)));
        self.resolved.insert(name.to_string(), descriptor.clone());
        Ok(descriptor)
    }

    fn layer_for(&self, base_name: &str) -> Option<String> {
        if let Some(layer) = self.spec.flat_layer_of(base_name) {
            return Some(layer.to_string());
        }
        // Esquema por dataset: la entrada exacta o cualquier variante declarada
        // del mismo nombre base puede aportar la capa.
        self.spec
            .dataset_names()
            .filter(|name| ident::strip_transcoding(name) == base_name)
            .find_map(|name| {
                let entry = self.spec.entry(name)?;
                let layer = entry.viz_block()?.get("layer")?.as_str()?;
                Some(layer.to_string())
            })
    }

    fn parameter_value(&self, name: &str) -> Option<Value> {
        viz_core::params::parameter_value(self.spec.parameters(), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;
    use viz_domain::DatasetEntry;

    fn spec_with(datasets: IndexMap<String, DatasetEntry>) -> CatalogSpec {
        let mut layers = IndexMap::new();
        layers.insert("raw".to_string(), vec!["companies".to_string(), "cars".to_string()]);
        CatalogSpec::new(layers, datasets, json!({"train": {"epochs": 3}}))
    }

    #[test]
    fn resolves_declared_entries_and_caches_them() {
        let mut datasets = IndexMap::new();
        datasets.insert(
            "companies".to_string(),
            DatasetEntry::new(Some("pandas.CSVDataset".to_string()), Some("data/companies.csv".to_string()), None),
        );
        let catalog = JsonCatalog::new(spec_with(datasets));

        let first = catalog.resolve("companies").expect("entrada declarada");
        assert_eq!(first.dataset_type(), Some("pandas.CSVDataset"));
        assert_eq!(first.layer(), Some("raw"), "la capa plana actúa de respaldo");
        let second = catalog.resolve("companies").expect("segunda resolución");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_entries_surface_as_dataset_not_found() {
        let catalog = JsonCatalog::new(spec_with(IndexMap::new()));
        assert!(matches!(
            catalog.resolve("ghost"),
            Err(GraphError::DatasetNotFound(_))
        ));
    }

    #[test]
    fn transcoded_variants_share_the_flat_layer_of_the_base() {
        let mut datasets = IndexMap::new();
        datasets.insert(
            "cars@pandas".to_string(),
            DatasetEntry::new(Some("pandas.ParquetDataset".to_string()), None, None),
        );
        let catalog = JsonCatalog::new(spec_with(datasets));

        let descriptor = catalog.resolve("cars@pandas").expect("variante declarada");
        assert_eq!(descriptor.layer(), Some("raw"));
        assert_eq!(catalog.layer_for("cars"), Some("raw".to_string()));
    }

    #[test]
    fn per_dataset_layer_wins_over_absence_in_the_flat_map() {
        let mut datasets = IndexMap::new();
        datasets.insert(
            "model@pickle".to_string(),
            DatasetEntry::new(None, None, Some(json!({"viz": {"layer": "models"}}))),
        );
        let catalog = JsonCatalog::new(spec_with(datasets));
        assert_eq!(catalog.layer_for("model"), Some("models".to_string()));
        assert_eq!(catalog.layer_for("unlayered"), None);
    }

    #[test]
    fn parameter_lookups_delegate_to_the_document() {
        let catalog = JsonCatalog::new(spec_with(IndexMap::new()));
        assert_eq!(catalog.parameter_value("params:train.epochs"), Some(json!(3)));
        assert_eq!(
            catalog.parameter_value("parameters"),
            Some(json!({"train": {"epochs": 3}}))
        );
        assert_eq!(catalog.parameter_value("params:missing"), None);
    }
}
