//! Pipelines registrados y la pertenencia de nodos a cada uno.

use indexmap::IndexMap;
use std::collections::BTreeSet;

use crate::constants::DEFAULT_REGISTERED_PIPELINE_ID;
use crate::model::RegisteredPipeline;

#[derive(Debug, Default)]
pub struct RegisteredPipelineRepository {
    pipelines: IndexMap<String, PipelineEntry>,
}

#[derive(Debug)]
struct PipelineEntry {
    pipeline: RegisteredPipeline,
    members: BTreeSet<String>,
}

impl RegisteredPipelineRepository {
    pub fn new() -> Self {
        RegisteredPipelineRepository::default()
    }

    pub fn register(&mut self, id: &str) {
        self.pipelines
            .entry(id.to_string())
            .or_insert_with(|| PipelineEntry { pipeline: RegisteredPipeline::new(id), members: BTreeSet::new() });
    }

    pub fn add_member(&mut self, pipeline_id: &str, node_id: &str) {
        if let Some(entry) = self.pipelines.get_mut(pipeline_id) {
            entry.members.insert(node_id.to_string());
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pipelines.contains_key(id)
    }

    pub fn members(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.pipelines.get(id).map(|entry| &entry.members)
    }

    pub fn as_list(&self) -> impl Iterator<Item = &RegisteredPipeline> {
        self.pipelines.values().map(|entry| &entry.pipeline)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.pipelines.keys().map(String::as_str)
    }

    /// `__default__` cuando existe; si no, el primero registrado.
    pub fn default_id(&self) -> Option<&str> {
        if self.pipelines.contains_key(DEFAULT_REGISTERED_PIPELINE_ID) {
            return Some(DEFAULT_REGISTERED_PIPELINE_ID);
        }
        self.pipelines.keys().next().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prefers_the_reserved_id() {
        let mut repo = RegisteredPipelineRepository::new();
        repo.register("reporting");
        repo.register(DEFAULT_REGISTERED_PIPELINE_ID);
        assert_eq!(repo.default_id(), Some(DEFAULT_REGISTERED_PIPELINE_ID));
    }

    #[test]
    fn default_falls_back_to_first_registered() {
        let mut repo = RegisteredPipelineRepository::new();
        repo.register("reporting");
        repo.register("training");
        assert_eq!(repo.default_id(), Some("reporting"));
    }

    #[test]
    fn members_accumulate_per_pipeline() {
        let mut repo = RegisteredPipelineRepository::new();
        repo.register("p");
        repo.add_member("p", "n1");
        repo.add_member("p", "n1");
        repo.add_member("p", "n2");
        assert_eq!(repo.members("p").map(|m| m.len()), Some(2));
        assert_eq!(repo.members("missing"), None);
    }
}
