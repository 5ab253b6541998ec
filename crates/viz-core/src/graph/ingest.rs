//! Pasada de ingesta: recorre los pipelines registrados y puebla los
//! repositorios de nodos, aristas, etiquetas y pertenencias.
//!
//! El orden de inserción está fijado: pipelines en orden de declaración y
//! tareas por nombre completo, de modo que dos ingestas del mismo proyecto
//! producen repositorios idénticos.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use viz_domain::{DatasetDescriptor, PipelineSpec, TaskSpec};

use crate::graph::layers;
use crate::graph::modular;
use crate::graph::registry::GraphRegistry;
use crate::ident;
use crate::model::{
    DataNode, GraphEdge, GraphNode, ParametersNode, TaskNode, TranscodedDataNode,
};
use crate::params;

impl GraphRegistry {
    /// Ingesta completa de un proyecto: todos los pipelines, el barrido de
    /// pertenencias de parámetros y el orden de capas por pipeline.
    pub fn add_pipelines(&mut self, pipelines: &IndexMap<String, PipelineSpec>) {
        for (pipeline_id, pipeline) in pipelines {
            self.add_pipeline(pipeline_id, pipeline);
        }
        self.prune_parameter_memberships();
        self.compute_sorted_layers();
    }

    fn add_pipeline(&mut self, pipeline_id: &str, pipeline: &PipelineSpec) {
        self.pipelines.register(pipeline_id);

        // Entradas libres del pipeline completo, sobre nombres base
        let produced: BTreeSet<String> = pipeline
            .all_outputs()
            .iter()
            .map(|name| ident::strip_transcoding(name).to_string())
            .collect();
        let free_inputs: BTreeSet<String> = pipeline
            .all_inputs()
            .iter()
            .map(|name| ident::strip_transcoding(name).to_string())
            .filter(|base| !produced.contains(base))
            .collect();

        let mut tree = modular::build_tree(pipeline);
        for mp in tree.values_mut() {
            mp.pipelines.insert(pipeline_id.to_string());
        }
        self.modular_trees.insert(pipeline_id.to_string(), tree);

        let mut tasks: Vec<&TaskSpec> = pipeline.tasks().iter().collect();
        tasks.sort_by_key(|task| task.full_name());
        for task in tasks {
            self.add_task(pipeline_id, task, &free_inputs);
        }
    }

    fn add_task(&mut self, pipeline_id: &str, task: &TaskSpec, free_inputs: &BTreeSet<String>) {
        let task_id = ident::task_node_id(task);
        let memberships: BTreeSet<String> = task
            .namespace()
            .map(|ns| ident::expand_namespaces(ns).into_iter().collect())
            .unwrap_or_default();

        {
            let node = self.nodes.add(GraphNode::Task(TaskNode::new(
                task_id.clone(),
                task.name().to_string(),
                task.namespace().map(str::to_string),
                memberships,
            )));
            let head = node.head_mut();
            head.pipelines.insert(pipeline_id.to_string());
            head.tags.extend(task.tags().iter().cloned());
            if let Some(task_node) = node.as_task_mut() {
                task_node.inputs = task.inputs().to_vec();
                task_node.outputs = task.outputs().to_vec();
                if task_node.code.is_none() {
                    task_node.code = task.code().map(str::to_string);
                }
                if task_node.filepath.is_none() {
                    task_node.filepath = task.filepath().map(str::to_string);
                }
            }
        }
        self.tags.add_tags(task.tags());
        self.pipelines.add_member(pipeline_id, &task_id);

        for name in task.inputs() {
            let dataset_id = self.add_dataset(pipeline_id, name, task, free_inputs, false);
            self.edges.add(GraphEdge::new(&dataset_id, &task_id));
            self.attach_parameters(&task_id, name);
        }
        for name in task.outputs() {
            let dataset_id = self.add_dataset(pipeline_id, name, task, free_inputs, true);
            self.edges.add(GraphEdge::new(&task_id, &dataset_id));
        }
    }

    /// Alta (o recuperación) del nodo de dataset para un nombre declarado.
    /// Devuelve el id del nodo, ya colapsado si el nombre trae `@variante`.
    fn add_dataset(
        &mut self,
        pipeline_id: &str,
        declared_name: &str,
        task: &TaskSpec,
        free_inputs: &BTreeSet<String>,
        is_output: bool,
    ) -> String {
        let base = ident::strip_transcoding(declared_name).to_string();
        let dataset_id = ident::dataset_node_id(&base);
        let is_free = free_inputs.contains(&base);

        if !self.nodes.contains(&dataset_id) {
            let node = self.build_dataset_node(&dataset_id, declared_name, &base, is_free);
            self.nodes.add(node);
        }

        // El tipo de la variante se resuelve antes de tomar el nodo prestado
        let variant_type = if ident::is_transcoded(declared_name) {
            self.resolve_descriptor(declared_name).dataset_type().map(str::to_string)
        } else {
            None
        };

        if let Some(node) = self.nodes.get_mut_by_id(&dataset_id) {
            if let GraphNode::TranscodedData(transcoded) = node {
                transcoded.attach_variant(declared_name, variant_type, is_output);
            }
            let head = node.head_mut();
            head.pipelines.insert(pipeline_id.to_string());
            head.tags.extend(task.tags().iter().cloned());
        }
        self.pipelines.add_member(pipeline_id, &dataset_id);
        dataset_id
    }

    fn build_dataset_node(
        &self,
        dataset_id: &str,
        declared_name: &str,
        base: &str,
        is_free: bool,
    ) -> GraphNode {
        let memberships = dataset_memberships(base);
        let layer = self.catalog.layer_for(base);

        if ident::is_parameter_name(base) {
            let value = self.catalog.parameter_value(base);
            return GraphNode::Parameters(ParametersNode::new(
                dataset_id.to_string(),
                base.to_string(),
                layer,
                value,
                memberships,
            ));
        }

        if ident::is_transcoded(declared_name) {
            let mut node = TranscodedDataNode::new(
                dataset_id.to_string(),
                base.to_string(),
                layer,
                is_free,
                memberships,
            );
            node.stats = self.stats.get(base).cloned();
            node.viz_metadata = self.styles.get(base).cloned();
            return GraphNode::TranscodedData(node);
        }

        let descriptor = self.resolve_descriptor(declared_name);
        let mut node = DataNode::new(
            dataset_id.to_string(),
            base.to_string(),
            layer,
            descriptor.dataset_type().map(str::to_string),
            is_free,
            memberships,
        );
        node.stats = self.stats.get(base).cloned();
        node.viz_metadata = match (descriptor.viz_metadata(), self.styles.get(base)) {
            (Some(meta), Some(style)) => Some(params::merge_json(meta, style)),
            (Some(meta), None) => Some(meta.clone()),
            (None, Some(style)) => Some(style.clone()),
            (None, None) => None,
        };
        GraphNode::Data(node)
    }

    /// Si la entrada es un nombre de parámetro, vuelca su valor resuelto en
    /// el mapeo `parameters` de la tarea: el diccionario global clave a clave,
    /// el parámetro individual bajo su ruta.
    fn attach_parameters(&mut self, task_id: &str, input_name: &str) {
        if !ident::is_parameter_name(input_name) {
            return;
        }
        let Some(value) = self.catalog.parameter_value(input_name) else {
            log::debug!("parámetro sin valor en el catálogo: {input_name}");
            return;
        };
        let Some(task_node) =
            self.nodes.get_mut_by_id(task_id).and_then(GraphNode::as_task_mut)
        else {
            return;
        };
        match ident::parameter_path(input_name) {
            Some(path) => {
                task_node.parameters.insert(path.to_string(), value);
            }
            None => {
                if let Some(map) = value.as_object() {
                    for (key, entry) in map {
                        task_node.parameters.insert(key.clone(), entry.clone());
                    }
                }
            }
        }
    }

    pub(crate) fn resolve_descriptor(&self, name: &str) -> DatasetDescriptor {
        self.catalog.resolve(name).unwrap_or_else(|_| {
            log::debug!("dataset fuera del catálogo, se usa un descriptor vacío: {name}");
            DatasetDescriptor::placeholder(name)
        })
    }

    /// La ruta con puntos de un parámetro individual puede parecer un
    /// namespace; tras la ingesta solo se conservan las pertenencias que
    /// apuntan a modular pipelines reales.
    fn prune_parameter_memberships(&mut self) {
        let known: BTreeSet<String> = self
            .modular_trees
            .values()
            .flat_map(|tree| tree.keys().cloned())
            .collect();
        for node in self.nodes.as_list_mut() {
            if matches!(node, GraphNode::Parameters(_)) {
                node.head_mut().modular_pipelines.retain(|mp| known.contains(mp));
            }
        }
    }

    fn compute_sorted_layers(&mut self) {
        let pipeline_ids: Vec<String> = self.pipelines.ids().map(str::to_string).collect();
        for pipeline_id in pipeline_ids {
            let sorted = self.sort_pipeline_layers(&pipeline_id);
            self.sorted_layers.insert(pipeline_id, sorted);
        }
    }

    fn sort_pipeline_layers(&self, pipeline_id: &str) -> Vec<String> {
        let Some(members) = self.pipelines.members(pipeline_id) else {
            return Vec::new();
        };
        let mut node_layers = std::collections::BTreeMap::new();
        for node in self.nodes.get_by_ids(members) {
            node_layers.insert(node.id().to_string(), node.layer().map(str::to_string));
        }
        let mut dependencies: std::collections::BTreeMap<String, BTreeSet<String>> =
            std::collections::BTreeMap::new();
        for edge in self.edges.get_by_node_ids(members) {
            dependencies.entry(edge.source.clone()).or_default().insert(edge.target.clone());
        }
        match layers::sort_layers(&node_layers, &dependencies) {
            Ok(sorted) => sorted,
            Err(_) => {
                log::warn!(
                    "ciclo entre capas en el pipeline {pipeline_id}; se omite el orden de capas"
                );
                Vec::new()
            }
        }
    }
}

/// Pertenencia a modular pipelines derivada del nombre base del dataset.
/// Para parámetros individuales se usa la ruta sin el prefijo `params:`;
/// las entradas espurias se limpian en el barrido posterior a la ingesta.
fn dataset_memberships(base: &str) -> BTreeSet<String> {
    let path = ident::parameter_path(base).unwrap_or(base);
    ident::namespace_of(path)
        .map(|ns| ident::expand_namespaces(ns).into_iter().collect())
        .unwrap_or_default()
}
