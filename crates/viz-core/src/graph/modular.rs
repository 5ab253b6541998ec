//! Constructor del árbol de modular pipelines.
//!
//! Cada namespace con puntos se expande a su cadena de prefijos y cada prefijo
//! se convierte en un nodo del árbol. La interfaz de cada modular pipeline
//! (entradas y salidas externas) sale de un análisis de datasets libres sobre
//! el sub-conjunto de tareas que viven bajo su namespace.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;

use viz_domain::{PipelineSpec, TaskSpec};

use crate::constants::ROOT_MODULAR_PIPELINE_ID;
use crate::ident;
use crate::model::{ModularPipelineNode, NodeType};

/// Árbol completo: `mp_id → nodo`, con `__root__` siempre en primera posición.
pub type ModularTree = IndexMap<String, ModularPipelineNode>;

/// Una tarea pertenece al sub-árbol de `mp_id` si su namespace es exactamente
/// `mp_id` o un descendiente (`mp_id.` como prefijo de segmento completo).
fn in_subtree(namespace: &str, mp_id: &str) -> bool {
    namespace == mp_id
        || (namespace.len() > mp_id.len()
            && namespace.starts_with(mp_id)
            && namespace.as_bytes()[mp_id.len()] == b'.')
}

fn child_type_for(base_name: &str) -> NodeType {
    if ident::is_parameter_name(base_name) {
        NodeType::Parameters
    } else {
        NodeType::Data
    }
}

/// Construye el árbol de modular pipelines de un pipeline registrado.
///
/// El orden de inserción es `__root__` y después los mp por profundidad
/// ascendente con desempate alfabético, así la serialización es estable.
pub fn build_tree(pipeline: &PipelineSpec) -> ModularTree {
    let mut mp_ids: BTreeSet<String> = BTreeSet::new();
    for task in pipeline.tasks() {
        if let Some(namespace) = task.namespace() {
            mp_ids.extend(ident::expand_namespaces(namespace));
        }
    }
    // BTreeSet ya da orden alfabético; el sort estable solo reordena por profundidad
    let mut ordered: Vec<String> = mp_ids.into_iter().collect();
    ordered.sort_by_key(|id| id.matches('.').count());

    let mut tree: ModularTree = IndexMap::new();
    tree.insert(
        ROOT_MODULAR_PIPELINE_ID.to_string(),
        ModularPipelineNode::new(ROOT_MODULAR_PIPELINE_ID),
    );
    for mp_id in &ordered {
        tree.insert(mp_id.clone(), ModularPipelineNode::new(mp_id));
    }

    // id de dataset → nombre base, para distinguir parámetros al colgar hijos
    let mut dataset_names: BTreeMap<String, String> = BTreeMap::new();

    compute_interfaces(pipeline, &ordered, &mut tree, &mut dataset_names);
    attach_task_children(pipeline, &mut tree, &mut dataset_names);
    attach_nested_children(&ordered, &mut tree, &dataset_names);
    attach_root_children(pipeline, &ordered, &mut tree, &mut dataset_names);

    tree
}

/// Análisis de datasets libres por modular pipeline (sobre nombres base):
/// `free_inputs = consumidos \ producidos`;
/// `free_outputs = (producidos \ consumidos) ∪ (producidos ∩ consumidos_fuera)`.
fn compute_interfaces(
    pipeline: &PipelineSpec,
    ordered: &[String],
    tree: &mut ModularTree,
    dataset_names: &mut BTreeMap<String, String>,
) {
    for mp_id in ordered {
        let mut consumed: BTreeSet<&str> = BTreeSet::new();
        let mut produced: BTreeSet<&str> = BTreeSet::new();
        let mut consumed_by_rest: BTreeSet<&str> = BTreeSet::new();
        let mut tags: BTreeSet<String> = BTreeSet::new();

        for task in pipeline.tasks() {
            let inside = task.namespace().is_some_and(|ns| in_subtree(ns, mp_id));
            for name in task.inputs() {
                let base = ident::strip_transcoding(name);
                if inside {
                    consumed.insert(base);
                } else {
                    consumed_by_rest.insert(base);
                }
            }
            if inside {
                produced.extend(task.outputs().iter().map(|name| ident::strip_transcoding(name)));
                tags.extend(task.tags().iter().cloned());
            }
        }

        let Some(node) = tree.get_mut(mp_id.as_str()) else { continue };
        node.tags = tags;
        for base in consumed.difference(&produced) {
            let id = ident::dataset_node_id(base);
            dataset_names.insert(id.clone(), (*base).to_string());
            node.external_inputs.insert(id);
        }
        for base in &produced {
            if consumed.contains(base) && !consumed_by_rest.contains(base) {
                continue;
            }
            let id = ident::dataset_node_id(base);
            dataset_names.insert(id.clone(), (*base).to_string());
            node.external_outputs.insert(id);
        }

        // Un dataset en ambos lados de la interfaz crearía un self-loop
        let overlap: Vec<String> =
            node.external_inputs.intersection(&node.external_outputs).cloned().collect();
        for id in overlap {
            node.external_inputs.remove(&id);
            log::debug!("self-loop roto en modular pipeline {mp_id}: dataset {id}");
        }
    }
}

/// Tareas con namespace exacto: hijo `Task` del mp, más sus datasets como
/// hijos `Data` salvo que formen parte de la interfaz externa del mp.
fn attach_task_children(
    pipeline: &PipelineSpec,
    tree: &mut ModularTree,
    dataset_names: &mut BTreeMap<String, String>,
) {
    for task in pipeline.tasks() {
        let Some(namespace) = task.namespace() else { continue };
        let Some(node) = tree.get_mut(namespace) else { continue };
        node.add_child(&ident::task_node_id(task), NodeType::Task);

        let externals: BTreeSet<String> =
            node.external_inputs.union(&node.external_outputs).cloned().collect();
        for name in task.inputs().iter().chain(task.outputs().iter()) {
            let base = ident::strip_transcoding(name);
            let id = ident::dataset_node_id(base);
            if externals.contains(&id) {
                continue;
            }
            dataset_names.insert(id.clone(), base.to_string());
            node.add_child(&id, child_type_for(base));
        }
    }
}

/// Modular pipelines anidados: hijo `ModularPipeline` del padre. Su interfaz
/// externa se propaga como datasets internos del padre, saltando lo que ya es
/// interfaz del propio padre.
fn attach_nested_children(
    ordered: &[String],
    tree: &mut ModularTree,
    dataset_names: &BTreeMap<String, String>,
) {
    for mp_id in ordered {
        let Some((parent_id, _)) = mp_id.rsplit_once('.') else { continue };
        let (child_inputs, child_outputs) = match tree.get(mp_id.as_str()) {
            Some(child) => (child.external_inputs.clone(), child.external_outputs.clone()),
            None => continue,
        };
        let Some(parent) = tree.get_mut(parent_id) else { continue };
        parent.add_child(mp_id, NodeType::ModularPipeline);

        let parent_externals: BTreeSet<String> =
            parent.external_inputs.union(&parent.external_outputs).cloned().collect();
        for id in &child_inputs {
            if parent_externals.contains(id) {
                continue;
            }
            parent.internal_inputs.insert(id.clone());
            parent.add_child(id, name_type(dataset_names, id));
        }
        for id in &child_outputs {
            if parent_externals.contains(id) {
                continue;
            }
            parent.internal_outputs.insert(id.clone());
            parent.add_child(id, name_type(dataset_names, id));
        }
    }
}

/// Hijos de `__root__`: los mp de primer nivel con su interfaz visible, y las
/// tareas sin namespace con sus datasets.
fn attach_root_children(
    pipeline: &PipelineSpec,
    ordered: &[String],
    tree: &mut ModularTree,
    dataset_names: &mut BTreeMap<String, String>,
) {
    let mut children: Vec<(String, NodeType)> = Vec::new();

    for mp_id in ordered {
        if mp_id.contains('.') {
            continue;
        }
        children.push((mp_id.clone(), NodeType::ModularPipeline));
        let Some(mp) = tree.get(mp_id.as_str()) else { continue };
        for id in mp.external_inputs.union(&mp.external_outputs) {
            children.push((id.clone(), name_type(dataset_names, id)));
        }
    }

    for task in pipeline.tasks() {
        if task.namespace().is_some() {
            continue;
        }
        children.push((ident::task_node_id(task), NodeType::Task));
        for name in task.inputs().iter().chain(task.outputs().iter()) {
            let base = ident::strip_transcoding(name);
            let id = ident::dataset_node_id(base);
            dataset_names.insert(id.clone(), base.to_string());
            children.push((id, child_type_for(base)));
        }
    }

    if let Some(root) = tree.get_mut(ROOT_MODULAR_PIPELINE_ID) {
        for (id, node_type) in children {
            root.add_child(&id, node_type);
        }
    }
}

fn name_type(dataset_names: &BTreeMap<String, String>, id: &str) -> NodeType {
    dataset_names.get(id).map_or(NodeType::Data, |name| child_type_for(name))
}
