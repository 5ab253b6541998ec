//! Orden topológico de las capas declaradas por el usuario.
//!
//! Las capas no forman un grafo por sí mismas: el orden se induce desde las
//! dependencias entre nodos. Un nodo con capa `L` que alcanza (transitivamente)
//! un nodo con capa `M` impone `L` antes que `M`. Los nodos sin capa son
//! transparentes y solo aportan conectividad.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use crate::errors::GraphError;

/// Capas alcanzables aguas abajo de `node_id`, excluyendo la suya propia.
///
/// El grafo de nodos puede traer ciclos cortos (un dataset leído y escrito
/// por la misma tarea); el conjunto `visiting` corta la recursión en ese caso.
fn child_layers(
    node_id: &str,
    node_layers: &BTreeMap<String, Option<String>>,
    successors: &BTreeMap<String, BTreeSet<String>>,
    memo: &mut BTreeMap<String, BTreeSet<String>>,
    visiting: &mut BTreeSet<String>,
) -> BTreeSet<String> {
    if let Some(done) = memo.get(node_id) {
        return done.clone();
    }
    if !visiting.insert(node_id.to_string()) {
        return BTreeSet::new();
    }
    let mut acc = BTreeSet::new();
    if let Some(children) = successors.get(node_id) {
        for child in children {
            if let Some(Some(layer)) = node_layers.get(child) {
                acc.insert(layer.clone());
            }
            acc.extend(child_layers(child, node_layers, successors, memo, visiting));
        }
    }
    visiting.remove(node_id);
    memo.insert(node_id.to_string(), acc.clone());
    acc
}

/// Ordena las capas presentes en `node_layers` respetando las dependencias
/// entre nodos (`dependencies[id]` = sucesores directos de `id`).
///
/// Los empates se resuelven alfabéticamente, así el resultado es estable
/// frente al orden de iteración de los contenedores. Un ciclo entre capas
/// devuelve `LayerCycle`; quien llama decide si lo degrada a lista vacía.
pub fn sort_layers(
    node_layers: &BTreeMap<String, Option<String>>,
    dependencies: &BTreeMap<String, BTreeSet<String>>,
) -> Result<Vec<String>, GraphError> {
    let all_layers: BTreeSet<String> = node_layers.values().flatten().cloned().collect();
    if all_layers.is_empty() {
        return Ok(Vec::new());
    }

    // layer_parents[M] = capas que deben aparecer antes que M
    let mut layer_parents: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut memo = BTreeMap::new();
    for (node_id, layer) in node_layers {
        let Some(layer) = layer else { continue };
        let mut visiting = BTreeSet::new();
        for child in child_layers(node_id, node_layers, dependencies, &mut memo, &mut visiting) {
            if child != *layer {
                layer_parents.entry(child).or_default().insert(layer.clone());
            }
        }
    }

    let mut pending: BTreeMap<&str, usize> = all_layers
        .iter()
        .map(|layer| {
            let parents = layer_parents.get(layer).map_or(0, BTreeSet::len);
            (layer.as_str(), parents)
        })
        .collect();
    let mut dependents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (child, parents) in &layer_parents {
        for parent in parents {
            dependents.entry(parent.as_str()).or_default().insert(child.as_str());
        }
    }

    let mut ready: BinaryHeap<Reverse<&str>> = pending
        .iter()
        .filter(|(_, missing)| **missing == 0)
        .map(|(layer, _)| Reverse(*layer))
        .collect();
    let mut sorted = Vec::with_capacity(all_layers.len());
    while let Some(Reverse(layer)) = ready.pop() {
        sorted.push(layer.to_string());
        for child in dependents.get(layer).into_iter().flatten() {
            if let Some(missing) = pending.get_mut(child) {
                *missing -= 1;
                if *missing == 0 {
                    ready.push(Reverse(child));
                }
            }
        }
    }

    if sorted.len() != all_layers.len() {
        return Err(GraphError::LayerCycle);
    }
    Ok(sorted)
}
