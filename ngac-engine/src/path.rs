//! Privilege paths: BFS inside one subgraph, reconstruction, and the
//! three-segment stitch.

use crate::subgraph::Subgraph;
use ngac_core::{Association, Entity, PolicyStore, Relationship};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// An ordered walk from subject to resource.
///
/// Invariants: `edges.len() == nodes.len() - 1`; each edge connects the
/// adjacent node pair; `actions` is the union of verbs gathered from
/// association edges along the way.
#[derive(Debug, Clone, Serialize)]
pub struct PrivilegePath {
    pub nodes: Vec<Entity>,
    pub edges: Vec<Relationship>,
    pub actions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub obligations: Vec<String>,
}

impl PrivilegePath {
    fn single(entity: Entity) -> Self {
        Self {
            nodes: vec![entity],
            edges: Vec::new(),
            actions: Vec::new(),
            obligations: Vec::new(),
        }
    }

    /// True if every edge is an assignment (and there is at least one).
    pub fn is_pure_assignment(&self) -> bool {
        !self.edges.is_empty() && self.edges.iter().all(Relationship::is_assignment)
    }

    /// True if some node on the path has the given id.
    pub fn visits(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.hash_id == id)
    }
}

/// Append values not already present, preserving encounter order.
pub(crate) fn extend_unique(dst: &mut Vec<String>, src: &[String]) {
    for value in src {
        if !dst.contains(value) {
            dst.push(value.clone());
        }
    }
}

/// Find a path from `start` to `end` inside one subgraph by BFS over
/// `forward` edges, reconstructing via parent pointers.
///
/// Start-equals-end yields a single-node path. Returns `Ok(None)` when no
/// path exists — including when the parent chain breaks or a node on the
/// chain has no entity (reachable only through a dangling reference), which
/// keeps the function total and every returned path well-formed.
pub(crate) async fn find_path(
    graph: &mut Subgraph,
    store: &dyn PolicyStore,
    class: &str,
    start: &str,
    end: &str,
) -> ngac_core::Result<Option<PrivilegePath>> {
    if start == end {
        return Ok(graph.nodes.get(start).cloned().map(PrivilegePath::single));
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut parent: HashMap<String, (String, Relationship)> = HashMap::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    visited.insert(start.to_string());
    queue.push_back(start.to_string());

    let mut found = false;
    while let Some(current) = queue.pop_front() {
        if current == end {
            found = true;
            break;
        }
        if let Some(edges) = graph.forward.get(&current) {
            for edge in edges {
                if visited.insert(edge.to_id.clone()) {
                    parent.insert(edge.to_id.clone(), (current.clone(), edge.clone()));
                    queue.push_back(edge.to_id.clone());
                }
            }
        }
    }
    if !found {
        return Ok(None);
    }

    reconstruct(graph, store, class, start, end, &parent).await
}

/// Walk parent pointers back from `end`, then materialise the path forward.
async fn reconstruct(
    graph: &mut Subgraph,
    store: &dyn PolicyStore,
    class: &str,
    start: &str,
    end: &str,
    parent: &HashMap<String, (String, Relationship)>,
) -> ngac_core::Result<Option<PrivilegePath>> {
    let mut ids = vec![end.to_string()];
    let mut current = end.to_string();
    while current != start {
        match parent.get(&current) {
            Some((prev, _)) => {
                ids.push(prev.clone());
                current = prev.clone();
            }
            None => return Ok(None),
        }
    }
    ids.reverse();

    let mut nodes = Vec::with_capacity(ids.len());
    for id in &ids {
        match graph.nodes.get(id) {
            Some(entity) => nodes.push(entity.clone()),
            None => return Ok(None),
        }
    }

    let mut edges = Vec::with_capacity(ids.len() - 1);
    for id in ids.iter().skip(1) {
        match parent.get(id) {
            Some((_, edge)) => edges.push(edge.clone()),
            None => return Ok(None),
        }
    }

    let mut actions = Vec::new();
    for edge in &edges {
        if !edge.is_association() {
            continue;
        }
        match graph.association(store, edge, class).await {
            Ok(assoc) => extend_unique(&mut actions, &assoc.verbs),
            Err(err) if err.is_not_found() => {
                debug!(edge = %edge.hash_id, "Association unresolvable during reconstruction");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(Some(PrivilegePath {
        nodes,
        edges,
        actions,
        obligations: Vec::new(),
    }))
}

/// Stitch the three segments of a privilege path: subject → grant source,
/// the association edge itself, and resource → meeting point.
///
/// Segment three is discovered resource-first (BFS runs from the resource
/// toward the meeting point over `forward` edges); the stitched path runs
/// subject → meeting point → resource, so its nodes and edges are appended
/// reversed. The meeting point is skipped when it would duplicate the
/// grant source (degenerate self-loop grants).
pub(crate) fn combine(
    subject_to_source: &PrivilegePath,
    association: &Association,
    resource_to_meeting: &PrivilegePath,
) -> PrivilegePath {
    let mut nodes = subject_to_source.nodes.clone();
    for node in resource_to_meeting.nodes.iter().rev() {
        if nodes.last().is_some_and(|prev| prev.hash_id == node.hash_id) {
            continue;
        }
        nodes.push(node.clone());
    }

    let mut edges = subject_to_source.edges.clone();
    edges.push(association.relationship.clone());
    edges.extend(resource_to_meeting.edges.iter().rev().cloned());

    let mut actions = Vec::new();
    extend_unique(&mut actions, &subject_to_source.actions);
    extend_unique(&mut actions, &association.verbs);
    extend_unique(&mut actions, &resource_to_meeting.actions);

    let mut obligations = Vec::new();
    extend_unique(&mut obligations, &association.obligations);

    PrivilegePath {
        nodes,
        edges,
        actions,
        obligations,
    }
}

/// Decide whether a direct subject→resource path is admissible: either
/// some association on it covers the full requested action set, or the
/// permissive pure-assignment fallback is on and the path carries only
/// assignments.
pub(crate) async fn direct_path_admissible(
    path: &PrivilegePath,
    graph: &mut Subgraph,
    store: &dyn PolicyStore,
    class: &str,
    actions: &[String],
    allow_pure_assignment: bool,
) -> ngac_core::Result<bool> {
    for edge in &path.edges {
        if !edge.is_association() {
            continue;
        }
        match graph.association(store, edge, class).await {
            Ok(assoc) if assoc.covers_actions(actions) => return Ok(true),
            Ok(_) => {}
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }
    }
    Ok(allow_pure_assignment && path.is_pure_assignment())
}
