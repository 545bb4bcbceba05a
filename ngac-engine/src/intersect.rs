//! Intersection resolution between the two subgraphs.
//!
//! A candidate is an association edge in the subject-side graph whose
//! target node also appears in the resource-side graph: the grant "points
//! into" the resource's neighbourhood, and its target is the meeting point
//! the path finder stitches through.

use crate::subgraph::Subgraph;
use ngac_core::{Association, PolicyStore};
use tracing::debug;

/// A candidate meeting point and the grant that reaches it.
#[derive(Debug, Clone)]
pub(crate) struct IntersectionCandidate {
    pub association: Association,
    /// The association's target: a node present in both subgraphs
    pub meeting_node: String,
}

/// Scan the subject-side graph for associations terminating inside the
/// resource-side graph.
///
/// Associations are resolved through the subject graph's cache, falling
/// back to the store; ones that cannot be resolved are dropped from
/// consideration (dangling), while I/O failures propagate. The result is
/// sorted by (meeting node, association id) so that map iteration order
/// never leaks into which path becomes the decision's representative.
pub(crate) async fn find_intersections(
    subject_graph: &mut Subgraph,
    resource_graph: &Subgraph,
    store: &dyn PolicyStore,
    class: &str,
) -> ngac_core::Result<Vec<IntersectionCandidate>> {
    let mut association_edges = Vec::new();
    for edges in subject_graph.forward.values() {
        for edge in edges {
            if edge.is_association() {
                association_edges.push(edge.clone());
            }
        }
    }

    let mut candidates = Vec::new();
    for edge in &association_edges {
        let assoc = match subject_graph.association(store, edge, class).await {
            Ok(assoc) => assoc,
            Err(err) if err.is_not_found() => {
                debug!(edge = %edge.hash_id, "Dropping unresolvable association");
                continue;
            }
            Err(err) => return Err(err),
        };

        if resource_graph.contains(&assoc.relationship.to_id) {
            debug!(
                from = %assoc.relationship.from_id,
                meeting = %assoc.relationship.to_id,
                "Found intersection"
            );
            candidates.push(IntersectionCandidate {
                meeting_node: assoc.relationship.to_id.clone(),
                association: assoc,
            });
        }
    }

    candidates.sort_by(|a, b| {
        (a.meeting_node.as_str(), a.association.id())
            .cmp(&(b.meeting_node.as_str(), b.association.id()))
    });

    debug!(count = candidates.len(), "Resolved intersection candidates");
    Ok(candidates)
}
