//! Obligation aggregation and decision assembly.

use crate::path::{extend_unique, PrivilegePath};
use crate::subgraph::Subgraph;
use chrono::{DateTime, Utc};
use ngac_core::{Entity, PolicyStore, Prohibition};
use serde::Serialize;
use tracing::debug;

/// The outcome of one policy evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub permit: bool,
    pub reason: String,
    /// Obligations gathered from every granted path, first-seen order,
    /// duplicates collapsed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub obligations: Vec<String>,
    /// Conditions carried by edges on the granted paths
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
    pub timestamp: DateTime<Utc>,
    /// Node trail of the first privilege path, for audit
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policy_path: Vec<Entity>,
    /// The prohibitions that fired, when denial came from the overlay
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prohibitions: Vec<Prohibition>,
}

impl Decision {
    pub(crate) fn no_path() -> Self {
        Self {
            permit: false,
            reason: "No privilege path found from subject to resource".to_string(),
            obligations: Vec::new(),
            conditions: Vec::new(),
            timestamp: Utc::now(),
            policy_path: Vec::new(),
            prohibitions: Vec::new(),
        }
    }

    pub(crate) fn prohibited(prohibitions: Vec<Prohibition>) -> Self {
        Self {
            permit: false,
            reason: format!("Access prohibited by {} prohibition(s)", prohibitions.len()),
            obligations: Vec::new(),
            conditions: Vec::new(),
            timestamp: Utc::now(),
            policy_path: Vec::new(),
            prohibitions,
        }
    }

    pub(crate) fn granted(
        path_count: usize,
        policy_path: Vec<Entity>,
        obligations: Vec<String>,
        conditions: Vec<String>,
    ) -> Self {
        Self {
            permit: true,
            reason: format!("Access granted via {path_count} privilege path(s)"),
            obligations,
            conditions,
            timestamp: Utc::now(),
            policy_path,
            prohibitions: Vec::new(),
        }
    }

    /// Hash id of the last entity on the policy path, if any.
    pub fn policy_id(&self) -> Option<&str> {
        self.policy_path.last().map(|entity| entity.hash_id.as_str())
    }
}

/// Gather obligations and conditions from every privilege path.
///
/// Association obligations come from either subgraph's cache when present,
/// with a store refetch only on a double miss; unresolvable associations
/// contribute nothing. Both outputs are sets in first-seen order.
pub(crate) async fn collect_obligations(
    paths: &[PrivilegePath],
    subject_graph: &mut Subgraph,
    resource_graph: &Subgraph,
    store: &dyn PolicyStore,
    class: &str,
) -> ngac_core::Result<(Vec<String>, Vec<String>)> {
    let mut obligations = Vec::new();
    let mut conditions = Vec::new();

    for path in paths {
        for edge in &path.edges {
            extend_unique(&mut conditions, &edge.conditions);
            extend_unique(&mut obligations, &edge.obligations);

            if !edge.is_association() {
                continue;
            }
            let assoc = if let Some(cached) = resource_graph.assoc_cache.get(&edge.hash_id) {
                Some(cached.clone())
            } else {
                match subject_graph.association(store, edge, class).await {
                    Ok(assoc) => Some(assoc),
                    Err(err) if err.is_not_found() => {
                        debug!(edge = %edge.hash_id, "Association unresolvable while aggregating");
                        None
                    }
                    Err(err) => return Err(err),
                }
            };
            if let Some(assoc) = assoc {
                extend_unique(&mut obligations, &assoc.obligations);
            }
        }
    }

    debug!(
        obligations = obligations.len(),
        conditions = conditions.len(),
        "Aggregated path obligations"
    );
    Ok((obligations, conditions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngac_core::{EntityKind, Relationship, RelationshipKind};

    fn verbs(list: &[&str]) -> Vec<String> {
        list.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_reason_strings() {
        assert_eq!(
            Decision::no_path().reason,
            "No privilege path found from subject to resource"
        );

        let readers = Entity::named("readers", EntityKind::SubjectAttribute);
        let docs = Entity::named("docs", EntityKind::ResourceAttribute);
        let prohibition = Prohibition::new(&readers, &docs, verbs(&["*"]), "default");
        let denied = Decision::prohibited(vec![prohibition]);
        assert_eq!(denied.reason, "Access prohibited by 1 prohibition(s)");
        assert!(!denied.permit);

        let granted = Decision::granted(2, Vec::new(), Vec::new(), Vec::new());
        assert_eq!(granted.reason, "Access granted via 2 privilege path(s)");
        assert!(granted.permit);
    }

    #[test]
    fn test_policy_id_is_last_path_entity() {
        let alice = Entity::named("alice", EntityKind::Subject);
        let doc = Entity::named("doc", EntityKind::Resource);
        let granted = Decision::granted(1, vec![alice, doc.clone()], Vec::new(), Vec::new());
        assert_eq!(granted.policy_id(), Some(doc.id()));
        assert_eq!(Decision::no_path().policy_id(), None);
    }

    #[tokio::test]
    async fn test_obligations_deduplicated_across_paths() {
        let readers = Entity::named("readers", EntityKind::SubjectAttribute);
        let writers = Entity::named("writers", EntityKind::SubjectAttribute);
        let docs = Entity::named("docs", EntityKind::ResourceAttribute);

        let mut first = ngac_core::Association::new(&readers, &docs, verbs(&["read"]), "default");
        first.obligations = verbs(&["audit", "notify"]);
        let mut second = ngac_core::Association::new(&writers, &docs, verbs(&["read"]), "default");
        second.obligations = verbs(&["audit"]);

        let mut subject_graph = Subgraph::default();
        subject_graph
            .assoc_cache
            .insert(first.id().to_string(), first.clone());
        subject_graph
            .assoc_cache
            .insert(second.id().to_string(), second.clone());
        let resource_graph = Subgraph::default();

        let path_for = |assoc: &ngac_core::Association, from: &Entity| PrivilegePath {
            nodes: vec![from.clone(), docs.clone()],
            edges: vec![assoc.relationship.clone()],
            actions: verbs(&["read"]),
            obligations: Vec::new(),
        };
        let paths = vec![path_for(&first, &readers), path_for(&second, &writers)];

        let store = ngac_memory::MemoryStore::new();
        let (obligations, conditions) = collect_obligations(
            &paths,
            &mut subject_graph,
            &resource_graph,
            &store,
            "default",
        )
        .await
        .unwrap();
        assert_eq!(obligations, verbs(&["audit", "notify"]));
        assert!(conditions.is_empty());
    }

    #[tokio::test]
    async fn test_edge_conditions_collected() {
        let alice = Entity::named("alice", EntityKind::Subject);
        let readers = Entity::named("readers", EntityKind::SubjectAttribute);
        let mut edge = Relationship::new(&alice, &readers, RelationshipKind::Assignment);
        edge.conditions = verbs(&["business-hours"]);

        let path = PrivilegePath {
            nodes: vec![alice, readers],
            edges: vec![edge],
            actions: Vec::new(),
            obligations: Vec::new(),
        };

        let mut subject_graph = Subgraph::default();
        let resource_graph = Subgraph::default();
        let store = ngac_memory::MemoryStore::new();
        let (_, conditions) = collect_obligations(
            &[path],
            &mut subject_graph,
            &resource_graph,
            &store,
            "default",
        )
        .await
        .unwrap();
        assert_eq!(conditions, verbs(&["business-hours"]));
    }
}
