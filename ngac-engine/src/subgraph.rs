//! Per-request subgraph expansion.
//!
//! A [`Subgraph`] is the bounded, BFS-explored neighbourhood of one seed
//! entity, built fresh for every evaluation. The walk follows *outgoing*
//! edges only; both the subject-side and resource-side graphs are built the
//! same way, which is what makes the resource-side path segment of a
//! privilege path traverse `forward` edges as recorded here.

use crate::error::{EvalError, EvalResult};
use ngac_core::{Association, Entity, PolicyStore, Relationship};
use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// The explored neighbourhood of a seed entity.
///
/// Lifetime: one authorization request. Never shared across evaluations.
#[derive(Debug, Default)]
pub struct Subgraph {
    /// The seed this graph was expanded from
    pub seed_id: String,
    /// node id -> entity
    pub nodes: HashMap<String, Entity>,
    /// source id -> edges leaving that source, in BFS discovery order
    pub forward: HashMap<String, Vec<Relationship>>,
    /// target id -> edges arriving at that target
    pub reverse: HashMap<String, Vec<Relationship>>,
    /// edge id -> association materialised during the build or on demand
    pub assoc_cache: HashMap<String, Association>,
}

impl Subgraph {
    fn new(seed_id: String) -> Self {
        Self {
            seed_id,
            ..Self::default()
        }
    }

    /// True if the node id was discovered during expansion.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of discovered nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resolve an association edge: cache first, store on miss.
    ///
    /// Successful refetches are cached for the rest of the evaluation.
    pub(crate) async fn association(
        &mut self,
        store: &dyn PolicyStore,
        edge: &Relationship,
        class: &str,
    ) -> ngac_core::Result<Association> {
        if let Some(assoc) = self.assoc_cache.get(&edge.hash_id) {
            return Ok(assoc.clone());
        }
        let assoc = store.fetch_association(&edge.hash_id, class).await?;
        self.assoc_cache.insert(edge.hash_id.clone(), assoc.clone());
        Ok(assoc)
    }
}

/// Race a store call against cancellation.
async fn guarded<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = ngac_core::Result<T>>,
) -> EvalResult<T> {
    tokio::select! {
        // An already-fired token must win over a ready store future.
        biased;
        _ = cancel.cancelled() => Err(EvalError::Cancelled),
        result = fut => result.map_err(EvalError::from),
    }
}

/// Build a subgraph by bounded BFS from `seed_id`.
///
/// `role` tags log events only. Depth is counted in edges: with
/// `max_depth` = N, nodes up to edge-distance N are discovered and nodes
/// at distance N are not expanded further.
///
/// Failure semantics:
/// - seed not found: fatal ([`EvalError::SeedNotFound`])
/// - missing intermediate entity: logged and skipped
/// - association that fails to materialise: logged and skipped; the edge
///   stays in `forward`/`reverse` and downstream code refetches on demand
/// - any other store failure: fatal
pub(crate) async fn build_subgraph(
    store: Arc<dyn PolicyStore>,
    seed_id: String,
    role: &'static str,
    class: String,
    max_depth: usize,
    cancel: CancellationToken,
) -> EvalResult<Subgraph> {
    debug!(role, seed = %seed_id, "Building subgraph");

    let mut subgraph = Subgraph::new(seed_id.clone());

    let seed = guarded(&cancel, store.fetch_entity(&seed_id))
        .await
        .map_err(|err| match err {
            EvalError::Store(inner) => EvalError::for_seed(&seed_id, inner),
            other => other,
        })?;
    subgraph.nodes.insert(seed_id.clone(), seed);

    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(seed_id.clone());
    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(seed_id);

    let mut depth = 0;
    while !queue.is_empty() && depth < max_depth {
        let level_size = queue.len();

        for _ in 0..level_size {
            let Some(current) = queue.pop_front() else {
                break;
            };

            let edges = guarded(&cancel, store.fetch_edges_from(&current)).await?;
            if edges.is_empty() {
                continue;
            }

            for edge in &edges {
                subgraph
                    .reverse
                    .entry(edge.to_id.clone())
                    .or_default()
                    .push(edge.clone());

                if edge.is_association() {
                    match guarded(&cancel, store.fetch_association(&edge.hash_id, &class)).await {
                        Ok(assoc) => {
                            subgraph.assoc_cache.insert(edge.hash_id.clone(), assoc);
                        }
                        Err(EvalError::Cancelled) => return Err(EvalError::Cancelled),
                        Err(err) => {
                            warn!(role, edge = %edge.hash_id, error = %err,
                                "Association failed to materialise, deferring to refetch");
                        }
                    }
                }

                if visited.insert(edge.to_id.clone()) {
                    match guarded(&cancel, store.fetch_entity(&edge.to_id)).await {
                        Ok(entity) => {
                            subgraph.nodes.insert(edge.to_id.clone(), entity);
                            queue.push_back(edge.to_id.clone());
                        }
                        Err(EvalError::Store(err)) if err.is_not_found() => {
                            // Dangling reference in the backing store: the
                            // edge stays recorded but the walk does not
                            // continue through the missing node.
                            warn!(role, node = %edge.to_id,
                                "Target entity missing during traversal, skipping");
                        }
                        Err(other) => return Err(other),
                    }
                }
            }

            subgraph.forward.insert(current, edges);
        }
        depth += 1;
    }

    debug!(
        role,
        nodes = subgraph.node_count(),
        sources = subgraph.forward.len(),
        "Built subgraph"
    );

    Ok(subgraph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngac_core::EntityKind;
    use ngac_memory::MemoryStore;

    fn verbs(list: &[&str]) -> Vec<String> {
        list.iter().map(|v| v.to_string()).collect()
    }

    async fn build(
        store: &Arc<MemoryStore>,
        seed: &str,
        max_depth: usize,
    ) -> EvalResult<Subgraph> {
        build_subgraph(
            Arc::clone(store) as Arc<dyn PolicyStore>,
            seed.to_string(),
            "subject",
            "default".to_string(),
            max_depth,
            CancellationToken::new(),
        )
        .await
    }

    /// alice -> readers -> staff, with an association readers -> docs.
    fn chain_store() -> (Arc<MemoryStore>, Entity) {
        let store = Arc::new(MemoryStore::new());
        let alice = Entity::named("alice", EntityKind::Subject);
        let readers = Entity::named("readers", EntityKind::SubjectAttribute);
        let staff = Entity::named("staff", EntityKind::SubjectAttribute);
        let docs = Entity::named("docs", EntityKind::ResourceAttribute);
        for entity in [&alice, &readers, &staff, &docs] {
            store.add_entity(entity.clone());
        }
        store.add_assignment(&alice, &readers);
        store.add_assignment(&readers, &staff);
        store.add_association(&readers, &docs, verbs(&["read"]), "default");
        (store, alice)
    }

    #[tokio::test]
    async fn test_bfs_discovers_nodes_and_caches_associations() {
        let (store, alice) = chain_store();
        let subgraph = build(&store, alice.id(), 10).await.unwrap();

        assert_eq!(subgraph.node_count(), 4);
        assert_eq!(subgraph.assoc_cache.len(), 1);
        assert!(subgraph.forward.contains_key(alice.id()));

        let docs = Entity::named("docs", EntityKind::ResourceAttribute);
        assert_eq!(subgraph.reverse[docs.id()].len(), 1);
    }

    #[tokio::test]
    async fn test_depth_bound_limits_expansion() {
        let (store, alice) = chain_store();

        // Depth 1: alice plus its direct targets, nothing beyond.
        let subgraph = build(&store, alice.id(), 1).await.unwrap();
        let staff = Entity::named("staff", EntityKind::SubjectAttribute);
        assert!(subgraph.contains(alice.id()));
        assert!(!subgraph.contains(staff.id()), "distance-2 node beyond bound");
        assert_eq!(subgraph.node_count(), 2);
    }

    #[tokio::test]
    async fn test_seed_missing_is_fatal() {
        let store = Arc::new(MemoryStore::new());
        let err = build(&store, "ghost", 10).await.unwrap_err();
        assert!(matches!(err, EvalError::SeedNotFound { .. }));
    }

    #[tokio::test]
    async fn test_dangling_intermediate_skipped() {
        let (store, alice) = chain_store();
        let readers = Entity::named("readers", EntityKind::SubjectAttribute);
        store.remove_entity(readers.id());

        let subgraph = build(&store, alice.id(), 10).await.unwrap();
        assert!(!subgraph.contains(readers.id()));
        // The edge to the dangling node is still recorded.
        assert_eq!(subgraph.forward[alice.id()].len(), 1);
        // The walk did not continue through it.
        let staff = Entity::named("staff", EntityKind::SubjectAttribute);
        assert!(!subgraph.contains(staff.id()));
    }

    #[tokio::test]
    async fn test_cycles_terminate() {
        let store = Arc::new(MemoryStore::new());
        let a = Entity::named("a", EntityKind::SubjectAttribute);
        let b = Entity::named("b", EntityKind::SubjectAttribute);
        store.add_entity(a.clone());
        store.add_entity(b.clone());
        store.add_assignment(&a, &b);
        store.add_assignment(&b, &a);

        let subgraph = build(&store, a.id(), 10).await.unwrap();
        assert_eq!(subgraph.node_count(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (store, alice) = chain_store();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = build_subgraph(
            store as Arc<dyn PolicyStore>,
            alice.id().to_string(),
            "subject",
            "default".to_string(),
            10,
            cancel,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EvalError::Cancelled));
    }
}
