//! Shared fixtures for engine integration tests.

use async_trait::async_trait;
use ngac_core::{Association, Entity, EntityKind, PolicyStore, Prohibition, Relationship};
use ngac_engine::{EvaluationRequest, PolicyEngine};
use ngac_memory::MemoryStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub fn verbs(list: &[&str]) -> Vec<String> {
    list.iter().map(|v| v.to_string()).collect()
}

/// The single-association graph most scenarios start from:
/// `alice -> readers`, `doc -> docs`, association `readers -> docs [read]`.
pub struct SingleAssociationGraph {
    pub store: Arc<MemoryStore>,
    pub alice: Entity,
    pub doc: Entity,
    pub readers: Entity,
    pub docs: Entity,
}

pub fn single_association_graph() -> SingleAssociationGraph {
    single_association_graph_in_class("default")
}

pub fn single_association_graph_in_class(class: &str) -> SingleAssociationGraph {
    let store = Arc::new(MemoryStore::new());
    let alice = Entity::named("alice", EntityKind::Subject);
    let doc = Entity::named("doc", EntityKind::Resource);
    let readers = Entity::named("readers", EntityKind::SubjectAttribute);
    let docs = Entity::named("docs", EntityKind::ResourceAttribute);
    for entity in [&alice, &doc, &readers, &docs] {
        store.add_entity(entity.clone());
    }
    store.add_assignment(&alice, &readers);
    store.add_assignment(&doc, &docs);
    store.add_association(&readers, &docs, verbs(&["read"]), class);

    SingleAssociationGraph {
        store,
        alice,
        doc,
        readers,
        docs,
    }
}

pub fn engine(store: &Arc<MemoryStore>) -> PolicyEngine {
    PolicyEngine::new(Arc::clone(store) as Arc<dyn PolicyStore>)
}

pub fn request(
    subject: &Entity,
    resource: &Entity,
    actions: &[&str],
    class: &str,
) -> EvaluationRequest {
    EvaluationRequest {
        subject: subject.clone(),
        resource: resource.clone(),
        actions: verbs(actions),
        policy_class: class.to_string(),
        context: HashMap::new(),
        request_id: None,
    }
}

/// Store wrapper that sleeps before every call, so tests can cancel an
/// evaluation while a store call is in flight.
#[derive(Debug)]
pub struct SlowStore {
    inner: Arc<MemoryStore>,
    delay: Duration,
}

impl SlowStore {
    pub fn new(inner: Arc<MemoryStore>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl PolicyStore for SlowStore {
    async fn fetch_entity(&self, id: &str) -> ngac_core::Result<Entity> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_entity(id).await
    }

    async fn fetch_edges_from(&self, id: &str) -> ngac_core::Result<Vec<Relationship>> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_edges_from(id).await
    }

    async fn fetch_association(&self, edge_id: &str, class: &str) -> ngac_core::Result<Association> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_association(edge_id, class).await
    }

    async fn fetch_prohibitions_for_class(&self, class: &str) -> ngac_core::Result<Vec<Prohibition>> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_prohibitions_for_class(class).await
    }
}
