//! HashMap-backed store implementation.

use async_trait::async_trait;
use ngac_core::{
    Association, Entity, Error, PolicyStore, Prohibition, Relationship, RelationshipKind, Result,
};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct Tables {
    /// hash id -> entity
    entities: HashMap<String, Entity>,
    /// source id -> outgoing edges
    edges_by_source: HashMap<String, Vec<Relationship>>,
    /// (edge id, class) -> association payload
    associations: HashMap<(String, String), Association>,
    /// class -> prohibitions, insertion order preserved
    prohibitions: HashMap<String, Vec<Prohibition>>,
}

impl Tables {
    /// Record an edge under its source, once.
    fn record_edge(&mut self, edge: &Relationship) {
        let edges = self.edges_by_source.entry(edge.from_id.clone()).or_default();
        if !edges.iter().any(|existing| existing.hash_id == edge.hash_id) {
            edges.push(edge.clone());
        }
    }
}

/// In-memory [`PolicyStore`] with write helpers.
///
/// Re-adding an association or prohibition between the same endpoints in
/// the same class accumulates verbs onto the existing edge — the edge id is
/// a function of type and endpoints only, so there is nothing new to key.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity. Idempotent: the id is content-addressed, so
    /// re-adding the same entity is a no-op.
    pub fn add_entity(&self, entity: Entity) {
        let mut tables = self.inner.write().expect("store lock poisoned");
        tables.entities.entry(entity.hash_id.clone()).or_insert(entity);
    }

    /// Insert a containment edge between two (already added) entities.
    pub fn add_assignment(&self, from: &Entity, to: &Entity) -> Relationship {
        let edge = Relationship::new(from, to, RelationshipKind::Assignment);
        let mut tables = self.inner.write().expect("store lock poisoned");
        tables.record_edge(&edge);
        edge
    }

    /// Insert a permission grant, or accumulate verbs onto an existing one.
    pub fn add_association(
        &self,
        from: &Entity,
        to: &Entity,
        verbs: Vec<String>,
        class: &str,
    ) -> Association {
        let assoc = Association::new(from, to, verbs, class);
        let mut tables = self.inner.write().expect("store lock poisoned");
        tables.record_edge(&assoc.relationship);

        let key = (assoc.id().to_string(), class.to_string());
        match tables.associations.get_mut(&key) {
            Some(existing) => {
                existing.add_verbs(&assoc.verbs);
                existing.clone()
            }
            None => {
                tables.associations.insert(key, assoc.clone());
                assoc
            }
        }
    }

    /// Attach obligations to an existing association.
    pub fn add_association_obligations(&self, edge_id: &str, class: &str, obligations: &[String]) {
        let mut tables = self.inner.write().expect("store lock poisoned");
        if let Some(assoc) = tables
            .associations
            .get_mut(&(edge_id.to_string(), class.to_string()))
        {
            for obligation in obligations {
                if !assoc.obligations.contains(obligation) {
                    assoc.obligations.push(obligation.clone());
                }
            }
        }
    }

    /// Insert a denial, or accumulate verbs onto an existing one.
    pub fn add_prohibition(
        &self,
        from: &Entity,
        to: &Entity,
        verbs: Vec<String>,
        class: &str,
    ) -> Prohibition {
        let prohibition = Prohibition::new(from, to, verbs, class);
        let mut tables = self.inner.write().expect("store lock poisoned");
        tables.record_edge(&prohibition.relationship);

        let class_prohibitions = tables.prohibitions.entry(class.to_string()).or_default();
        match class_prohibitions
            .iter_mut()
            .find(|existing| existing.id() == prohibition.id())
        {
            Some(existing) => {
                existing.add_verbs(&prohibition.verbs);
                existing.clone()
            }
            None => {
                class_prohibitions.push(prohibition.clone());
                prohibition
            }
        }
    }

    /// Remove an entity row, leaving its edges in place.
    ///
    /// This is how the backing store looks when a reference dangles; tests
    /// use it to exercise the engine's tolerance for missing intermediates.
    pub fn remove_entity(&self, id: &str) {
        let mut tables = self.inner.write().expect("store lock poisoned");
        if tables.entities.remove(id).is_some() {
            debug!(id = %id, "Removed entity row, edges retained");
        }
    }

    /// Number of entities currently stored.
    pub fn entity_count(&self) -> usize {
        self.inner.read().expect("store lock poisoned").entities.len()
    }
}

#[async_trait]
impl PolicyStore for MemoryStore {
    async fn fetch_entity(&self, id: &str) -> Result<Entity> {
        let tables = self.inner.read().expect("store lock poisoned");
        tables
            .entities
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("entity {id}")))
    }

    async fn fetch_edges_from(&self, id: &str) -> Result<Vec<Relationship>> {
        let tables = self.inner.read().expect("store lock poisoned");
        Ok(tables.edges_by_source.get(id).cloned().unwrap_or_default())
    }

    async fn fetch_association(&self, edge_id: &str, class: &str) -> Result<Association> {
        let tables = self.inner.read().expect("store lock poisoned");
        tables
            .associations
            .get(&(edge_id.to_string(), class.to_string()))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("association {edge_id} in class {class}")))
    }

    async fn fetch_prohibitions_for_class(&self, class: &str) -> Result<Vec<Prohibition>> {
        let tables = self.inner.read().expect("store lock poisoned");
        Ok(tables.prohibitions.get(class).cloned().unwrap_or_default())
    }
}
