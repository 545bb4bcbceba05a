//! The read port the decision engine consumes.
//!
//! Any backing store (SQL, in-memory, ...) implements [`PolicyStore`]; the
//! engine never sees anything else. Writes are deliberately outside the
//! port — ingestion is a separate concern with its own shape per backend.

use crate::association::Association;
use crate::entity::Entity;
use crate::error::Result;
use crate::prohibition::Prohibition;
use crate::relationship::Relationship;
use async_trait::async_trait;
use std::fmt::Debug;

/// Read contract over the persisted policy graph.
///
/// Implementations must be safe for concurrent calls from many evaluations.
///
/// # Error contract
///
/// - [`fetch_entity`](Self::fetch_entity) returns `Error::NotFound` on a
///   miss; the caller decides whether that is fatal (seeds) or tolerable
///   (dangling intermediates).
/// - [`fetch_edges_from`](Self::fetch_edges_from) returns an empty list for
///   an unknown source — absence of edges is not an error.
/// - [`fetch_association`](Self::fetch_association) returns
///   `Error::NotFound` unless both the edge id and the policy class match.
/// - Every other failure mode is the I/O class and is fatal to the caller.
#[async_trait]
pub trait PolicyStore: Debug + Send + Sync {
    /// Fetch an entity by its canonical hash id.
    async fn fetch_entity(&self, id: &str) -> Result<Entity>;

    /// List outgoing edges for a source entity id.
    async fn fetch_edges_from(&self, id: &str) -> Result<Vec<Relationship>>;

    /// Resolve the verbs and obligations of an association edge within a
    /// policy class.
    async fn fetch_association(&self, edge_id: &str, class: &str) -> Result<Association>;

    /// Bulk-fetch the prohibitions scoped to a policy class.
    async fn fetch_prohibitions_for_class(&self, class: &str) -> Result<Vec<Prohibition>>;
}
