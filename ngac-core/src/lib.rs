//! Core model and ports for the NGAC policy machine
//!
//! This crate defines the policy graph's value types and the read contract
//! the decision engine consumes:
//!
//! - **Entities**: typed nodes (subjects, resources, attributes, policy
//!   classes) with content-addressed ids
//! - **Relationships**: directed, typed edges (assignment, association,
//!   prohibition) whose ids are a function of type and endpoints only
//! - **Associations / Prohibitions**: permission-granting and
//!   permission-denying edges carrying verb sets scoped to a policy class
//! - **Properties**: immutable key-value pairs attachable to entities
//! - [`PolicyStore`]: the async read port any backing store implements
//!
//! # Identity
//!
//! Every entity and relationship is keyed by a deterministic SHA-256 digest
//! of its identity claims (see [`id`]). Verbs, obligations, and conditions
//! are never part of an id: accumulating verbs onto an existing association
//! or prohibition does not change which edge it is.

mod association;
mod entity;
mod error;
pub mod id;
mod prohibition;
mod property;
mod relationship;
mod store;

pub use association::Association;
pub use entity::{Entity, EntityKind};
pub use error::{Error, Result};
pub use prohibition::{Prohibition, WILDCARD_VERB};
pub use property::{map_from_properties, properties_from_map, Property};
pub use relationship::{Relationship, RelationshipKind};
pub use store::PolicyStore;
