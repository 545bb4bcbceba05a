//! Entities: the typed nodes of the policy graph.

use crate::error::{Error, Result};
use crate::id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of node types in the policy graph.
///
/// Subjects and resources are the leaves under evaluation; attributes group
/// them; policy classes root an evaluable policy set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Subject,
    Resource,
    SubjectAttribute,
    ResourceAttribute,
    PolicyClass,
}

impl EntityKind {
    /// Canonical string form, as stored and hashed.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Subject => "subject",
            EntityKind::Resource => "resource",
            EntityKind::SubjectAttribute => "subject_attribute",
            EntityKind::ResourceAttribute => "resource_attribute",
            EntityKind::PolicyClass => "policy_class",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "subject" => Ok(EntityKind::Subject),
            "resource" => Ok(EntityKind::Resource),
            "subject_attribute" => Ok(EntityKind::SubjectAttribute),
            "resource_attribute" => Ok(EntityKind::ResourceAttribute),
            "policy_class" => Ok(EntityKind::PolicyClass),
            other => Err(Error::invalid_kind(format!("entity kind: {other}"))),
        }
    }
}

/// A node in the policy graph.
///
/// `hash_id` is a deterministic function of `(kind, name, properties)` — see
/// [`crate::id::entity_id`]. Two entities built from identical inputs are the
/// same entity. Entities are immutable once created; "changing" one means
/// re-creating it under the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Content-addressed canonical key
    pub hash_id: String,
    /// Human-readable name (part of the identity claims)
    pub name: String,
    /// Node type
    pub kind: EntityKind,
    /// Free-form property map (part of the identity claims)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl Entity {
    /// Create an entity, deriving its canonical id from the identity claims.
    pub fn new(name: impl Into<String>, kind: EntityKind, properties: BTreeMap<String, String>) -> Self {
        let name = name.into();
        let hash_id = id::entity_id(kind.as_str(), &name, &properties);
        Self {
            hash_id,
            name,
            kind,
            properties,
        }
    }

    /// Shorthand for an entity with no properties.
    pub fn named(name: impl Into<String>, kind: EntityKind) -> Self {
        Self::new(name, kind, BTreeMap::new())
    }

    /// The canonical id.
    pub fn id(&self) -> &str {
        &self.hash_id
    }
}
