//! Relationships: the directed, typed edges of the policy graph.

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::id;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of edge types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Containment: subject/resource into attribute, attribute into class.
    /// Carries no verbs.
    Assignment,
    /// Permission grant from a subject-side node to a resource-side node.
    Association,
    /// Permission denial, structurally mirroring an association.
    Prohibition,
}

impl RelationshipKind {
    /// Canonical string form, as stored and hashed.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Assignment => "assignment",
            RelationshipKind::Association => "association",
            RelationshipKind::Prohibition => "prohibition",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "assignment" => Ok(RelationshipKind::Assignment),
            "association" => Ok(RelationshipKind::Association),
            "prohibition" => Ok(RelationshipKind::Prohibition),
            other => Err(Error::invalid_kind(format!("relationship kind: {other}"))),
        }
    }
}

/// A directed, typed edge between two entities.
///
/// `hash_id` is a function of `(kind, from_id, to_id)` only — see
/// [`crate::id::relationship_id`]. Obligations and conditions ride along on
/// the edge but are not part of its identity, so they can be replaced or
/// accumulated without the edge becoming a different edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Content-addressed canonical key
    pub hash_id: String,
    /// Source entity id
    pub from_id: String,
    /// Target entity id
    pub to_id: String,
    /// Edge type
    pub kind: RelationshipKind,
    /// Per-edge obligations, reported when the edge is on a granted path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub obligations: Vec<String>,
    /// Per-edge conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

impl Relationship {
    /// Create an edge between two entities.
    pub fn new(from: &Entity, to: &Entity, kind: RelationshipKind) -> Self {
        Self::between(from.id(), to.id(), kind)
    }

    /// Create an edge from raw entity ids.
    pub fn between(from_id: impl Into<String>, to_id: impl Into<String>, kind: RelationshipKind) -> Self {
        let from_id = from_id.into();
        let to_id = to_id.into();
        let hash_id = id::relationship_id(kind.as_str(), &from_id, &to_id);
        Self {
            hash_id,
            from_id,
            to_id,
            kind,
            obligations: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// The canonical id.
    pub fn id(&self) -> &str {
        &self.hash_id
    }

    /// True for assignment edges.
    pub fn is_assignment(&self) -> bool {
        self.kind == RelationshipKind::Assignment
    }

    /// True for association edges.
    pub fn is_association(&self) -> bool {
        self.kind == RelationshipKind::Association
    }

    /// True for prohibition edges.
    pub fn is_prohibition(&self) -> bool {
        self.kind == RelationshipKind::Prohibition
    }
}
