//! Associations: permission-granting edges.

use crate::entity::Entity;
use crate::relationship::{Relationship, RelationshipKind};
use serde::{Deserialize, Serialize};

/// A permission grant from a subject-side node to a resource-side node.
///
/// The association owns its underlying [`Relationship`] (copied from the
/// store on read); the edge's identity lives there. Verbs and obligations
/// are payload: [`Association::add_verbs`] accumulates onto an existing
/// edge without changing which edge it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// The underlying association edge
    pub relationship: Relationship,
    /// Allowed action verbs, insertion order preserved
    pub verbs: Vec<String>,
    /// Policy class this grant is scoped to
    pub class_name: String,
    /// Obligations incurred when a path through this grant is exercised
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub obligations: Vec<String>,
}

impl Association {
    /// Create an association granting `verbs` from `from` to `to` within a
    /// policy class.
    pub fn new(
        from: &Entity,
        to: &Entity,
        verbs: Vec<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            relationship: Relationship::new(from, to, RelationshipKind::Association),
            verbs,
            class_name: class_name.into(),
            obligations: Vec::new(),
        }
    }

    /// The underlying edge's canonical id.
    pub fn id(&self) -> &str {
        self.relationship.id()
    }

    /// Accumulate verbs, skipping any already present. The edge id is
    /// unchanged by construction: verbs are not identity claims.
    pub fn add_verbs(&mut self, verbs: &[String]) {
        for verb in verbs {
            if !self.verbs.contains(verb) {
                self.verbs.push(verb.clone());
            }
        }
    }

    /// True if this grant covers the full requested action set.
    ///
    /// An empty request means "any action" and is covered by every grant;
    /// a non-empty request against an empty verb set is not covered.
    pub fn covers_actions(&self, actions: &[String]) -> bool {
        if actions.is_empty() {
            return true;
        }
        if self.verbs.is_empty() {
            return false;
        }
        actions.iter().all(|action| self.verbs.contains(action))
    }
}
