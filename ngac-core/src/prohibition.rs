//! Prohibitions: permission-denying edges.

use crate::entity::Entity;
use crate::relationship::{Relationship, RelationshipKind};
use serde::{Deserialize, Serialize};

/// Verb that matches every action in a prohibition.
pub const WILDCARD_VERB: &str = "*";

/// A denial of operations between a subject-side node and a resource-side
/// node, structurally mirroring an association but carrying *denied* verbs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prohibition {
    /// The underlying prohibition edge
    pub relationship: Relationship,
    /// Denied action verbs; `"*"` denies every action
    pub verbs: Vec<String>,
    /// Policy class this denial is scoped to
    pub class_name: String,
}

impl Prohibition {
    /// Create a prohibition denying `verbs` from `from` to `to` within a
    /// policy class.
    pub fn new(
        from: &Entity,
        to: &Entity,
        verbs: Vec<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            relationship: Relationship::new(from, to, RelationshipKind::Prohibition),
            verbs,
            class_name: class_name.into(),
        }
    }

    /// The underlying edge's canonical id.
    pub fn id(&self) -> &str {
        self.relationship.id()
    }

    /// Accumulate denied verbs, skipping any already present.
    pub fn add_verbs(&mut self, verbs: &[String]) {
        for verb in verbs {
            if !self.verbs.contains(verb) {
                self.verbs.push(verb.clone());
            }
        }
    }

    /// True if this prohibition denies the given action, directly or via
    /// the wildcard.
    pub fn denies_action(&self, action: &str) -> bool {
        self.verbs
            .iter()
            .any(|verb| verb == action || verb == WILDCARD_VERB)
    }

    /// True if this prohibition carries the wildcard verb.
    pub fn denies_all(&self) -> bool {
        self.verbs.iter().any(|verb| verb == WILDCARD_VERB)
    }
}
