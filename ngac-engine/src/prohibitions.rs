//! Prohibition overlay: which denials fire against a set of privilege
//! paths.

use crate::path::PrivilegePath;
use ngac_core::Prohibition;
use tracing::debug;

/// Return every prohibition that fires against the request.
///
/// A prohibition fires when both tests pass:
///
/// 1. **Action test** — it denies at least one requested action, or it
///    carries the wildcard. An empty request means "any action", so only
///    wildcard prohibitions can fire then.
/// 2. **Intersection test** — its edge touches the request: source equals
///    the subject id, target equals the resource id, or either endpoint
///    appears as a node on some privilege path. All ids here are canonical
///    hash ids.
///
/// No short-circuit: the full firing set is returned so the decision can
/// report the count.
pub(crate) fn firing_prohibitions(
    prohibitions: &[Prohibition],
    actions: &[String],
    subject_id: &str,
    resource_id: &str,
    paths: &[PrivilegePath],
) -> Vec<Prohibition> {
    let mut firing = Vec::new();

    for prohibition in prohibitions {
        let action_hit = if actions.is_empty() {
            prohibition.denies_all()
        } else {
            actions.iter().any(|action| prohibition.denies_action(action))
        };
        if !action_hit {
            continue;
        }

        if intersects(prohibition, subject_id, resource_id, paths) {
            debug!(prohibition = %prohibition.id(), "Prohibition fires");
            firing.push(prohibition.clone());
        }
    }

    firing
}

fn intersects(
    prohibition: &Prohibition,
    subject_id: &str,
    resource_id: &str,
    paths: &[PrivilegePath],
) -> bool {
    let from = prohibition.relationship.from_id.as_str();
    let to = prohibition.relationship.to_id.as_str();

    if from == subject_id || to == resource_id {
        return true;
    }
    paths
        .iter()
        .any(|path| path.visits(from) || path.visits(to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngac_core::{Entity, EntityKind, Relationship, RelationshipKind};

    fn verbs(list: &[&str]) -> Vec<String> {
        list.iter().map(|v| v.to_string()).collect()
    }

    struct Fixture {
        alice: Entity,
        readers: Entity,
        docs: Entity,
        doc: Entity,
        path: PrivilegePath,
    }

    fn fixture() -> Fixture {
        let alice = Entity::named("alice", EntityKind::Subject);
        let readers = Entity::named("readers", EntityKind::SubjectAttribute);
        let docs = Entity::named("docs", EntityKind::ResourceAttribute);
        let doc = Entity::named("doc", EntityKind::Resource);
        let path = PrivilegePath {
            edges: vec![
                Relationship::new(&alice, &readers, RelationshipKind::Assignment),
                Relationship::new(&readers, &docs, RelationshipKind::Association),
                Relationship::new(&docs, &doc, RelationshipKind::Assignment),
            ],
            nodes: vec![alice.clone(), readers.clone(), docs.clone(), doc.clone()],
            actions: verbs(&["read"]),
            obligations: Vec::new(),
        };
        Fixture {
            alice,
            readers,
            docs,
            doc,
            path,
        }
    }

    #[test]
    fn test_wildcard_prohibition_fires_on_path_nodes() {
        let f = fixture();
        let prohibition = Prohibition::new(&f.readers, &f.docs, verbs(&["*"]), "default");

        let firing = firing_prohibitions(
            &[prohibition],
            &verbs(&["read"]),
            f.alice.id(),
            f.doc.id(),
            std::slice::from_ref(&f.path),
        );
        assert_eq!(firing.len(), 1);
    }

    #[test]
    fn test_scoped_prohibition_does_not_fire_on_other_action() {
        let f = fixture();
        let prohibition = Prohibition::new(&f.readers, &f.docs, verbs(&["delete"]), "default");

        let firing = firing_prohibitions(
            &[prohibition],
            &verbs(&["read"]),
            f.alice.id(),
            f.doc.id(),
            std::slice::from_ref(&f.path),
        );
        assert!(firing.is_empty());
    }

    #[test]
    fn test_unrelated_endpoints_do_not_fire() {
        let f = fixture();
        let stranger = Entity::named("stranger", EntityKind::SubjectAttribute);
        let vault = Entity::named("vault", EntityKind::ResourceAttribute);
        let prohibition = Prohibition::new(&stranger, &vault, verbs(&["read"]), "default");

        let firing = firing_prohibitions(
            &[prohibition],
            &verbs(&["read"]),
            f.alice.id(),
            f.doc.id(),
            std::slice::from_ref(&f.path),
        );
        assert!(firing.is_empty());
    }

    #[test]
    fn test_subject_and_resource_endpoints_fire_even_off_path() {
        let f = fixture();
        let vault = Entity::named("vault", EntityKind::ResourceAttribute);
        let on_subject = Prohibition::new(&f.alice, &vault, verbs(&["read"]), "default");

        let firing = firing_prohibitions(
            &[on_subject],
            &verbs(&["read"]),
            f.alice.id(),
            f.doc.id(),
            &[],
        );
        assert_eq!(firing.len(), 1, "from == subject fires without any path");
    }

    #[test]
    fn test_empty_action_request_only_wildcard_fires() {
        let f = fixture();
        let scoped = Prohibition::new(&f.readers, &f.docs, verbs(&["delete"]), "default");
        let wildcard = Prohibition::new(&f.docs, &f.readers, verbs(&["*"]), "default");

        let firing = firing_prohibitions(
            &[scoped, wildcard.clone()],
            &[],
            f.alice.id(),
            f.doc.id(),
            std::slice::from_ref(&f.path),
        );
        assert_eq!(firing.len(), 1);
        assert_eq!(firing[0].id(), wildcard.id());
    }

    #[test]
    fn test_firing_monotone_in_path_set() {
        let f = fixture();
        let prohibition = Prohibition::new(&f.readers, &f.docs, verbs(&["read"]), "default");
        let second_path = PrivilegePath {
            nodes: vec![f.alice.clone(), f.doc.clone()],
            edges: vec![Relationship::new(&f.alice, &f.doc, RelationshipKind::Assignment)],
            actions: Vec::new(),
            obligations: Vec::new(),
        };

        let small = firing_prohibitions(
            std::slice::from_ref(&prohibition),
            &verbs(&["read"]),
            f.alice.id(),
            f.doc.id(),
            std::slice::from_ref(&f.path),
        );
        let large = firing_prohibitions(
            std::slice::from_ref(&prohibition),
            &verbs(&["read"]),
            f.alice.id(),
            f.doc.id(),
            &[f.path.clone(), second_path],
        );
        assert_eq!(small.len(), 1);
        assert_eq!(large.len(), 1, "superset of paths keeps firing");
    }
}
