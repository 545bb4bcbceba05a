//! Content-addressed ids for policy graph objects.
//!
//! Every entity and relationship is keyed by a SHA-256 digest of its
//! identity claims, hex-encoded. The claim map is canonicalized by sorted
//! key order (a `BTreeMap` rendered as JSON), so the same logical input
//! produces the same id in every process.
//!
//! ## Claim schemas
//!
//! - Entity: `{entity: <kind>, name: <name>, <property pairs>}`
//! - Relationship: `{relationship: <kind>, from: <from_id>, to: <to_id>}`
//! - Property: `{property_key: <key>, property_value: <value>}`
//!
//! Verbs, obligations, and conditions never enter a claim map: an edge's
//! identity is independent of what it grants or requires, which is what
//! lets verbs accumulate onto an existing edge without forking it.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Claim key carrying the entity kind.
const ENTITY_KEY: &str = "entity";
/// Claim key carrying the entity name.
const NAME_KEY: &str = "name";
/// Claim key carrying the relationship kind.
const RELATIONSHIP_KEY: &str = "relationship";
/// Claim key carrying the source entity id of an edge.
const FROM_KEY: &str = "from";
/// Claim key carrying the target entity id of an edge.
const TO_KEY: &str = "to";
/// Claim key carrying a property's key.
const PROPERTY_KEY: &str = "property_key";
/// Claim key carrying a property's value.
const PROPERTY_VALUE: &str = "property_value";

/// Hash a claim map into its canonical hex id.
///
/// The map is serialized as JSON — `BTreeMap` iterates in key order, so the
/// rendering is canonical — and digested with SHA-256. The result is the
/// 64-character lowercase hex digest.
pub fn hash_claims(claims: &BTreeMap<&str, &str>) -> String {
    let bytes = serde_json::to_vec(claims).expect("string claim maps always serialize");
    hex::encode(Sha256::digest(&bytes))
}

/// Canonical id for an entity: a function of kind, name, and properties.
pub fn entity_id(kind: &str, name: &str, properties: &BTreeMap<String, String>) -> String {
    let mut claims: BTreeMap<&str, &str> = BTreeMap::new();
    for (key, value) in properties {
        claims.insert(key.as_str(), value.as_str());
    }
    // Identity claims win over same-named properties.
    claims.insert(NAME_KEY, name);
    claims.insert(ENTITY_KEY, kind);
    hash_claims(&claims)
}

/// Canonical id for a relationship: a function of kind and endpoints only.
pub fn relationship_id(kind: &str, from_id: &str, to_id: &str) -> String {
    let mut claims: BTreeMap<&str, &str> = BTreeMap::new();
    claims.insert(RELATIONSHIP_KEY, kind);
    claims.insert(FROM_KEY, from_id);
    claims.insert(TO_KEY, to_id);
    hash_claims(&claims)
}

/// Canonical id for a property pair.
pub fn property_id(key: &str, value: &str) -> String {
    let mut claims: BTreeMap<&str, &str> = BTreeMap::new();
    claims.insert(PROPERTY_KEY, key);
    claims.insert(PROPERTY_VALUE, value);
    hash_claims(&claims)
}
