//! Properties: immutable key-value pairs attached to entities.

use crate::id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A key-value pair with its own content-addressed id.
///
/// Properties are immutable: "updating" a property on an entity means
/// linking a different pair, not mutating this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Content-addressed id, a function of key and value
    pub id: String,
    pub key: String,
    pub value: String,
}

impl Property {
    /// Create a property pair, deriving its id.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        let id = id::property_id(&key, &value);
        Self { id, key, value }
    }
}

/// Expand a property map into addressable pairs.
pub fn properties_from_map(map: &BTreeMap<String, String>) -> Vec<Property> {
    map.iter()
        .map(|(key, value)| Property::new(key.clone(), value.clone()))
        .collect()
}

/// Collapse addressable pairs back into a map. Later pairs win on key
/// collision.
pub fn map_from_properties(properties: &[Property]) -> BTreeMap<String, String> {
    properties
        .iter()
        .map(|p| (p.key.clone(), p.value.clone()))
        .collect()
}
