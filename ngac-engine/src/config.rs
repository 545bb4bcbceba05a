//! Engine configuration.

use serde::Deserialize;

/// Default BFS depth bound, counted in edges from the seed.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Tunables for a [`PolicyEngine`](crate::PolicyEngine).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hard bound on subgraph expansion, in edges from the seed. Bounds
    /// worst-case fan-out on pathological graphs.
    pub max_depth: usize,

    /// Admit a direct subject→resource path that carries only assignment
    /// edges when no association-mediated path exists. Inherited from the
    /// reference algorithm; NGAC proper requires an association to grant
    /// any verb, so deployments wanting strict semantics turn this off.
    pub allow_pure_assignment_fallback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_pure_assignment_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_depth, 10);
        assert!(config.allow_pure_assignment_fallback);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: EngineConfig = serde_json::from_str(r#"{"max_depth": 4}"#).unwrap();
        assert_eq!(config.max_depth, 4);
        assert!(config.allow_pure_assignment_fallback);
    }
}
