use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use depsentry_core::VulncheckEcosystemConfig;
use tracing::info;

use crate::client::RegistryClient;
use crate::error::{RegistryError, Result};
use crate::go::GoRegistryClient;
use crate::npm::NpmRegistryClient;
use crate::pypi::PyPiRegistryClient;

/// Process-wide, at-most-once-per-ecosystem registry client cache (§4.B,
/// §5 "Shared resources"). Construction happens under the lock so a client
/// is never built twice for the same key, even under concurrent access.
#[derive(Default)]
pub struct RegistryCache {
    clients: Mutex<HashMap<String, Arc<dyn RegistryClient>>>,
}

impl RegistryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&self, config: &VulncheckEcosystemConfig) -> Result<Arc<dyn RegistryClient>> {
        let mut clients = self.clients.lock().expect("registry cache mutex poisoned");
        if let Some(existing) = clients.get(&config.name) {
            return Ok(existing.clone());
        }

        let client: Arc<dyn RegistryClient> = match config.name.as_str() {
            "npm" => Arc::new(NpmRegistryClient::new(config.package_repository.url.clone())),
            "go" => Arc::new(GoRegistryClient::new(
                config.package_repository.url.clone(),
                config.sum_repository.as_ref().map(|s| s.url.clone()),
            )),
            "pypi" => Arc::new(PyPiRegistryClient::new(config.package_repository.url.clone())),
            other => return Err(RegistryError::UnknownEcosystem(other.to_string())),
        };

        info!(ecosystem = %config.name, "constructed registry client");
        clients.insert(config.name.clone(), client.clone());
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc as StdArc;
    use std::thread;

    #[test]
    fn get_or_create_returns_same_instance_for_same_ecosystem() {
        let cache = RegistryCache::new();
        let config = VulncheckEcosystemConfig::default_npm();

        let a = cache.get_or_create(&config).unwrap();
        let b = cache.get_or_create(&config).unwrap();
        assert!(StdArc::ptr_eq(&a, &b));
    }

    #[test]
    fn concurrent_get_or_create_is_at_most_once() {
        let cache = StdArc::new(RegistryCache::new());
        let config = VulncheckEcosystemConfig::default_go();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let config = config.clone();
                thread::spawn(move || cache.get_or_create(&config).unwrap())
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let first = &results[0];
        for r in &results[1..] {
            assert!(StdArc::ptr_eq(first, r));
        }
    }

    #[test]
    fn unknown_ecosystem_errors() {
        let cache = RegistryCache::new();
        let config = VulncheckEcosystemConfig {
            name: "cargo".to_string(),
            ..VulncheckEcosystemConfig::default_npm()
        };
        assert!(cache.get_or_create(&config).is_err());
    }
}
