use std::collections::HashMap;
use std::sync::Mutex;

use lazy_static::lazy_static;

use crate::error::SqlConduitError;
use crate::types::Driver;

lazy_static! {
    static ref GLOBAL_REGISTRY: ConnectionRegistry = ConnectionRegistry::new();
}

/// Process-wide registry of live connection identities.
///
/// Created on first use and lives for the whole process. An entry is added
/// when a connection opens successfully and removed when it closes
/// (including close-on-drop). This map is the only shared mutable state
/// crossing connection instances; every access goes through the mutex
/// because opens and closes on different threads are expected even though
/// a single connection is single-threaded.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: Mutex<HashMap<String, Driver>>,
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The registry shared by all connections in this process.
    #[must_use]
    pub fn global() -> &'static ConnectionRegistry {
        &GLOBAL_REGISTRY
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Driver>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            // Registry state stays consistent across a panic in another
            // thread; recover the map rather than poisoning every caller.
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Claim an identity for a connection about to open.
    ///
    /// # Errors
    ///
    /// Returns `SqlConduitError::ConnectionError` if the identity is already
    /// registered; identities are unique at any instant.
    pub fn register(&self, name: &str, driver: Driver) -> Result<(), SqlConduitError> {
        let mut entries = self.lock();
        if entries.contains_key(name) {
            return Err(SqlConduitError::ConnectionError(format!(
                "Connection name '{name}' is already registered"
            )));
        }
        entries.insert(name.to_string(), driver);
        tracing::debug!(name, %driver, "registered connection");
        Ok(())
    }

    /// Release an identity. Idempotent; unknown names are ignored, so it is
    /// safe to call for a connection that never opened.
    pub fn deregister(&self, name: &str) {
        if self.lock().remove(name).is_some() {
            tracing::debug!(name, "deregistered connection");
        }
    }

    /// Whether an identity is currently registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Driver registered under an identity, if any.
    #[must_use]
    pub fn driver_of(&self, name: &str) -> Option<Driver> {
        self.lock().get(name).copied()
    }

    /// Number of live registered connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
