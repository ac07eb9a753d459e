//! Exchange identifier to connector lookup.

use clibra_types::{ClibraError, normalize_exchange};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{BybitConnector, Connector, DownloadClient};

/// Builds a connector around a shared HTTP client.
pub type ConnectorFactory = Arc<dyn Fn(DownloadClient) -> Arc<dyn Connector> + Send + Sync>;

/// Maps exchange identifiers to connector constructors.
///
/// Lookups are case-insensitive.
#[derive(Clone)]
pub struct ConnectorRegistry {
    client: DownloadClient,
    factories: BTreeMap<String, ConnectorFactory>,
}

impl ConnectorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new(client: DownloadClient) -> Self {
        Self {
            client,
            factories: BTreeMap::new(),
        }
    }

    /// Creates a registry with every built-in connector.
    #[must_use]
    pub fn with_defaults(client: DownloadClient) -> Self {
        let mut registry = Self::new(client);
        registry.register(BybitConnector::EXCHANGE, |client| {
            Arc::new(BybitConnector::new(client))
        });
        registry
    }

    /// Registers (or replaces) the constructor for an exchange.
    pub fn register<F>(&mut self, exchange: &str, factory: F)
    where
        F: Fn(DownloadClient) -> Arc<dyn Connector> + Send + Sync + 'static,
    {
        self.factories
            .insert(normalize_exchange(exchange), Arc::new(factory));
    }

    /// Returns the registered exchange identifiers, sorted.
    pub fn exchanges(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Checks that a connector is registered for the exchange.
    ///
    /// Every operation naming an exchange runs this before touching the
    /// store, whether or not it goes on to fetch.
    ///
    /// # Errors
    ///
    /// Returns [`ClibraError::UnsupportedExchange`] for unknown identifiers.
    pub fn ensure_supported(&self, exchange: &str) -> Result<(), ClibraError> {
        self.factory(exchange).map(|_| ())
    }

    /// Builds the connector for an exchange.
    ///
    /// # Errors
    ///
    /// Returns [`ClibraError::UnsupportedExchange`] for unknown identifiers.
    pub fn connector(&self, exchange: &str) -> Result<Arc<dyn Connector>, ClibraError> {
        self.factory(exchange).map(|factory| factory(self.client.clone()))
    }

    fn factory(&self, exchange: &str) -> Result<&ConnectorFactory, ClibraError> {
        self.factories
            .get(&normalize_exchange(exchange))
            .ok_or_else(|| ClibraError::UnsupportedExchange(exchange.to_string()))
    }
}

impl fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("exchanges", &self.factories.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
