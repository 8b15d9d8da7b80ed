//! Minimal plugin host.
//!
//! Drives registered [`Plugin`]s through the lifecycle the way a bundler
//! does: configuration resolution first, then id resolution and loading
//! per import, with the first plugin to answer winning.

use std::sync::Arc;

use crate::error::{HostError, Result};
use crate::plugin::{Plugin, ResolvedConfig};

/// Ordered set of plugins sharing one host configuration.
#[derive(Default)]
pub struct PluginContainer {
    plugins: Vec<Arc<dyn Plugin>>,
    config: Option<ResolvedConfig>,
}

impl PluginContainer {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin after those already present.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> &mut Self {
        self.plugins.push(plugin);
        self
    }

    /// Names of registered plugins, in order.
    #[must_use]
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// The configuration passed to [`Self::resolve_config`], if any.
    #[must_use]
    pub const fn config(&self) -> Option<&ResolvedConfig> {
        self.config.as_ref()
    }

    /// Notifies every plugin that the configuration is final.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first plugin error.
    pub async fn resolve_config(&mut self, config: ResolvedConfig) -> Result<()> {
        for plugin in &self.plugins {
            tracing::debug!(plugin = plugin.name(), mode = %config.mode, "config resolved");
            plugin.config_resolved(&config).await?;
        }
        self.config = Some(config);
        Ok(())
    }

    /// Asks plugins, in order, to claim `specifier`.
    #[must_use]
    pub fn resolve_id(&self, specifier: &str) -> Option<String> {
        self.plugins.iter().find_map(|plugin| {
            let id = plugin.resolve_id(specifier)?;
            tracing::trace!(plugin = plugin.name(), specifier, "resolved");
            Some(id)
        })
    }

    /// Asks plugins, in order, for the source of `id`.
    ///
    /// # Errors
    ///
    /// Returns the first plugin error.
    pub async fn load(&self, id: &str) -> Result<Option<String>> {
        for plugin in &self.plugins {
            if let Some(source) = plugin.load(id).await? {
                tracing::trace!(plugin = plugin.name(), bytes = source.len(), "loaded");
                return Ok(Some(source));
            }
        }
        Ok(None)
    }

    /// Resolves and loads `specifier`, as an `import` statement would.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Unresolved`] when no plugin claims the specifier,
    /// [`HostError::NotLoaded`] when none produces its source, or the first
    /// plugin error.
    pub async fn import(&self, specifier: &str) -> Result<String> {
        let id = self
            .resolve_id(specifier)
            .ok_or_else(|| HostError::Unresolved(specifier.to_string()))?;
        self.load(&id)
            .await?
            .ok_or_else(|| HostError::NotLoaded(specifier.to_string()).into())
    }
}

impl std::fmt::Debug for PluginContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContainer")
            .field("plugins", &self.plugin_names())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnvSchemaError;

    struct Named {
        name: &'static str,
        claims: &'static str,
        source: Option<&'static str>,
    }

    #[async_trait::async_trait]
    impl Plugin for Named {
        fn name(&self) -> &'static str {
            self.name
        }

        fn resolve_id(&self, specifier: &str) -> Option<String> {
            (specifier == self.claims).then(|| format!("\0{specifier}"))
        }

        async fn load(&self, id: &str) -> Result<Option<String>> {
            Ok(self
                .source
                .filter(|_| id == format!("\0{}", self.claims))
                .map(str::to_string))
        }
    }

    fn container(plugins: Vec<Named>) -> PluginContainer {
        let mut container = PluginContainer::new();
        for plugin in plugins {
            container.register(Arc::new(plugin));
        }
        container
    }

    #[tokio::test]
    async fn first_plugin_wins() {
        let container = container(vec![
            Named {
                name: "a",
                claims: "x",
                source: Some("from a"),
            },
            Named {
                name: "b",
                claims: "x",
                source: Some("from b"),
            },
        ]);
        assert_eq!(container.plugin_names(), vec!["a", "b"]);
        assert_eq!(container.import("x").await.unwrap(), "from a");
    }

    #[tokio::test]
    async fn unresolved_import() {
        let container = container(vec![]);
        let err = container.import("virtual:env").await.unwrap_err();
        assert!(matches!(err, EnvSchemaError::Host(HostError::Unresolved(_))));
    }

    #[tokio::test]
    async fn resolved_but_not_loaded() {
        let container = container(vec![Named {
            name: "a",
            claims: "x",
            source: None,
        }]);
        let err = container.import("x").await.unwrap_err();
        assert!(matches!(err, EnvSchemaError::Host(HostError::NotLoaded(_))));
    }

    #[tokio::test]
    async fn default_hooks_are_inert() {
        let mut container = container(vec![Named {
            name: "a",
            claims: "x",
            source: None,
        }]);
        container
            .resolve_config(ResolvedConfig::new("test", "."))
            .await
            .unwrap();
        assert_eq!(container.config().map(|c| c.mode.as_str()), Some("test"));
    }
}
