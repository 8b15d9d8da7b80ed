//! Build-host plugin interface
//!
//! A host drives plugins through three hooks, in this order:
//!
//! 1. [`Plugin::config_resolved`] once the host configuration is final
//! 2. [`Plugin::resolve_id`] for every import specifier, until a plugin
//!    claims it
//! 3. [`Plugin::load`] for every resolved id, until a plugin produces source
//!
//! The plugin never schedules work on its own; timing belongs to the host.

pub mod env_schema;
pub mod module;

use std::path::PathBuf;

use crate::error::Result;

pub use env_schema::{EnvSchemaPlugin, Phase, PluginOptions, ValidateOn, env_schema};

/// Host configuration as seen by plugins after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Build mode (`development`, `production`, ...).
    pub mode: String,
    /// Project root.
    pub root: PathBuf,
    /// Directory holding `.env` files.
    pub env_dir: PathBuf,
}

impl ResolvedConfig {
    /// Creates a configuration whose env directory is the project root.
    #[must_use]
    pub fn new(mode: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            mode: mode.into(),
            env_dir: root.clone(),
            root,
        }
    }

    /// Reads `.env` files from `env_dir` instead of the root.
    #[must_use]
    pub fn with_env_dir(mut self, env_dir: impl Into<PathBuf>) -> Self {
        self.env_dir = env_dir.into();
        self
    }
}

/// Lifecycle hooks a build host invokes on each registered plugin.
#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
    /// Stable plugin name, used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Called once when the host configuration is final.
    ///
    /// # Errors
    ///
    /// An error aborts host startup.
    async fn config_resolved(&self, _config: &ResolvedConfig) -> Result<()> {
        Ok(())
    }

    /// Maps an import specifier to a canonical id, or `None` if the
    /// specifier belongs to someone else.
    fn resolve_id(&self, _specifier: &str) -> Option<String> {
        None
    }

    /// Produces module source for a canonical id, or `None` if the id
    /// belongs to someone else.
    ///
    /// # Errors
    ///
    /// An error aborts the module load.
    async fn load(&self, _id: &str) -> Result<Option<String>> {
        Ok(None)
    }
}
