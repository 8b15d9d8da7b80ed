//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod check;
pub mod completions;
pub mod render;
pub mod version;

use std::sync::Arc;

use crate::cli::args::{Cli, Commands, EnvArgs};
use crate::config::SchemaFileLoader;
use crate::error::EnvSchemaError;
use crate::host::PluginContainer;
use crate::plugin::{EnvSchemaPlugin, ResolvedConfig};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), EnvSchemaError> {
    match cli.command {
        Commands::Check(args) => check::run(&args).await,
        Commands::Render(args) => render::run(&args).await,
        Commands::Completions(args) => completions::run(&args).await,
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// A host with the env-schema plugin registered and configured.
pub struct Session {
    /// The registered plugin.
    pub plugin: Arc<EnvSchemaPlugin>,
    /// Host driving the plugin.
    pub host: PluginContainer,
}

impl Session {
    /// Loads the schema file, registers the plugin and resolves the host
    /// configuration. In `config` mode this is where validation happens.
    ///
    /// # Errors
    ///
    /// Returns a config error for a bad schema file, or the plugin's error
    /// from configuration resolution.
    pub async fn start(args: &EnvArgs) -> Result<Self, EnvSchemaError> {
        tracing::info!(schema = %args.schema.display(), "loading schema");
        let loaded = SchemaFileLoader::default().load(&args.schema)?;
        for warning in &loaded.warnings {
            tracing::warn!(
                location = warning.location.as_deref().unwrap_or("<unknown>"),
                "{}",
                warning.message
            );
        }

        let mut options = loaded.file.options;
        if let Some(validate_on) = args.validate_on {
            options.validate_on = validate_on;
        }

        let plugin = Arc::new(EnvSchemaPlugin::new(Arc::new(loaded.schema), options));
        let mut host = PluginContainer::new();
        host.register(plugin.clone());

        let root = std::env::current_dir()?;
        let config = ResolvedConfig::new(args.mode.clone(), root).with_env_dir(&args.dir);
        host.resolve_config(config).await?;

        Ok(Self { plugin, host })
    }

    /// Imports the virtual module the way application code would.
    ///
    /// # Errors
    ///
    /// Returns the plugin's validation error in `load` mode, or a host error
    /// if the module cannot be resolved.
    pub async fn import(&self) -> Result<String, EnvSchemaError> {
        self.host.import(&self.plugin.options().module_id).await
    }
}
