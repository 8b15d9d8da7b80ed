//! The `env-schema` plugin.
//!
//! Loads the prefixed environment, validates it with a [`Schema`] and serves
//! the result as the `virtual:env` module. Validation runs either when the
//! host configuration resolves ([`ValidateOn::Config`]) or on the first load
//! of the virtual module ([`ValidateOn::Load`]). Either way it runs at most
//! once per plugin instance.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::env::{DEFAULT_PREFIX, DotenvLoader, EnvLoader, filter_prefixed};
use crate::error::{Result, ValidationError};
use crate::plugin::module::{self, DEFAULT_MODULE_ID};
use crate::plugin::{Plugin, ResolvedConfig};
use crate::schema::{Outcome, Schema};

/// Plugin name reported to the host.
pub const PLUGIN_NAME: &str = "vite-plugin-env-schema";

// ============================================================================
// Options
// ============================================================================

/// When the environment is validated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ValidateOn {
    /// As soon as the host configuration resolves; failures abort startup.
    #[default]
    Config,
    /// On the first load of the virtual module.
    Load,
}

/// Plugin options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginOptions {
    /// Validation timing.
    #[serde(alias = "validateOn")]
    pub validate_on: ValidateOn,
    /// Only variables starting with this prefix reach the schema.
    pub prefix: String,
    /// Import specifier of the virtual module.
    #[serde(alias = "moduleId")]
    pub module_id: String,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            validate_on: ValidateOn::default(),
            prefix: DEFAULT_PREFIX.to_string(),
            module_id: DEFAULT_MODULE_ID.to_string(),
        }
    }
}

impl PluginOptions {
    /// Options with the given validation timing and defaults otherwise.
    #[must_use]
    pub fn validate_on(validate_on: ValidateOn) -> Self {
        Self {
            validate_on,
            ..Self::default()
        }
    }
}

// ============================================================================
// State
// ============================================================================

/// Observable validation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// Nothing validated yet.
    Uninitialized = 0,
    /// The schema call is in flight.
    Validating = 1,
    /// A configuration is cached.
    Validated = 2,
    /// Validation failed; the failure is replayed on every later request.
    Failed = 3,
}

impl Phase {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Validating,
            2 => Self::Validated,
            3 => Self::Failed,
            _ => Self::Uninitialized,
        }
    }
}

enum State {
    Uninitialized,
    Validated(Value),
    Failed(ValidationError),
}

/// Puts the phase back to `Uninitialized` if a validation future is dropped
/// before the schema answers.
struct InFlight<'a>(&'a AtomicU8);

impl<'a> InFlight<'a> {
    fn start(phase: &'a AtomicU8) -> Self {
        phase.store(Phase::Validating as u8, Ordering::Release);
        Self(phase)
    }

    fn finish(self, outcome: Phase) {
        self.0.store(outcome as u8, Ordering::Release);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let _ = self.0.compare_exchange(
            Phase::Validating as u8,
            Phase::Uninitialized as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

// ============================================================================
// Plugin
// ============================================================================

/// Validates the environment once and serves it as a virtual module.
pub struct EnvSchemaPlugin {
    schema: Arc<dyn Schema>,
    loader: Arc<dyn EnvLoader>,
    options: PluginOptions,
    resolved_id: String,
    host: OnceLock<ResolvedConfig>,
    state: Mutex<State>,
    phase: AtomicU8,
}

/// Creates the plugin for `schema`, reading `.env` files and the process
/// environment.
#[must_use]
pub fn env_schema(schema: impl Schema + 'static, options: PluginOptions) -> EnvSchemaPlugin {
    EnvSchemaPlugin::new(Arc::new(schema), options)
}

impl EnvSchemaPlugin {
    /// Creates the plugin with the default [`DotenvLoader`].
    #[must_use]
    pub fn new(schema: Arc<dyn Schema>, options: PluginOptions) -> Self {
        let resolved_id = module::resolved_id(&options.module_id);
        Self {
            schema,
            loader: Arc::new(DotenvLoader::new()),
            options,
            resolved_id,
            host: OnceLock::new(),
            state: Mutex::new(State::Uninitialized),
            phase: AtomicU8::new(Phase::Uninitialized as u8),
        }
    }

    /// Replaces the environment source.
    #[must_use]
    pub fn with_loader(mut self, loader: impl EnvLoader + 'static) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    /// Options this plugin was created with.
    #[must_use]
    pub const fn options(&self) -> &PluginOptions {
        &self.options
    }

    /// Canonical id of the virtual module.
    #[must_use]
    pub fn module_id(&self) -> &str {
        &self.resolved_id
    }

    /// Current phase; [`Phase::Validating`] exactly while the schema call
    /// is pending. Never waits on the state lock.
    #[must_use]
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// The cached configuration, if validation has succeeded.
    pub async fn validated(&self) -> Option<Value> {
        match &*self.state.lock().await {
            State::Validated(value) => Some(value.clone()),
            State::Uninitialized | State::Failed(_) => None,
        }
    }

    /// Runs the pipeline and records the outcome. Caller holds the lock.
    async fn validate_into(&self, state: &mut State, config: &ResolvedConfig) -> Result<()> {
        let prefix = &self.options.prefix;
        let raw = self
            .loader
            .load_env(&config.mode, &config.env_dir, prefix)?;
        let input = filter_prefixed(&raw, prefix);
        tracing::debug!(
            mode = %config.mode,
            prefix = %prefix,
            vars = input.len(),
            vendor = self.schema.vendor(),
            "validating environment"
        );

        let in_flight = InFlight::start(&self.phase);
        match self.schema.validate(&input).await {
            Outcome::Success(value) => {
                tracing::info!(mode = %config.mode, "environment validated");
                *state = State::Validated(value);
                in_flight.finish(Phase::Validated);
                Ok(())
            }
            Outcome::Failure(issues) => {
                tracing::debug!(issues = issues.len(), "environment rejected");
                let err = ValidationError::from_issues(&issues);
                *state = State::Failed(err.clone());
                in_flight.finish(Phase::Failed);
                Err(err.into())
            }
        }
    }
}

impl fmt::Debug for EnvSchemaPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSchemaPlugin")
            .field("options", &self.options)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Plugin for EnvSchemaPlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    async fn config_resolved(&self, config: &ResolvedConfig) -> Result<()> {
        if self.host.set(config.clone()).is_err() {
            tracing::warn!(
                mode = %config.mode,
                "configuration resolved more than once, keeping the first"
            );
        }

        if self.options.validate_on != ValidateOn::Config {
            return Ok(());
        }

        let config = self.host.get().unwrap_or(config);
        let mut state = self.state.lock().await;
        match &*state {
            State::Uninitialized => self.validate_into(&mut state, config).await,
            State::Validated(_) => Ok(()),
            State::Failed(err) => Err(err.clone().into()),
        }
    }

    fn resolve_id(&self, specifier: &str) -> Option<String> {
        (specifier == self.options.module_id).then(|| self.resolved_id.clone())
    }

    async fn load(&self, id: &str) -> Result<Option<String>> {
        if id != self.resolved_id {
            return Ok(None);
        }

        let mut state = self.state.lock().await;
        if matches!(*state, State::Uninitialized)
            && self.options.validate_on == ValidateOn::Load
            && let Some(config) = self.host.get()
        {
            self.validate_into(&mut state, config).await?;
        }

        let source = match &*state {
            State::Validated(value) => module::render(Some(value))?,
            State::Failed(err) => return Err(err.clone().into()),
            State::Uninitialized => {
                tracing::debug!(id = %self.options.module_id, "virtual module loaded before validation");
                module::render(None)?
            }
        };
        Ok(Some(source))
    }
}
