//! Dotenv-file loader following the bundler convention.
//!
//! For a mode `M` the files `.env`, `.env.local`, `.env.M`, `.env.M.local`
//! are read in that order, later files overriding earlier ones. Prefixed
//! variables already present in the process environment win over all files.

use std::path::{Path, PathBuf};

use crate::env::{EnvLoader, EnvMap};
use crate::error::EnvError;

/// Mode name that would collide with the `.local` file suffix.
const RESERVED_MODE: &str = "local";

/// Loads `.env` files from a directory and overlays the process environment.
#[derive(Debug, Clone, Default)]
pub struct DotenvLoader {
    process_env: Option<EnvMap>,
}

impl DotenvLoader {
    /// Creates a loader that overlays the process environment. Entries that
    /// are not valid UTF-8 are skipped.
    #[must_use]
    pub const fn new() -> Self {
        Self { process_env: None }
    }

    /// Uses `vars` in place of the real process environment.
    #[must_use]
    pub fn with_process_env(mut self, vars: EnvMap) -> Self {
        self.process_env = Some(vars);
        self
    }

    /// Dotenv file names considered for `mode`, lowest precedence first.
    #[must_use]
    pub fn candidate_files(mode: &str) -> [String; 4] {
        [
            ".env".to_string(),
            ".env.local".to_string(),
            format!(".env.{mode}"),
            format!(".env.{mode}.local"),
        ]
    }

    fn process_vars(&self) -> EnvMap {
        self.process_env.clone().unwrap_or_else(|| {
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect()
        })
    }
}

impl EnvLoader for DotenvLoader {
    fn load_env(&self, mode: &str, dir: &Path, prefix: &str) -> Result<EnvMap, EnvError> {
        if mode == RESERVED_MODE {
            return Err(EnvError::ReservedMode(mode.to_string()));
        }
        if prefix.is_empty() {
            return Err(EnvError::EmptyPrefix);
        }

        let mut env = EnvMap::new();
        for name in Self::candidate_files(mode) {
            let path = dir.join(&name);
            if !path.is_file() {
                continue;
            }
            let parsed = read_dotenv(&path)?;
            tracing::debug!(file = %path.display(), vars = parsed.len(), "read dotenv file");
            env.extend(parsed);
        }

        env.retain(|key, _| key.starts_with(prefix));

        for (key, value) in self.process_vars() {
            if key.starts_with(prefix) {
                env.insert(key, value);
            }
        }

        Ok(env)
    }
}

fn read_dotenv(path: &Path) -> Result<EnvMap, EnvError> {
    let parse_error = |path: PathBuf, err: &dotenvy::Error| EnvError::Parse {
        path,
        message: err.to_string(),
    };

    let iter = dotenvy::from_path_iter(path).map_err(|e| parse_error(path.to_path_buf(), &e))?;
    iter.map(|item| item.map_err(|e| parse_error(path.to_path_buf(), &e)))
        .collect()
}
