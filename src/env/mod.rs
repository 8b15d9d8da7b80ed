//! Raw environment collection and the prefix allow-list
//!
//! An [`EnvLoader`] supplies the raw map for a build mode; the pipeline then
//! keeps only keys carrying the prefix and strips it with
//! [`filter_prefixed`]. Keys without the prefix are never seen by a schema.

pub mod dotenv;

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::EnvError;

pub use dotenv::DotenvLoader;

/// Prefix selecting variables exposed to the schema by default.
pub const DEFAULT_PREFIX: &str = "VITE_";

/// Variable name to raw string value.
pub type EnvMap = BTreeMap<String, String>;

/// Supplies the raw environment for a build mode.
pub trait EnvLoader: Send + Sync {
    /// Loads variables for `mode` from `dir`, keeping those starting with
    /// `prefix` (prefix still attached).
    ///
    /// # Errors
    ///
    /// Returns an [`EnvError`] if the mode or prefix is unusable or a source
    /// cannot be parsed.
    fn load_env(&self, mode: &str, dir: &Path, prefix: &str) -> Result<EnvMap, EnvError>;
}

/// Keeps entries whose key starts with `prefix` and strips the prefix.
#[must_use]
pub fn filter_prefixed(raw: &EnvMap, prefix: &str) -> EnvMap {
    raw.iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(prefix)
                .map(|stripped| (stripped.to_string(), value.clone()))
        })
        .collect()
}

/// A fixed set of variables, independent of mode and directory.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    vars: EnvMap,
}

impl StaticEnv {
    /// Creates a loader serving `vars`.
    #[must_use]
    pub const fn new(vars: EnvMap) -> Self {
        Self { vars }
    }
}

impl<K, V> FromIterator<(K, V)> for StaticEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl EnvLoader for StaticEnv {
    fn load_env(&self, _mode: &str, _dir: &Path, prefix: &str) -> Result<EnvMap, EnvError> {
        if prefix.is_empty() {
            return Err(EnvError::EmptyPrefix);
        }
        Ok(self
            .vars
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn filter_strips_prefix_and_drops_others() {
        let input = raw(&[
            ("VITE_API_URL", "https://x.com"),
            ("VITE_PORT", "3000"),
            ("OTHER", "y"),
        ]);
        assert_eq!(
            filter_prefixed(&input, DEFAULT_PREFIX),
            raw(&[("API_URL", "https://x.com"), ("PORT", "3000")])
        );
    }

    #[test]
    fn filter_only_strips_leading_prefix() {
        let input = raw(&[("VITE_NESTED_VITE_KEY", "1"), ("MY_VITE_KEY", "2")]);
        assert_eq!(
            filter_prefixed(&input, DEFAULT_PREFIX),
            raw(&[("NESTED_VITE_KEY", "1")])
        );
    }

    #[test]
    fn filter_keeps_bare_prefix_as_empty_key() {
        let input = raw(&[("VITE_", "x")]);
        assert_eq!(filter_prefixed(&input, DEFAULT_PREFIX), raw(&[("", "x")]));
    }

    #[test]
    fn static_env_ignores_mode_and_dir() {
        let loader: StaticEnv = [("VITE_A", "1"), ("B", "2")].into_iter().collect();
        let env = loader
            .load_env("production", Path::new("/nowhere"), DEFAULT_PREFIX)
            .unwrap();
        assert_eq!(env, raw(&[("VITE_A", "1")]));
    }

    #[test]
    fn static_env_rejects_empty_prefix() {
        let loader = StaticEnv::default();
        assert!(matches!(
            loader.load_env("development", Path::new("."), ""),
            Err(EnvError::EmptyPrefix)
        ));
    }
}
