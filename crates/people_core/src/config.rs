//! Environment-driven store configuration.
//!
//! # Responsibility
//! - Read the store connection string and logging settings from the
//!   process environment (after loading an optional `.env` file).
//! - Resolve the connection string into a concrete SQLite target.
//!
//! # Invariants
//! - `PEOPLE_DB_URI` is required; there is no implicit default store.
//! - `PEOPLE_LOG_DIR`, when set, must be an absolute path.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_URI_VAR: &str = "PEOPLE_DB_URI";
pub const LOG_LEVEL_VAR: &str = "PEOPLE_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "PEOPLE_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required variable is unset or blank.
    Missing(&'static str),
    /// Variable is set but cannot be used.
    Invalid { var: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(var) => write!(f, "missing required environment variable `{var}`"),
            Self::Invalid { var, reason } => write!(f, "invalid value for `{var}`: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Where the document store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Memory,
    File(PathBuf),
}

impl StoreTarget {
    /// Parses a connection string.
    ///
    /// Accepted forms: `:memory:`, `sqlite::memory:`, `sqlite://<path>`,
    /// `file:<path>`, or a bare filesystem path.
    pub fn parse(uri: &str) -> Result<Self, ConfigError> {
        let trimmed = uri.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Missing(DB_URI_VAR));
        }

        if matches!(trimmed, ":memory:" | "sqlite::memory:" | "sqlite://:memory:") {
            return Ok(Self::Memory);
        }

        let path = trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("file:"))
            .unwrap_or(trimmed);

        // Query parameters are not interpreted; refuse them instead of
        // opening a file literally named `people.db?mode=ro`.
        if path.contains('?') {
            return Err(ConfigError::Invalid {
                var: DB_URI_VAR,
                reason: format!("query parameters are not supported in `{trimmed}`"),
            });
        }
        if path.is_empty() {
            return Err(ConfigError::Invalid {
                var: DB_URI_VAR,
                reason: format!("no database path in `{trimmed}`"),
            });
        }

        Ok(Self::File(PathBuf::from(path)))
    }
}

/// Resolved configuration for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub target: StoreTarget,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Builds a config for an in-memory store with default logging.
    pub fn in_memory() -> Self {
        Self {
            target: StoreTarget::Memory,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }

    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = non_blank(lookup(DB_URI_VAR)).ok_or(ConfigError::Missing(DB_URI_VAR))?;
        let target = StoreTarget::parse(&uri)?;

        let log_level = non_blank(lookup(LOG_LEVEL_VAR))
            .unwrap_or_else(|| default_log_level().to_string());

        let log_dir = match non_blank(lookup(LOG_DIR_VAR)) {
            Some(dir) => {
                let path = PathBuf::from(dir.trim());
                if !path.is_absolute() {
                    return Err(ConfigError::Invalid {
                        var: LOG_DIR_VAR,
                        reason: format!("must be an absolute path, got `{}`", path.display()),
                    });
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            target,
            log_level,
            log_dir,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|item| !item.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, StoreTarget, DB_URI_VAR, LOG_DIR_VAR};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parse_accepts_memory_aliases() {
        for uri in [":memory:", "sqlite::memory:", " sqlite://:memory: "] {
            assert_eq!(StoreTarget::parse(uri).unwrap(), StoreTarget::Memory);
        }
    }

    #[test]
    fn parse_strips_known_schemes() {
        assert_eq!(
            StoreTarget::parse("sqlite:///var/data/people.db").unwrap(),
            StoreTarget::File(PathBuf::from("/var/data/people.db"))
        );
        assert_eq!(
            StoreTarget::parse("file:people.db").unwrap(),
            StoreTarget::File(PathBuf::from("people.db"))
        );
        assert_eq!(
            StoreTarget::parse("./people.db").unwrap(),
            StoreTarget::File(PathBuf::from("./people.db"))
        );
    }

    #[test]
    fn parse_rejects_query_parameters_and_empty_paths() {
        assert!(matches!(
            StoreTarget::parse("sqlite://people.db?mode=ro"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            StoreTarget::parse("sqlite://"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn from_lookup_requires_db_uri() {
        let err = StoreConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(DB_URI_VAR));

        let err = StoreConfig::from_lookup(lookup_from(&[(DB_URI_VAR, "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(DB_URI_VAR));
    }

    #[test]
    fn from_lookup_reads_optional_logging_settings() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (DB_URI_VAR, ":memory:"),
            ("PEOPLE_LOG_LEVEL", "warn"),
            (LOG_DIR_VAR, "/tmp/people-logs"),
        ]))
        .unwrap();

        assert_eq!(config.target, StoreTarget::Memory);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/people-logs")));
    }

    #[test]
    fn from_lookup_rejects_relative_log_dir() {
        let err = StoreConfig::from_lookup(lookup_from(&[
            (DB_URI_VAR, ":memory:"),
            (LOG_DIR_VAR, "logs"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == LOG_DIR_VAR));
    }

    #[test]
    fn from_lookup_defaults_log_level_by_build_mode() {
        let config = StoreConfig::from_lookup(lookup_from(&[(DB_URI_VAR, ":memory:")])).unwrap();
        assert_eq!(config.log_level, crate::logging::default_log_level());
        assert_eq!(config.log_dir, None);
    }
}
