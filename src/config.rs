use std::path::PathBuf;

use crate::db::Database;

pub const DB_ENV: &str = "JOBTRACK_DB";
pub const LOG_ENV: &str = "JOBTRACK_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Resolves settings from the `--db` flag, the environment (a `.env`
    /// file is honored) and defaults, in that order.
    pub fn resolve(db_flag: Option<PathBuf>) -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(db_flag, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(db_flag: Option<PathBuf>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = db_flag
            .or_else(|| lookup(DB_ENV).filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .unwrap_or_else(Database::default_path);
        let log_filter = lookup(LOG_ENV)
            .or_else(|| lookup("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Self {
            db_path,
            log_filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn flag_beats_environment() {
        let config = Config::from_lookup(
            Some(PathBuf::from("/tmp/flag.db")),
            lookup(&[(DB_ENV, "/tmp/env.db")]),
        );
        assert_eq!(config.db_path, PathBuf::from("/tmp/flag.db"));
    }

    #[test]
    fn environment_beats_defaults() {
        let config = Config::from_lookup(
            None,
            lookup(&[(DB_ENV, "/tmp/env.db"), ("RUST_LOG", "debug")]),
        );
        assert_eq!(config.db_path, PathBuf::from("/tmp/env.db"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(None, lookup(&[(DB_ENV, "  ")]));
        assert_eq!(config.db_path, Database::default_path());
        assert_eq!(config.log_filter, "warn");
    }
}
