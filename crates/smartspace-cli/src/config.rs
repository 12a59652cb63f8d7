//! Runtime configuration from the environment.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DATABASE_URL` | `postgres://localhost/smartspace` | Object store |
//! | `DATABASE_MAX_CONNECTIONS` | `5` | Pool size |
//! | `SMARTSPACE_DATA_DIR` | `$XDG_DATA_HOME/smartspace` or `~/.local/share/smartspace` | Data root; attachments live in `Attachments/` |
//! | `EXTRACTION_CMD_TIMEOUT_SECS` | `60` | Timeout per `pdftotext`/`pandoc` call |

use std::path::PathBuf;

use smartspace_core::defaults::EXTRACTION_CMD_TIMEOUT_SECS;
use smartspace_db::pool::DEFAULT_MAX_CONNECTIONS;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/smartspace";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub data_dir: PathBuf,
    pub cmd_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url =
            non_empty("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_connections = non_empty("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
            .max(1);

        let data_dir = non_empty("SMARTSPACE_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| non_empty("XDG_DATA_HOME").map(|d| PathBuf::from(d).join("smartspace")))
            .or_else(|| {
                non_empty("HOME").map(|h| PathBuf::from(h).join(".local/share/smartspace"))
            })
            .unwrap_or_else(|| PathBuf::from("smartspace-data"));

        let cmd_timeout_secs = non_empty("EXTRACTION_CMD_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(EXTRACTION_CMD_TIMEOUT_SECS);

        Self {
            database_url,
            max_connections,
            data_dir,
            cmd_timeout_secs,
        }
    }
}

/// Parses a boolean environment variable.
///
/// Recognizes "true", "1", "yes", "on" and "false", "0", "no", "off"
/// (case-insensitive). Anything else, or a missing variable, is `None`.
pub fn parse_bool_env(key: &str) -> Option<bool> {
    parse_bool(&std::env::var(key).ok()?)
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.data_dir, PathBuf::from("smartspace-data"));
        assert_eq!(config.cmd_timeout_secs, EXTRACTION_CMD_TIMEOUT_SECS);
    }

    #[test]
    fn test_explicit_values() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/spaces"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("SMARTSPACE_DATA_DIR", "/srv/smartspace"),
            ("EXTRACTION_CMD_TIMEOUT_SECS", "15"),
        ]);
        assert_eq!(config.database_url, "postgres://db/spaces");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.data_dir, PathBuf::from("/srv/smartspace"));
        assert_eq!(config.cmd_timeout_secs, 15);
    }

    #[test]
    fn test_data_dir_falls_back_to_xdg_then_home() {
        let xdg = config_from(&[("XDG_DATA_HOME", "/x"), ("HOME", "/home/u")]);
        assert_eq!(xdg.data_dir, PathBuf::from("/x/smartspace"));

        let home = config_from(&[("HOME", "/home/u")]);
        assert_eq!(
            home.data_dir,
            PathBuf::from("/home/u/.local/share/smartspace")
        );
    }

    #[test]
    fn test_invalid_numbers_use_defaults() {
        let config = config_from(&[
            ("DATABASE_MAX_CONNECTIONS", "lots"),
            ("EXTRACTION_CMD_TIMEOUT_SECS", "0"),
        ]);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.cmd_timeout_secs, EXTRACTION_CMD_TIMEOUT_SECS);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
