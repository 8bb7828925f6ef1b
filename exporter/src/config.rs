use crate::errors::{Error, Result};

use log::LevelFilter;
use std::env;
use std::path::PathBuf;

const TOKEN_VAR: &str = "DISCORD_TOKEN";
const EXPORT_ROOT_VAR: &str = "EXPORT_ROOT";
const LOG_LEVEL_VAR: &str = "EXPORT_LOG";
const DEFAULT_EXPORT_ROOT: &str = "exports";

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// Holds one `{name}.db3` file per database and one `{guildID}/`
    /// directory of downloaded assets per guild.
    pub export_root: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        let token = env::var(TOKEN_VAR)
            .map_err(|_| Error::ConstStr("Expected a DISCORD_TOKEN in the environment"))?;
        let export_root = env::var(EXPORT_ROOT_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_EXPORT_ROOT));

        Ok(Config { token, export_root })
    }

    #[inline]
    pub fn database_path(&self, name: &str) -> PathBuf {
        self.export_root.join(format!("{name}.db3"))
    }

    #[inline]
    pub fn guild_dir(&self, guild_id: u64) -> PathBuf {
        self.export_root.join(guild_id.to_string())
    }
}

/// Database names end up as file names, keep them to a safe alphabet.
pub fn valid_database_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn log_level() -> LevelFilter {
    env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_database_name() {
        assert!(valid_database_name("my_server-2021"));
        assert!(!valid_database_name(""));
        assert!(!valid_database_name("../escape"));
        assert!(!valid_database_name("with space"));
    }

    #[test]
    fn test_layout() {
        let config = Config {
            token: String::new(),
            export_root: PathBuf::from("out"),
        };
        assert_eq!(config.database_path("snap"), PathBuf::from("out/snap.db3"));
        assert_eq!(config.guild_dir(42), PathBuf::from("out/42"));
    }
}
