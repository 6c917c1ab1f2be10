//! Init command implementation

use anyhow::{bail, Result};
use std::path::Path;

use myfaith::config::Config;

/// Default configuration content for myfaith init
pub const DEFAULT_CONFIG: &str = r#"# My Faith configuration
# ======================

# SQLite database location (default: ~/.myfaith/myfaith.db)
# database_path = "/path/to/myfaith.db"

# ============================================================================
# ENGAGEMENT - reaction toggles
# ============================================================================
#
# Reactions flip locally first and are then written to the database.
#   rollback_on_failure - undo the local flip if the write fails (default: false,
#                         the flip is kept and reported as pending)

[engagement]
rollback_on_failure = false

# ============================================================================
# FEED
# ============================================================================

[feed]
page_size = 50
"#;

/// Write a default config file.
///
/// With `db`, the chosen database path is recorded in the new config.
pub fn init_command(config_path: Option<&Path>, db: Option<&Path>, force: bool) -> Result<()> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    match db {
        Some(db) => {
            let config = Config {
                database_path: Some(db.to_path_buf()),
                ..Config::default()
            };
            config.save_to_file(&config_path)?;
        }
        None => {
            if let Some(parent) = config_path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&config_path, DEFAULT_CONFIG)?;
        }
    }
    println!("Created: {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_records_database_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let db_path = dir.path().join("data").join("faith.db");

        init_command(Some(&config_path), Some(&db_path), false).unwrap();
        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.database_path(), db_path);
        assert_eq!(config.feed, Config::default().feed);

        assert!(init_command(Some(&config_path), None, false).is_err());
        init_command(Some(&config_path), None, true).unwrap();
        assert_eq!(Config::from_file(&config_path).unwrap(), Config::default());
    }
}
