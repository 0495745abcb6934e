use anyhow::Result;
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppConfig;

const APP_NAME: &str = "FepReleaseManager";
const CONFIG_FILE: &str = "config.json";
const LEGACY_INI_FILE: &str = "config.ini";
const LEGACY_FOLDER_KEY: &str = "last_folder";

/// Overrides the config directory, e.g. for a portable install.
pub const CONFIG_DIR_ENV: &str = "FEP_RELEASE_MANAGER_CONFIG_DIR";

/// Returns the configuration directory: the explicit override, then
/// `FEP_RELEASE_MANAGER_CONFIG_DIR`, then the platform default.
pub fn get_config_directory(override_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = override_dir {
        return Some(dir.to_path_buf());
    }
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "fepreleasemanager", APP_NAME)
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Returns the full path to the configuration file.
pub fn get_config_file_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    get_config_directory(override_dir).map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration.
///
/// A missing file yields defaults, seeded from a legacy `config.ini` next to
/// the executable when one exists. A corrupt file logs a warning and falls
/// back to defaults.
pub fn load_config(override_dir: Option<&Path>) -> Result<AppConfig> {
    let config_path = get_config_file_path(override_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    if !config_path.exists() {
        let mut config = AppConfig::default();
        if let Some(folder) = legacy_ini_path().and_then(|p| read_legacy_last_folder(&p)) {
            tracing::info!("Migrated last folder {:?} from legacy config.ini", folder);
            config.last_folder = Some(folder);
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", config_path);
        }
        return Ok(config);
    }

    let config_content = fs::read_to_string(&config_path)?;
    match serde_json::from_str::<AppConfig>(&config_content) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", config_path);
            Ok(config)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse config file at {:?}: {}. Falling back to default config.",
                config_path,
                e
            );
            Ok(AppConfig::default())
        }
    }
}

/// Saves the configuration, creating the directory if needed.
pub fn save_config(config: &AppConfig, override_dir: Option<&Path>) -> Result<()> {
    let config_dir = get_config_directory(override_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
        tracing::info!("Created config directory: {:?}", config_dir);
    }

    let config_path = config_dir.join(CONFIG_FILE);
    let config_json = serde_json::to_string_pretty(config)?;
    fs::write(&config_path, config_json)?;
    tracing::info!("Saved config to {:?}", config_path);

    Ok(())
}

fn legacy_ini_path() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    Some(exe.parent()?.join(LEGACY_INI_FILE))
}

/// Reads `last_folder=` from an INI file, ignoring sections.
pub fn read_legacy_last_folder(ini_path: &Path) -> Option<PathBuf> {
    let content = fs::read_to_string(ini_path).ok()?;
    content.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        if key.trim() != LEGACY_FOLDER_KEY {
            return None;
        }
        let value = value.trim().trim_matches('"');
        let folder = PathBuf::from(value);
        (!value.is_empty() && folder.is_dir()).then_some(folder)
    })
}

// Platform-specific configuration paths for reference:
// macOS:   ~/Library/Application Support/com.fepreleasemanager.FepReleaseManager/
// Linux:   ~/.config/fepreleasemanager/
// Windows: %APPDATA%/fepreleasemanager/FepReleaseManager/config/

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_save_then_load_with_override_dir() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            last_folder: Some(dir.path().to_path_buf()),
            preview_line_limit: 5,
            ..Default::default()
        };

        save_config(&config, Some(dir.path())).unwrap();
        let loaded = load_config(Some(dir.path())).unwrap();

        assert_eq!(loaded, config);
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_corrupt_config_falls_back_to_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();

        assert_eq!(load_config(Some(dir.path())).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_config_fills_missing_fields() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "batch_mode_enabled": false }"#,
        )
        .unwrap();

        let loaded = load_config(Some(dir.path())).unwrap();
        assert!(!loaded.batch_mode_enabled);
        assert_eq!(loaded.preview_line_limit, 50);
    }

    #[test]
    #[serial]
    fn test_env_var_overrides_platform_dir() {
        let dir = tempdir().unwrap();
        env::set_var(CONFIG_DIR_ENV, dir.path());
        let resolved = get_config_directory(None);
        env::remove_var(CONFIG_DIR_ENV);

        assert_eq!(resolved, Some(dir.path().to_path_buf()));
    }

    #[test]
    #[serial]
    fn test_explicit_dir_wins_over_env_var() {
        let env_dir = tempdir().unwrap();
        let explicit = tempdir().unwrap();
        env::set_var(CONFIG_DIR_ENV, env_dir.path());
        let resolved = get_config_directory(Some(explicit.path()));
        env::remove_var(CONFIG_DIR_ENV);

        assert_eq!(resolved, Some(explicit.path().to_path_buf()));
    }

    #[test]
    fn test_read_legacy_last_folder() {
        let dir = tempdir().unwrap();
        let ini = dir.path().join(LEGACY_INI_FILE);
        fs::write(
            &ini,
            format!("[General]\nlast_folder={}\n", dir.path().display()),
        )
        .unwrap();
        assert_eq!(read_legacy_last_folder(&ini), Some(dir.path().to_path_buf()));

        fs::write(&ini, "[General]\nlast_folder=/definitely/not/here\n").unwrap();
        assert_eq!(read_legacy_last_folder(&ini), None);
    }
}
