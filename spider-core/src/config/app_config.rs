//! src/config/app_config.rs
//! ============================================================================
//! # AppConfig: Settings, Bindings and Paths
//!
//! Loading order: hard-coded defaults, then the environment, then the config
//! file at `$HOME/.config/spider/spider.conf`. The config file is processed
//! last, so a `set` statement wins over an environment variable.
//!
//! ## Example
//! ```rust,ignore
//! let config = AppConfig::load().await?;
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use spider_screen::Settings;
use tracing::info;

use crate::{
    config::{
        bindings::Bindings,
        interpreter::interpret,
        lexer::{lex, lex_file},
    },
    error::AppResult,
};

/// Overrides the extension directory.
pub const ENV_PLUGIN_DIR: &str = "SPIDER_PLUGIN_DIR";

const CONFIG_DIR: &str = ".config/spider";
const CONFIG_FILE: &str = "spider.conf";
const PLUGIN_DIR: &str = "plugins";
const BOOKMARKS_FILE: &str = "bookmarks";

/// Filesystem locations derived from the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
    pub extension_dir: PathBuf,
    pub bookmarks_file: PathBuf,
    pub log_dir: PathBuf,
}

impl ConfigPaths {
    pub fn resolve(home: &Path, plugin_dir_override: Option<PathBuf>) -> Self {
        let config_dir = home.join(CONFIG_DIR);
        let log_dir = ProjectDirs::from("org", "spider", "spider")
            .map(|dirs| dirs.data_local_dir().join("logs"))
            .unwrap_or_else(|| config_dir.join("logs"));

        Self {
            config_file: config_dir.join(CONFIG_FILE),
            extension_dir: plugin_dir_override.unwrap_or_else(|| config_dir.join(PLUGIN_DIR)),
            bookmarks_file: config_dir.join(BOOKMARKS_FILE),
            log_dir,
        }
    }

    /// Paths for `home`, honoring the plugin directory override variable.
    pub fn from_env(home: &Path) -> Self {
        Self::resolve(home, std::env::var_os(ENV_PLUGIN_DIR).map(PathBuf::from))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings: Settings,
    pub bindings: Bindings,
    pub paths: ConfigPaths,
}

impl AppConfig {
    /// Environment-seeded settings plus the user's config file, if any.
    pub async fn load() -> AppResult<Self> {
        let settings = Settings::from_env();
        let paths = ConfigPaths::from_env(&settings.home);
        Self::load_from(settings, paths).await
    }

    /// Apply the config file named in `paths` on top of `settings`. A
    /// missing file leaves the defaults untouched.
    pub async fn load_from(settings: Settings, paths: ConfigPaths) -> AppResult<Self> {
        info!("Loading config from {}", paths.config_file.display());
        let tokens = lex_file(&paths.config_file).await?;

        let mut config = Self {
            settings,
            bindings: Bindings::with_defaults(),
            paths,
        };
        interpret(&tokens, &mut config.settings, &mut config.bindings);
        info!(bindings = config.bindings.len(), "Config loaded");

        Ok(config)
    }

    /// Apply config `text` on top of already-seeded `settings`.
    pub fn from_source(text: &str, settings: Settings) -> Self {
        let paths = ConfigPaths::resolve(&settings.home, None);
        let mut config = Self {
            settings,
            bindings: Bindings::with_defaults(),
            paths,
        };
        interpret(&lex(text), &mut config.settings, &mut config.bindings);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_file_wins_over_environment() {
        let env: HashMap<&str, &str> = HashMap::from([("TERMCMD", "xterm"), ("VISUAL", "vim")]);
        let settings = Settings::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        let config = AppConfig::from_source("set terminal \"kitty\"", settings);

        assert_eq!(config.settings.terminal, "kitty");
        assert_eq!(config.settings.editor, "vim");
    }

    #[test]
    fn test_paths_follow_home() {
        let paths = ConfigPaths::resolve(Path::new("/home/u"), None);
        assert_eq!(paths.config_file, PathBuf::from("/home/u/.config/spider/spider.conf"));
        assert_eq!(paths.extension_dir, PathBuf::from("/home/u/.config/spider/plugins"));
        assert_eq!(paths.bookmarks_file, PathBuf::from("/home/u/.config/spider/bookmarks"));

        let overridden = ConfigPaths::resolve(Path::new("/home/u"), Some(PathBuf::from("/opt/ext")));
        assert_eq!(overridden.extension_dir, PathBuf::from("/opt/ext"));
    }

    #[tokio::test]
    async fn test_load_from_reads_config_file() {
        let home = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::resolve(home.path(), None);
        std::fs::create_dir_all(paths.config_file.parent().unwrap()).unwrap();
        std::fs::write(&paths.config_file, "set visual \"ed\"\nbind x \"make -C %F\"\n").unwrap();

        let config = AppConfig::load_from(Settings::default(), paths).await.unwrap();
        assert_eq!(config.settings.editor, "ed");
        assert_eq!(
            config.bindings.template('x').map(|t| t.expand(Path::new("/src"))),
            Some("make -C /src".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_config_file_keeps_defaults() {
        let home = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::resolve(home.path(), None);

        let config = AppConfig::load_from(Settings::default(), paths).await.unwrap();
        assert_eq!(config.settings, Settings::default());
        assert_eq!(config.bindings, Bindings::with_defaults());
    }

    #[test]
    fn test_user_bindings_layer_over_defaults() {
        let config = AppConfig::from_source("bind x \"make\"", Settings::default());
        assert!(config.bindings.template('x').is_some());
        assert!(config.bindings.get('j').is_some());
    }
}
