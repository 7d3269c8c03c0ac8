//! src/settings.rs
//! ============================================================================
//! # Settings: external programs and the home directory
//!
//! A flat record with hard-coded defaults, seeded from the environment. The
//! host applies config-file overrides afterwards, so the config file wins.

use std::path::PathBuf;

use directories::BaseDirs;

pub const DEFAULT_EDITOR: &str = "nvim";
pub const DEFAULT_TERMINAL: &str = "urxvt";
pub const DEFAULT_OPENER: &str = "xdg-open";
pub const DEFAULT_SHELL: &str = "bash";

pub const ENV_EDITOR: &str = "VISUAL";
pub const ENV_TERMINAL: &str = "TERMCMD";
pub const ENV_OPENER: &str = "SPIDER_OPENER";
pub const ENV_SHELL: &str = "SHELL";
pub const ENV_HOME: &str = "HOME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Program used to edit text files.
    pub editor: String,

    /// Terminal emulator spawned detached.
    pub terminal: String,

    /// Generic opener for everything that is neither text nor executable.
    pub opener: String,

    /// Shell used for interactive sessions and command bindings.
    pub shell: String,

    pub home: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: DEFAULT_EDITOR.to_string(),
            terminal: DEFAULT_TERMINAL.to_string(),
            opener: DEFAULT_OPENER.to_string(),
            shell: DEFAULT_SHELL.to_string(),
            home: default_home(),
        }
    }
}

impl Settings {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns; empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let defaults = Self::default();

        Self {
            editor: get(ENV_EDITOR).unwrap_or(defaults.editor),
            terminal: get(ENV_TERMINAL).unwrap_or(defaults.terminal),
            opener: get(ENV_OPENER).unwrap_or(defaults.opener),
            shell: get(ENV_SHELL).unwrap_or(defaults.shell),
            home: get(ENV_HOME).map(PathBuf::from).unwrap_or(defaults.home),
        }
    }
}

fn default_home() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_environment_overrides_defaults() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("VISUAL", "vi"),
            ("TERMCMD", "alacritty"),
            ("HOME", "/home/someone"),
        ]);

        let settings = Settings::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.editor, "vi");
        assert_eq!(settings.terminal, "alacritty");
        assert_eq!(settings.opener, DEFAULT_OPENER);
        assert_eq!(settings.shell, DEFAULT_SHELL);
        assert_eq!(settings.home, PathBuf::from("/home/someone"));
    }

    #[test]
    fn test_empty_variables_fall_back() {
        let settings = Settings::from_lookup(|key| (key == "SHELL").then(String::new));
        assert_eq!(settings.shell, DEFAULT_SHELL);
    }
}
