//! src/config/bindings.rs
//! ============================================================================
//! # Bindings: key → built-in behavior or shell-command template
//!
//! The table is keyed by character; inserting a key that already exists
//! replaces the previous binding. `Bindings::with_defaults` seeds the
//! browser's built-in keymap so that config entries can rebind those keys.

use std::{collections::HashMap, path::Path};

use compact_str::CompactString;
use spider_screen::{ProcessRequest, Settings};

/// Substituted with the current working directory at invocation time.
pub const PLACEHOLDER: &str = "%F";

/// Behaviors built into the browser screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinAction {
    Parent,
    Enter,
    Down,
    Up,
    Shell,
    Terminal,
    CreateFile,
    CreateDirectory,
    Delete,
    Rename,
    ToggleMark,
    ClearMarks,
    PasteMarks,
    MoveMarks,
    GitStatus,
    OpenExtension,
    Find,
    ToggleBookmark,
    Bookmarks,
    Close,
}

impl BuiltinAction {
    /// The default keymap.
    pub const DEFAULTS: [(char, Self); 20] = [
        ('h', Self::Parent),
        ('l', Self::Enter),
        ('j', Self::Down),
        ('k', Self::Up),
        ('s', Self::Shell),
        ('S', Self::Terminal),
        ('c', Self::CreateFile),
        ('C', Self::CreateDirectory),
        ('D', Self::Delete),
        ('R', Self::Rename),
        (' ', Self::ToggleMark),
        ('m', Self::ClearMarks),
        ('p', Self::PasteMarks),
        ('v', Self::MoveMarks),
        ('G', Self::GitStatus),
        ('E', Self::OpenExtension),
        ('f', Self::Find),
        ('b', Self::ToggleBookmark),
        ('g', Self::Bookmarks),
        ('q', Self::Close),
    ];
}

/// A user-defined shell command with an optional `%F` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate(CompactString);

impl CommandTemplate {
    pub fn new(template: impl Into<CompactString>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The command line with every placeholder replaced by `cwd`.
    pub fn expand(&self, cwd: &Path) -> String {
        self.0.replace(PLACEHOLDER, &cwd.to_string_lossy())
    }

    /// The expanded command, run through the configured shell.
    pub fn to_request(&self, cwd: &Path, settings: &Settings) -> ProcessRequest {
        ProcessRequest::shell(&settings.shell, self.expand(cwd))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingAction {
    Builtin(BuiltinAction),
    Command(CommandTemplate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: char,
    pub action: BindingAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    table: HashMap<char, Binding>,
}

impl Bindings {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The browser's built-in keymap.
    pub fn with_defaults() -> Self {
        let mut bindings = Self::new();
        for (key, action) in BuiltinAction::DEFAULTS {
            bindings.insert(key, BindingAction::Builtin(action));
        }
        bindings
    }

    /// Insert or overwrite the binding for `key`.
    pub fn insert(&mut self, key: char, action: BindingAction) -> Option<Binding> {
        self.table.insert(key, Binding { key, action })
    }

    pub fn bind_command(&mut self, key: char, template: impl Into<CompactString>) -> Option<Binding> {
        self.insert(key, BindingAction::Command(CommandTemplate::new(template)))
    }

    pub fn get(&self, key: char) -> Option<&Binding> {
        self.table.get(&key)
    }

    /// Template of a command binding, if `key` is bound to one.
    pub fn template(&self, key: char) -> Option<&CommandTemplate> {
        match &self.get(key)?.action {
            BindingAction::Command(template) => Some(template),
            BindingAction::Builtin(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.table.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_placeholder_expansion() {
        let template = CommandTemplate::new("echo %F");
        assert_eq!(template.expand(Path::new("/tmp")), "echo /tmp");

        let twice = CommandTemplate::new("diff %F/a %F/b");
        assert_eq!(twice.expand(Path::new("/x")), "diff /x/a /x/b");

        let none = CommandTemplate::new("make");
        assert_eq!(none.expand(Path::new("/x")), "make");
    }

    #[test]
    fn test_request_uses_configured_shell() {
        let settings = Settings {
            shell: "zsh".to_string(),
            home: PathBuf::from("/home/u"),
            ..Settings::default()
        };
        let request = CommandTemplate::new("ls %F").to_request(Path::new("/srv"), &settings);
        assert_eq!(request.program, "zsh");
        assert_eq!(request.args, vec!["-c".to_string(), "ls /srv".to_string()]);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut bindings = Bindings::new();
        assert!(bindings.bind_command('x', "one").is_none());
        assert!(bindings.bind_command('x', "two").is_some());
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.template('x').map(CommandTemplate::as_str), Some("two"));
    }

    #[test]
    fn test_defaults_can_be_rebound() {
        let mut bindings = Bindings::with_defaults();
        let before = bindings.len();
        assert_eq!(
            bindings.get('D').map(|b| &b.action),
            Some(&BindingAction::Builtin(BuiltinAction::Delete))
        );

        bindings.bind_command('D', "rm -rf %F");
        assert_eq!(bindings.len(), before);
        assert_eq!(bindings.template('D').map(CommandTemplate::as_str), Some("rm -rf %F"));
    }
}
