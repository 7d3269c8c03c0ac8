//! src/extension/registry.rs
//! ============================================================================
//! # ExtensionRegistry: screens discovered at startup
//!
//! Every file in the extension directory whose extension matches the
//! platform's shared-object suffix is opened, its entry points resolved and
//! one screen instance created. Any failing step skips that file with a
//! warning; loading never aborts startup. Entries are keyed by file stem, in
//! directory-name order.

use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

use indexmap::IndexMap;
use spider_screen::Screen;
use tracing::{info, instrument, warn};

use crate::{
    error::AppResult,
    extension::{
        module::{ExtensionHandle, ExtensionModule, ModuleOpener},
        native::NativeOpener,
    },
};

struct ExtensionEntry {
    module: Rc<ExtensionModule>,
    instance: Option<ExtensionHandle>,
}

/// Loaded extension modules with their preloaded screen instances.
#[derive(Default)]
pub struct ExtensionRegistry {
    entries: IndexMap<String, ExtensionEntry>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every module in `dir` with the platform loader.
    pub fn load_all(dir: &Path) -> Self {
        Self::load_all_with(dir, &NativeOpener)
    }

    #[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
    pub fn load_all_with(dir: &Path, opener: &dyn ModuleOpener) -> Self {
        let mut registry = Self::new();

        let read_dir = match std::fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                info!("No extensions loaded from {}: {e}", dir.display());
                return registry;
            }
        };

        let mut candidates: Vec<PathBuf> = read_dir
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| is_module_file(path))
            .collect();
        candidates.sort();

        for path in candidates {
            if let Err(e) = registry.load(&path, opener) {
                warn!("Skipping extension: {e}");
            }
        }

        info!(count = registry.len(), "Extensions loaded");
        registry
    }

    fn load(&mut self, path: &Path, opener: &dyn ModuleOpener) -> AppResult<()> {
        let name = module_name(path);
        let library = opener.open(path)?;
        let module = Rc::new(ExtensionModule::resolve(name.clone(), path, library)?);
        let instance = module.instantiate()?;

        info!(extension = %name, screen = instance.name(), "Loaded extension");
        self.entries.insert(
            name,
            ExtensionEntry {
                module,
                instance: Some(instance),
            },
        );
        Ok(())
    }

    /// The preloaded instance for `name`. Absent for unknown names and
    /// after the instance has been taken by [`open`](Self::open).
    pub fn get(&self, name: &str) -> Option<&dyn Screen> {
        self.entries
            .get(name)?
            .instance
            .as_ref()
            .map(|handle| handle as &dyn Screen)
    }

    /// Take ownership of a screen for `name`: the preloaded instance the
    /// first time, a freshly created one afterwards.
    pub fn open(&mut self, name: &str) -> Option<ExtensionHandle> {
        let entry = self.entries.get_mut(name)?;
        if let Some(instance) = entry.instance.take() {
            return Some(instance);
        }

        match entry.module.instantiate() {
            Ok(instance) => Some(instance),
            Err(e) => {
                warn!("Cannot reopen extension {name}: {e}");
                None
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_module_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext == std::env::consts::DLL_EXTENSION)
}

fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
