//! src/extension/module.rs
//! ============================================================================
//! # Extension modules and owned screen handles
//!
//! An [`ExtensionModule`] is an open library whose two entry points have been
//! resolved. An [`ExtensionHandle`] owns one screen created by that module and
//! keeps the module alive. Dropping the handle runs the module's destroy
//! routine first and releases the module reference afterwards, so a screen
//! can never outlive the code that implements it.

use std::{
    ffi::{CStr, c_void},
    path::{Path, PathBuf},
    ptr::NonNull,
    rc::Rc,
};

use ratatui::Frame;
use spider_screen::{
    CREATE_SYMBOL, CreateFn, DESTROY_SYMBOL, DestroyFn, EventResult, Input, Screen, ScreenBox,
    ScreenContext, export,
};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// An opened dynamic library.
pub trait ModuleLibrary {
    /// Address of an exported symbol, if present.
    fn symbol(&self, name: &CStr) -> Option<NonNull<c_void>>;
}

/// Opens files as [`ModuleLibrary`]s.
pub trait ModuleOpener {
    fn open(&self, path: &Path) -> AppResult<Box<dyn ModuleLibrary>>;
}

/// A library with both entry points resolved.
pub struct ExtensionModule {
    name: String,
    path: PathBuf,
    create: CreateFn,
    destroy: DestroyFn,
    _library: Box<dyn ModuleLibrary>,
}

impl ExtensionModule {
    /// Resolve the create/destroy pair. On failure `library` is dropped,
    /// which releases it.
    pub fn resolve(name: String, path: &Path, library: Box<dyn ModuleLibrary>) -> AppResult<Self> {
        let create = entry_point(library.as_ref(), path, CREATE_SYMBOL)?;
        let destroy = entry_point(library.as_ref(), path, DESTROY_SYMBOL)?;

        // SAFETY: the symbols are declared by `export_screen!` with exactly
        // these signatures; data and function pointers have the same size on
        // every platform `dlsym` exists on.
        let (create, destroy) = unsafe {
            (
                std::mem::transmute::<*mut c_void, CreateFn>(create.as_ptr()),
                std::mem::transmute::<*mut c_void, DestroyFn>(destroy.as_ptr()),
            )
        };

        Ok(Self {
            name,
            path: path.to_path_buf(),
            create,
            destroy,
            _library: library,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a new screen instance owned by the returned handle.
    pub fn instantiate(self: &Rc<Self>) -> AppResult<ExtensionHandle> {
        // SAFETY: `create` was resolved from a live library held by `self`.
        let raw = unsafe { (self.create)() };
        let screen = NonNull::new(raw).ok_or_else(|| AppError::ExtensionCreate {
            path: self.path.clone(),
        })?;

        debug!(extension = %self.name, "Created extension screen");
        Ok(ExtensionHandle {
            screen,
            module: Rc::clone(self),
        })
    }
}

fn entry_point(library: &dyn ModuleLibrary, path: &Path, symbol: &'static CStr) -> AppResult<NonNull<c_void>> {
    library.symbol(symbol).ok_or_else(|| AppError::MissingEntryPoint {
        path: path.to_path_buf(),
        symbol: symbol.to_str().unwrap_or("<entry point>"),
    })
}

/// An owned screen created by an extension module.
pub struct ExtensionHandle {
    screen: NonNull<c_void>,
    module: Rc<ExtensionModule>,
}

impl ExtensionHandle {
    pub fn module_name(&self) -> &str {
        self.module.name()
    }

    fn screen(&self) -> &ScreenBox {
        // SAFETY: `screen` came from the module's create routine and is only
        // freed in `Drop`.
        unsafe { export::screen_ref(self.screen) }
    }

    fn screen_mut(&mut self) -> &mut ScreenBox {
        // SAFETY: as above; `&mut self` guarantees exclusive access.
        unsafe { export::screen_mut(self.screen) }
    }
}

impl Drop for ExtensionHandle {
    fn drop(&mut self) {
        debug!(extension = %self.module.name, "Destroying extension screen");
        // SAFETY: the pointer came from this module's create routine and has
        // not been destroyed. `self.module` is released only after this body.
        unsafe { (self.module.destroy)(self.screen.as_ptr()) };
    }
}

impl Screen for ExtensionHandle {
    fn name(&self) -> &str {
        self.screen().name()
    }

    fn update(&mut self, input: &Input, ctx: &mut ScreenContext) -> EventResult {
        self.screen_mut().update(input, ctx)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, ctx: &ScreenContext) {
        self.screen_mut().draw(frame, ctx);
    }

    fn on_activate(&mut self) {
        self.screen_mut().on_activate();
    }

    fn on_deactivate(&mut self) {
        self.screen_mut().on_deactivate();
    }
}
