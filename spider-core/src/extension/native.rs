//! src/extension/native.rs
//! Native shared objects via `dlopen`.

use std::{
    ffi::{CStr, c_void},
    path::{Path, PathBuf},
    ptr::NonNull,
};

use tracing::trace;

use crate::{
    error::{AppError, AppResult},
    extension::module::{ModuleLibrary, ModuleOpener},
};

/// Opens modules with the platform dynamic loader.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeOpener;

impl ModuleOpener for NativeOpener {
    fn open(&self, path: &Path) -> AppResult<Box<dyn ModuleLibrary>> {
        Ok(Box::new(NativeLibrary::open(path)?))
    }
}

/// A `dlopen` handle, closed on drop.
#[derive(Debug)]
pub struct NativeLibrary {
    handle: NonNull<c_void>,
    path: PathBuf,
}

#[cfg(unix)]
impl NativeLibrary {
    pub fn open(path: &Path) -> AppResult<Self> {
        use std::{ffi::CString, os::unix::ffi::OsStrExt};

        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| AppError::extension_load(path, "path contains a NUL byte"))?;

        // SAFETY: `c_path` is a valid NUL-terminated string.
        let handle = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_LAZY | libc::RTLD_LOCAL) };

        NonNull::new(handle)
            .map(|handle| Self {
                handle,
                path: path.to_path_buf(),
            })
            .ok_or_else(|| AppError::extension_load(path, last_loader_error()))
    }
}

#[cfg(not(unix))]
impl NativeLibrary {
    pub fn open(path: &Path) -> AppResult<Self> {
        Err(AppError::extension_load(path, "dynamic extensions are only supported on unix"))
    }
}

#[cfg(unix)]
fn last_loader_error() -> String {
    // SAFETY: dlerror returns null or a NUL-terminated string owned by the
    // loader, valid until the next loader call on this thread.
    unsafe {
        let message = libc::dlerror();
        if message.is_null() {
            "unknown dynamic loader error".to_string()
        } else {
            CStr::from_ptr(message).to_string_lossy().into_owned()
        }
    }
}

impl ModuleLibrary for NativeLibrary {
    #[cfg(unix)]
    fn symbol(&self, name: &CStr) -> Option<NonNull<c_void>> {
        // SAFETY: the handle is live until drop; `name` is NUL-terminated.
        let address = unsafe {
            libc::dlerror();
            libc::dlsym(self.handle.as_ptr(), name.as_ptr())
        };
        trace!(path = %self.path.display(), symbol = ?name, found = !address.is_null(), "Resolved symbol");
        NonNull::new(address)
    }

    #[cfg(not(unix))]
    fn symbol(&self, _name: &CStr) -> Option<NonNull<c_void>> {
        None
    }
}

impl Drop for NativeLibrary {
    fn drop(&mut self) {
        trace!(path = %self.path.display(), "Closing module");
        #[cfg(unix)]
        // SAFETY: the handle came from dlopen and is closed exactly once.
        unsafe {
            libc::dlclose(self.handle.as_ptr());
        }
    }
}
