//! src/export.rs
//! ============================================================================
//! # Extension entry points
//!
//! An extension module is a `cdylib` exporting two C-ABI symbols:
//!
//! - `spider_screen_create() -> *mut c_void` returns an owning pointer to a
//!   heap-allocated [`ScreenBox`];
//! - `spider_screen_destroy(*mut c_void)` takes that pointer back and drops it.
//!
//! The pointer is thin (a `Box` of a `Box<dyn Screen>`), so it survives the C
//! calling convention. Use [`export_screen!`](crate::export_screen) rather
//! than writing the functions by hand.
//!
//! ## Example
//! ```rust,ignore
//! spider_screen::export_screen!(HelloScreen::default());
//! ```

use std::{
    ffi::{CStr, c_void},
    ptr::NonNull,
};

use crate::screen::Screen;

/// The concrete type behind the raw pointer that crosses the boundary.
pub type ScreenBox = Box<dyn Screen>;

pub type CreateFn = unsafe extern "C" fn() -> *mut c_void;
pub type DestroyFn = unsafe extern "C" fn(*mut c_void);

pub const CREATE_SYMBOL: &CStr = c"spider_screen_create";
pub const DESTROY_SYMBOL: &CStr = c"spider_screen_destroy";

pub fn boxed<S: Screen + 'static>(screen: S) -> ScreenBox {
    Box::new(screen)
}

/// Leak `screen` into a thin raw pointer suitable for returning from `create`.
pub fn into_raw(screen: ScreenBox) -> *mut c_void {
    Box::into_raw(Box::new(screen)).cast()
}

/// Reclaim and drop a pointer produced by [`into_raw`]. Null is ignored.
///
/// # Safety
/// `raw` must be null or come from [`into_raw`] and not have been freed.
pub unsafe fn drop_raw(raw: *mut c_void) {
    if raw.is_null() {
        return;
    }
    // SAFETY: guaranteed by the caller.
    drop(unsafe { Box::from_raw(raw.cast::<ScreenBox>()) });
}

/// Borrow the screen behind a pointer produced by [`into_raw`].
///
/// # Safety
/// `raw` must come from [`into_raw`], still be live, and not be aliased for
/// the returned lifetime.
pub unsafe fn screen_mut<'a>(raw: NonNull<c_void>) -> &'a mut ScreenBox {
    // SAFETY: guaranteed by the caller.
    unsafe { &mut *raw.cast::<ScreenBox>().as_ptr() }
}

/// Borrow the screen behind a pointer produced by [`into_raw`].
///
/// # Safety
/// Same as [`screen_mut`], for a shared borrow.
pub unsafe fn screen_ref<'a>(raw: NonNull<c_void>) -> &'a ScreenBox {
    // SAFETY: guaranteed by the caller.
    unsafe { &*raw.cast::<ScreenBox>().as_ptr() }
}

/// Export the `create`/`destroy` pair for a screen built by `$ctor`.
#[macro_export]
macro_rules! export_screen {
    ($ctor:expr) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn spider_screen_create() -> *mut ::std::ffi::c_void {
            $crate::export::into_raw($crate::export::boxed($ctor))
        }

        /// # Safety
        /// Only call with a pointer returned by `spider_screen_create`.
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn spider_screen_destroy(screen: *mut ::std::ffi::c_void) {
            unsafe { $crate::export::drop_raw(screen) }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{context::ScreenContext, screen::{EventResult, Input}};
    use ratatui::Frame;
    use std::{cell::Cell, rc::Rc};

    struct Counted(Rc<Cell<u32>>);

    impl Screen for Counted {
        fn name(&self) -> &str {
            "counted"
        }

        fn update(&mut self, _input: &Input, _ctx: &mut ScreenContext) -> EventResult {
            EventResult::Ignored
        }

        fn draw(&mut self, _frame: &mut Frame<'_>, _ctx: &ScreenContext) {}
    }

    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_raw_round_trip_drops_once() {
        let drops = Rc::new(Cell::new(0));
        let raw = into_raw(boxed(Counted(drops.clone())));
        let ptr = NonNull::new(raw).unwrap();

        assert_eq!(unsafe { screen_ref(ptr) }.name(), "counted");
        assert_eq!(drops.get(), 0);

        unsafe { drop_raw(raw) };
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_drop_raw_ignores_null() {
        unsafe { drop_raw(std::ptr::null_mut()) };
    }
}
