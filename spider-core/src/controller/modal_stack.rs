//! src/controller/modal_stack.rs
//! ============================================================================
//! # ModalStack: LIFO of active screens
//!
//! Only the top screen receives input and is drawn. Transitions notify the
//! screens involved: the outgoing top is deactivated before the incoming one
//! is activated. Dropping the stack deactivates the top and then destroys the
//! frames from the top down.

use spider_screen::Screen;
use tracing::{debug, trace};

#[derive(Default)]
pub struct ModalStack {
    screens: Vec<Box<dyn Screen>>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deactivate the current top, then push and activate `screen`.
    pub fn push(&mut self, mut screen: Box<dyn Screen>) {
        if let Some(top) = self.screens.last_mut() {
            top.on_deactivate();
        }
        debug!(screen = screen.name(), depth = self.screens.len() + 1, "Pushing screen");
        screen.on_activate();
        self.screens.push(screen);
    }

    /// Deactivate and destroy the top, then reactivate the one below it.
    /// Returns `false` on an empty stack.
    pub fn pop(&mut self) -> bool {
        let Some(mut top) = self.screens.pop() else {
            trace!("Pop on empty stack");
            return false;
        };

        top.on_deactivate();
        debug!(screen = top.name(), depth = self.screens.len(), "Popped screen");
        drop(top);

        if let Some(next) = self.screens.last_mut() {
            next.on_activate();
        }
        true
    }

    /// Unwind every frame: deactivate the top, then destroy top-down.
    pub fn clear(&mut self) {
        if let Some(top) = self.screens.last_mut() {
            top.on_deactivate();
        }
        while let Some(screen) = self.screens.pop() {
            trace!(screen = screen.name(), "Destroying screen");
            drop(screen);
        }
    }

    pub fn top_mut(&mut self) -> Option<&mut Box<dyn Screen>> {
        self.screens.last_mut()
    }

    pub fn top(&self) -> Option<&dyn Screen> {
        self.screens.last().map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}

impl Drop for ModalStack {
    fn drop(&mut self) {
        self.clear();
    }
}
