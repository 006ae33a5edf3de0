//! Host window capability.
//!
//! The host application owns its window. The opener only keeps a weak
//! back-reference, attached and detached from the host's lifecycle callbacks
//! and upgraded for the duration of a single call.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

/// A foreground window the host can present viewers from.
pub trait HostWindow: Send + Sync {
    /// Native handle used to parent OS dialogs (`HWND` on Windows).
    fn native_handle(&self) -> Option<isize> {
        None
    }
}

/// Weak slot holding the currently attached [`HostWindow`], if any.
#[derive(Default)]
pub struct HostSlot {
    window: RwLock<Option<Weak<dyn HostWindow>>>,
}

impl HostSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach (or re-attach after a configuration change) the host window.
    pub fn attach(&self, window: &Arc<dyn HostWindow>) {
        *self.write() = Some(Arc::downgrade(window));
    }

    /// Drop the back-reference; called on lifecycle teardown.
    pub fn detach(&self) {
        *self.write() = None;
    }

    /// Upgrade the back-reference for the duration of one call.
    ///
    /// Returns `None` when nothing is attached or the host already dropped
    /// the window.
    pub fn current(&self) -> Option<Arc<dyn HostWindow>> {
        self.read().as_ref().and_then(Weak::upgrade)
    }

    pub fn is_attached(&self) -> bool {
        self.current().is_some()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Weak<dyn HostWindow>>> {
        self.window.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Weak<dyn HostWindow>>> {
        self.window
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for HostSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Window(isize);

    impl HostWindow for Window {
        fn native_handle(&self) -> Option<isize> {
            Some(self.0)
        }
    }

    #[test]
    fn empty_slot_has_no_window() {
        let slot = HostSlot::new();
        assert!(slot.current().is_none());
        assert!(!slot.is_attached());
    }

    #[test]
    fn attach_and_detach() {
        let slot = HostSlot::new();
        let window: Arc<dyn HostWindow> = Arc::new(Window(7));

        slot.attach(&window);
        let current = slot.current().expect("attached window");
        assert_eq!(current.native_handle(), Some(7));
        drop(current);

        slot.detach();
        assert!(slot.current().is_none());
    }

    #[test]
    fn slot_does_not_keep_window_alive() {
        let slot = HostSlot::new();
        let window: Arc<dyn HostWindow> = Arc::new(Window(1));
        slot.attach(&window);
        drop(window);
        assert!(slot.current().is_none());
    }

    #[test]
    fn reattach_replaces_window() {
        let slot = HostSlot::new();
        let first: Arc<dyn HostWindow> = Arc::new(Window(1));
        let second: Arc<dyn HostWindow> = Arc::new(Window(2));
        slot.attach(&first);
        slot.attach(&second);
        assert_eq!(slot.current().unwrap().native_handle(), Some(2));
    }
}
