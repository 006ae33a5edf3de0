//! Host window lifecycle FFI functions.
//!
//! Hosts call `docopener_attach_window` when their window becomes available
//! (and again after it is recreated) and `docopener_detach_window` on
//! teardown. The opener itself only keeps a weak reference; the strong one
//! lives here on the host's behalf until detach.

use std::sync::{Arc, Mutex};

use docopener_open::HostWindow;

use crate::channel::channel;
use crate::error::{clear_error_state, DocOpenerErrorCode};

/// A host window known only by its native handle (`HWND` on Windows).
#[derive(Debug)]
struct NativeWindow {
    handle: isize,
}

impl HostWindow for NativeWindow {
    fn native_handle(&self) -> Option<isize> {
        (self.handle != 0).then_some(self.handle)
    }
}

static ATTACHED: Mutex<Option<Arc<dyn HostWindow>>> = Mutex::new(None);

/// Attach the host window.
///
/// Replaces any previously attached window.
///
/// # Arguments
///
/// * `native_handle` - Platform window handle used to parent OS dialogs
///   (`HWND` on Windows). Pass 0 when the platform has none.
///
/// # Returns
///
/// * `DOCOPENER_OK`
#[no_mangle]
pub extern "C" fn docopener_attach_window(native_handle: isize) -> DocOpenerErrorCode {
    clear_error_state();

    let window: Arc<dyn HostWindow> = Arc::new(NativeWindow {
        handle: native_handle,
    });
    let mut attached = ATTACHED.lock().unwrap_or_else(|p| p.into_inner());
    channel().opener().host().attach(&window);
    *attached = Some(window);
    DocOpenerErrorCode::Ok
}

/// Detach the host window.
///
/// Subsequent calls fail with "Activity is not available" when
/// `DOCOPENER_REQUIRE_WINDOW` is set. Detaching twice is a no-op.
#[no_mangle]
pub extern "C" fn docopener_detach_window() -> DocOpenerErrorCode {
    clear_error_state();

    let mut attached = ATTACHED.lock().unwrap_or_else(|p| p.into_inner());
    channel().opener().host().detach();
    *attached = None;
    DocOpenerErrorCode::Ok
}
