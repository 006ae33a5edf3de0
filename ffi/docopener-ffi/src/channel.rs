//! Method channel FFI functions.
//!
//! Hosts call `openDocument` (or any method name) with JSON arguments and
//! receive the JSON result payload. A single process-wide channel is built on
//! first use from `DOCOPENER_*` environment variables.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::sync::OnceLock;

use docopener_channel::{MethodCall, MethodChannel, MethodReply};
use docopener_core::DocOpenerError;
use docopener_open::{OpenerConfig, SystemOpener};
use serde_json::Value;

use crate::error::{clear_error_state, invalid_argument, set_error, DocOpenerErrorCode};

/// Callback receiving the reply of `docopener_invoke_method_async`.
///
/// * `code` - `DOCOPENER_OK` with a payload, or `DOCOPENER_ERR_NOT_IMPLEMENTED`
///   with a null payload
/// * `result_json` - Owned by the callee; free with `docopener_free_string()`
/// * `user_data` - The pointer passed to `docopener_invoke_method_async`
pub type DocOpenerReplyCallback =
    extern "C" fn(code: DocOpenerErrorCode, result_json: *mut c_char, user_data: *mut c_void);

pub(crate) fn channel() -> &'static MethodChannel<SystemOpener> {
    static CHANNEL: OnceLock<MethodChannel<SystemOpener>> = OnceLock::new();
    CHANNEL.get_or_init(|| MethodChannel::new(SystemOpener::system(OpenerConfig::from_env())))
}

/// Invoke a channel method synchronously.
///
/// # Arguments
///
/// * `method` - Method name (e.g. `"openDocument"`)
/// * `arguments_json` - JSON arguments (may be NULL for no arguments)
/// * `result_json_out` - Output pointer for the result JSON string
///
/// # Arguments JSON Format
///
/// ```json
/// { "file_path": "/home/me/report.pdf" }
/// ```
///
/// # Returns
///
/// * `DOCOPENER_OK` with `{"type": ..., "message": ...}` written to
///   `result_json_out`. This includes handled failures such as a missing
///   file or no registered viewer.
/// * `DOCOPENER_ERR_NOT_IMPLEMENTED` for unknown method names
/// * `DOCOPENER_ERR_INVALID_ARGUMENT` for null pointers, invalid UTF-8, or
///   arguments that are not valid JSON
///
/// # Safety
///
/// * `method` must be a valid NUL-terminated string
/// * `arguments_json` must be NULL or a valid NUL-terminated string
/// * `result_json_out` must be a valid pointer to a `char*`
/// * The result string must be freed with `docopener_free_string()`
///
/// # Example (C)
///
/// ```c
/// char* result = NULL;
/// DocOpenerErrorCode err = docopener_invoke_method(
///     "openDocument", "{\"file_path\":\"/tmp/report.pdf\"}", &result);
/// if (err == DOCOPENER_OK) {
///     printf("%s\n", result);
///     docopener_free_string(result);
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn docopener_invoke_method(
    method: *const c_char,
    arguments_json: *const c_char,
    result_json_out: *mut *mut c_char,
) -> DocOpenerErrorCode {
    clear_error_state();

    if result_json_out.is_null() {
        return invalid_argument("result_json_out cannot be null");
    }

    let call = match decode_call(method, arguments_json) {
        Ok(call) => call,
        Err(code) => return code,
    };

    let method = call.method.clone();
    match channel().invoke(call) {
        MethodReply::Success(payload) => write_payload(payload, result_json_out),
        MethodReply::NotImplemented => not_implemented(method),
    }
}

/// Open a document with the native viewer.
///
/// Convenience wrapper for `docopener_invoke_method("openDocument", ...)`.
///
/// # Arguments
///
/// * `file_path` - Path of the PDF or CSV document (NULL is reported in the
///   result as "File path cannot be null")
/// * `result_json_out` - Output pointer for the result JSON string
///
/// # Safety
///
/// * `file_path` must be NULL or a valid NUL-terminated string
/// * `result_json_out` must be a valid pointer to a `char*`
/// * The result string must be freed with `docopener_free_string()`
#[no_mangle]
pub unsafe extern "C" fn docopener_open_document(
    file_path: *const c_char,
    result_json_out: *mut *mut c_char,
) -> DocOpenerErrorCode {
    clear_error_state();

    if result_json_out.is_null() {
        return invalid_argument("result_json_out cannot be null");
    }

    let call = if file_path.is_null() {
        MethodCall::new(docopener_core::protocol::METHOD_OPEN_DOCUMENT, Value::Null)
    } else {
        match CStr::from_ptr(file_path).to_str() {
            Ok(path) => MethodCall::open_document(path),
            Err(_) => return invalid_argument("file_path is not valid UTF-8"),
        }
    };

    match channel().invoke(call) {
        MethodReply::Success(payload) => write_payload(payload, result_json_out),
        MethodReply::NotImplemented => {
            let err = DocOpenerError::internal("openDocument is not routed");
            set_error(&err);
            DocOpenerErrorCode::Internal
        }
    }
}

/// Invoke a channel method, delivering the reply through `callback`.
///
/// Arguments are validated before returning. The call itself runs on a
/// worker thread, and `callback` is invoked exactly once from that thread.
///
/// # Returns
///
/// * `DOCOPENER_OK` when the call was dispatched
/// * `DOCOPENER_ERR_INVALID_ARGUMENT` for a null callback, null or non-UTF-8
///   method, or undecodable arguments (the callback is not invoked)
///
/// # Safety
///
/// * `method` must be a valid NUL-terminated string
/// * `arguments_json` must be NULL or a valid NUL-terminated string
/// * `user_data` is passed through untouched and must be usable from the
///   worker thread
#[no_mangle]
pub unsafe extern "C" fn docopener_invoke_method_async(
    method: *const c_char,
    arguments_json: *const c_char,
    callback: Option<DocOpenerReplyCallback>,
    user_data: *mut c_void,
) -> DocOpenerErrorCode {
    clear_error_state();

    let Some(callback) = callback else {
        return invalid_argument("callback cannot be null");
    };

    let call = match decode_call(method, arguments_json) {
        Ok(call) => call,
        Err(code) => return code,
    };

    let user_data = UserData(user_data);
    let spawned = std::thread::Builder::new()
        .name("docopener-call".into())
        .spawn(move || {
            channel().handle(call, move |reply| {
                let user_data = user_data;
                match reply {
                    MethodReply::Success(payload) => {
                        callback(DocOpenerErrorCode::Ok, into_c_string(payload), user_data.0)
                    }
                    MethodReply::NotImplemented => callback(
                        DocOpenerErrorCode::NotImplemented,
                        std::ptr::null_mut(),
                        user_data.0,
                    ),
                }
            });
        });

    match spawned {
        Ok(_) => DocOpenerErrorCode::Ok,
        Err(e) => {
            let err = DocOpenerError::internal(format!("failed to spawn worker thread: {e}"));
            set_error(&err);
            DocOpenerErrorCode::Internal
        }
    }
}

/// Opaque host pointer carried to the worker thread.
struct UserData(*mut c_void);

// SAFETY: The pointer is never dereferenced on our side; the caller vouches
// that it may be used from the worker thread.
unsafe impl Send for UserData {}

unsafe fn decode_call(
    method: *const c_char,
    arguments_json: *const c_char,
) -> Result<MethodCall, DocOpenerErrorCode> {
    if method.is_null() {
        return Err(invalid_argument("method cannot be null"));
    }
    let method = CStr::from_ptr(method)
        .to_str()
        .map_err(|_| invalid_argument("method is not valid UTF-8"))?;

    let arguments = if arguments_json.is_null() {
        Value::Null
    } else {
        let raw = CStr::from_ptr(arguments_json)
            .to_str()
            .map_err(|_| invalid_argument("arguments_json is not valid UTF-8"))?;
        if raw.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(raw)
                .map_err(|e| invalid_argument(format!("invalid arguments JSON: {e}")))?
        }
    };

    Ok(MethodCall::new(method, arguments))
}

unsafe fn write_payload(payload: String, result_json_out: *mut *mut c_char) -> DocOpenerErrorCode {
    match CString::new(payload) {
        Ok(c) => {
            // SAFETY: Callers verified result_json_out is not null
            *result_json_out = c.into_raw();
            DocOpenerErrorCode::Ok
        }
        Err(e) => {
            let err = DocOpenerError::internal(format!("JSON contains null byte: {e}"));
            set_error(&err);
            DocOpenerErrorCode::Internal
        }
    }
}

/// Serialized results never contain NUL; null only if that ever changes.
fn into_c_string(payload: String) -> *mut c_char {
    CString::new(payload)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

fn not_implemented(method: String) -> DocOpenerErrorCode {
    let err = DocOpenerError::not_implemented(method);
    set_error(&err);
    DocOpenerErrorCode::NotImplemented
}

// ============================================================================
// Tests
// ============================================================================
