//! C-ABI wrapper around `tuneshare-core`.
//!
//! # Overview
//! Exposes request building through `extern "C"` functions so a host in any
//! language with a C FFI can obtain fully-headed request descriptors and
//! perform the I/O itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Handles from `tuneshare_client_shared` wrap the process-wide client, so
//!   a token set through one is visible through all of them.
//! - The C caller owns all returned pointers and must call the matching
//!   `tuneshare_*_free` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tuneshare_core::{ApiClient, ApiError, FileField, FormPayload, FormValue, HttpMethod, Payload};

use types::*;

/// Borrow a C string argument. Null and invalid UTF-8 both yield `None`.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client bound to `base_path`, with its own token.
///
/// Returns null if `base_path` is null or not UTF-8.
/// The caller must free the returned pointer with `tuneshare_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_client_new(base_path: *const c_char) -> *mut FfiApiClient {
    catch_unwind(|| match unsafe { str_arg(base_path) } {
        Some(base) => Box::into_raw(Box::new(FfiApiClient {
            inner: ApiClient::new(base),
        })),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Obtain a handle to the process-wide client.
///
/// Every handle returned here shares one token. Free each with
/// `tuneshare_client_free`; the shared client itself lives for the process.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_client_shared() -> *mut FfiApiClient {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiApiClient {
            inner: ApiClient::instance().clone(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client handle. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_client_free(client: *mut FfiApiClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

/// Replace the bearer token. A null `token` clears it.
///
/// Returns false if `client` is null or `token` is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_client_set_authorization(
    client: *const FfiApiClient,
    token: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return false;
        }
        let client = unsafe { &*client };
        if token.is_null() {
            client.inner.clear_authorization();
            return true;
        }
        match unsafe { str_arg(token) } {
            Some(token) => {
                client.inner.set_authorization(token);
                true
            }
            None => false,
        }
    }))
    .unwrap_or(false)
}

/// Copy of the current token, empty when logged out.
///
/// Returns null if `client` is null. Free with `tuneshare_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_client_authorization(client: *const FfiApiClient) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        CString::new(client.inner.authorization()).map_or(std::ptr::null_mut(), CString::into_raw)
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Create an empty form payload. Free with `tuneshare_form_free`.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_form_new() -> *mut FfiForm {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiForm {
            inner: FormPayload::new(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Set a text field. A null `value` records the key as absent, so it is
/// skipped when the form is encoded.
///
/// Returns false if `form` or `key` is null, or a string is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_form_add_text(
    form: *mut FfiForm,
    key: *const c_char,
    value: *const c_char,
) -> bool {
    catch_unwind(|| {
        if form.is_null() {
            return false;
        }
        let Some(key) = (unsafe { str_arg(key) }) else {
            return false;
        };
        let value = if value.is_null() {
            None
        } else {
            match unsafe { str_arg(value) } {
                Some(text) => Some(FormValue::Text(text.to_string())),
                None => return false,
            }
        };
        let form = unsafe { &mut *form };
        form.inner.insert(key, value);
        true
    })
    .unwrap_or(false)
}

/// Set a file field described by its local `uri`, upload `name`, and
/// `mime_type`. The file is not read here.
///
/// Returns false if any argument is null or not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_form_add_file(
    form: *mut FfiForm,
    key: *const c_char,
    uri: *const c_char,
    name: *const c_char,
    mime_type: *const c_char,
) -> bool {
    catch_unwind(|| {
        if form.is_null() {
            return false;
        }
        let args = unsafe { (str_arg(key), str_arg(uri), str_arg(name), str_arg(mime_type)) };
        let (Some(key), Some(uri), Some(name), Some(mime_type)) = args else {
            return false;
        };
        let form = unsafe { &mut *form };
        form.inner
            .insert(key, Some(FormValue::File(FileField::new(uri, name, mime_type))));
        true
    })
    .unwrap_or(false)
}

/// Free a form payload. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_form_free(form: *mut FfiForm) {
    if !form.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(form) });
        });
    }
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

/// Build a request with an optional JSON body.
///
/// `method` is an `FfiHttpMethod` discriminant. `json_body` may be null for
/// no body; otherwise it must be valid JSON. `content_type` may be null to
/// keep `application/json`.
///
/// Returns null on a null `client`/`path`, an unknown method, or invalid
/// JSON. Free with `tuneshare_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_build_request(
    client: *const FfiApiClient,
    method: u32,
    path: *const c_char,
    json_body: *const c_char,
    content_type: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(method), Some(path)) = (types::method_from_raw(method), unsafe { str_arg(path) })
        else {
            return std::ptr::null_mut();
        };
        let body: Option<serde_json::Value> = if json_body.is_null() {
            None
        } else {
            match unsafe { str_arg(json_body) }.map(serde_json::from_str::<serde_json::Value>) {
                Some(Ok(value)) => Some(value),
                _ => return std::ptr::null_mut(),
            }
        };
        let content_type = unsafe { str_arg(content_type) };
        let overrides: Vec<(&str, &str)> = content_type
            .map(|ct| vec![(tuneshare_core::http::CONTENT_TYPE, ct)])
            .unwrap_or_default();
        let payload = match &body {
            Some(value) => Payload::Json(value),
            None => Payload::None,
        };
        match client.inner.build_request(path, method, payload, &overrides) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build a multipart request from `form`. Only `Post` and `Patch` are
/// accepted.
///
/// Returns null on a null argument or any other method. The form is not
/// consumed. Free the result with `tuneshare_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_build_form_request(
    client: *const FfiApiClient,
    method: u32,
    path: *const c_char,
    form: *const FfiForm,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() || form.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let form = unsafe { &*form };
        let Some(path) = (unsafe { str_arg(path) }) else {
            return std::ptr::null_mut();
        };
        let req = match types::method_from_raw(method) {
            Some(HttpMethod::Post) => client.inner.build_post_form(path, &form.inner),
            Some(HttpMethod::Patch) => client.inner.build_patch_form(path, &form.inner),
            _ => return std::ptr::null_mut(),
        };
        FfiHttpRequest::from_core(req)
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Classify a response status the host received. 2xx yields `None`.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_classify_status(status: u16) -> FfiFailureKind {
    catch_unwind(|| {
        if (200..300).contains(&status) {
            return FfiFailureKind::None;
        }
        ApiError::Http {
            status,
            body: String::new(),
        }
        .kind()
        .into()
    })
    .unwrap_or(FfiFailureKind::Local)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `tuneshare_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            drop_c_string(req.path);
            drop_c_string(req.body);
            for h in reclaim_slice(req.headers, req.headers_len) {
                drop_c_string(h.key);
                drop_c_string(h.value);
            }
            for p in reclaim_slice(req.parts, req.parts_len) {
                drop_c_string(p.name);
                drop_c_string(p.text);
                drop_c_string(p.uri);
                drop_c_string(p.file_name);
                drop_c_string(p.mime_type);
            }
        }
    });
}

/// Free a string returned by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tuneshare_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| unsafe { drop_c_string(s) });
}
