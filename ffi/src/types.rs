//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length instead of `Vec`, and
//! enums with explicit discriminants. Conversions live here to keep `lib.rs`
//! focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use tuneshare_core::{FormValue, HttpMethod, HttpRequest, RequestBody};

/// Opaque handle to an `ApiClient`. Handles obtained from
/// `tuneshare_client_shared` all share one token.
pub struct FfiApiClient {
    pub(crate) inner: tuneshare_core::ApiClient,
}

/// Opaque handle to a form payload under construction.
pub struct FfiForm {
    pub(crate) inner: tuneshare_core::FormPayload,
}

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Patch = 2,
    Put = 3,
    Delete = 4,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Patch => FfiHttpMethod::Patch,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// Decode a method discriminant received from C. Unknown values are rejected
/// rather than transmuted.
pub(crate) fn method_from_raw(raw: u32) -> Option<HttpMethod> {
    match raw {
        0 => Some(HttpMethod::Get),
        1 => Some(HttpMethod::Post),
        2 => Some(HttpMethod::Patch),
        3 => Some(HttpMethod::Put),
        4 => Some(HttpMethod::Delete),
        _ => None,
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiPartKind {
    Text = 0,
    File = 1,
}

/// One multipart part. Text parts set `text`; file parts set `uri`,
/// `file_name`, and `mime_type`. Unused fields are null.
#[repr(C)]
pub struct FfiFormPart {
    pub kind: FfiPartKind,
    pub name: *mut c_char,
    pub text: *mut c_char,
    pub uri: *mut c_char,
    pub file_name: *mut c_char,
    pub mime_type: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// `body` is JSON text or null. `parts` is non-null only for multipart
/// requests; the host picks the boundary and completes the content type.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
    pub parts: *mut FfiFormPart,
    pub parts_len: u32,
}

/// Strings of one part, converted before anything is leaked.
struct OwnedPart {
    kind: FfiPartKind,
    name: CString,
    text: Option<CString>,
    uri: Option<CString>,
    file_name: Option<CString>,
    mime_type: Option<CString>,
}

fn c_string(s: String) -> Option<CString> {
    CString::new(s).ok()
}

fn into_raw_or_null(s: Option<CString>) -> *mut c_char {
    s.map_or(std::ptr::null_mut(), CString::into_raw)
}

/// Leak a vector as pointer + length; empty vectors become null.
fn leak_vec<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let boxed = items.into_boxed_slice();
    let len = boxed.len() as u32;
    (Box::into_raw(boxed) as *mut T, len)
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    ///
    /// Returns null if any string contains an interior NUL byte; nothing is
    /// leaked in that case.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        Self::convert(req).unwrap_or(std::ptr::null_mut())
    }

    fn convert(req: HttpRequest) -> Option<*mut Self> {
        let path = c_string(req.path)?;
        let headers: Vec<(CString, CString)> = req
            .headers
            .into_iter()
            .map(|(k, v)| Some((c_string(k)?, c_string(v)?)))
            .collect::<Option<_>>()?;
        let (body, parts) = match req.body {
            None => (None, Vec::new()),
            Some(RequestBody::Json(text)) => (Some(c_string(text)?), Vec::new()),
            Some(RequestBody::Multipart(form)) => {
                let parts = form
                    .parts
                    .into_iter()
                    .map(|part| {
                        let name = c_string(part.name)?;
                        Some(match part.value {
                            FormValue::Text(text) => OwnedPart {
                                kind: FfiPartKind::Text,
                                name,
                                text: Some(c_string(text)?),
                                uri: None,
                                file_name: None,
                                mime_type: None,
                            },
                            FormValue::File(file) => OwnedPart {
                                kind: FfiPartKind::File,
                                name,
                                text: None,
                                uri: Some(c_string(file.uri)?),
                                file_name: Some(c_string(file.name)?),
                                mime_type: Some(c_string(file.mime_type)?),
                            },
                        })
                    })
                    .collect::<Option<Vec<_>>>()?;
                (None, parts)
            }
        };

        let ffi_headers: Vec<FfiHeader> = headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: k.into_raw(),
                value: v.into_raw(),
            })
            .collect();
        let ffi_parts: Vec<FfiFormPart> = parts
            .into_iter()
            .map(|p| FfiFormPart {
                kind: p.kind,
                name: p.name.into_raw(),
                text: into_raw_or_null(p.text),
                uri: into_raw_or_null(p.uri),
                file_name: into_raw_or_null(p.file_name),
                mime_type: into_raw_or_null(p.mime_type),
            })
            .collect();
        let (headers, headers_len) = leak_vec(ffi_headers);
        let (parts, parts_len) = leak_vec(ffi_parts);

        Some(Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: path.into_raw(),
            headers,
            headers_len,
            body: into_raw_or_null(body),
            parts,
            parts_len,
        })))
    }
}

/// Reclaim a string leaked by this crate. Null is ignored.
///
/// # Safety
/// `s` must be null or a pointer from `CString::into_raw` not yet reclaimed.
pub(crate) unsafe fn drop_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Reclaim a slice leaked by `leak_vec`.
///
/// # Safety
/// `ptr`/`len` must come from `leak_vec` and not have been reclaimed yet.
pub(crate) unsafe fn reclaim_slice<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

/// Failure class for a response status, as a C enum. `None` means 2xx.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiFailureKind {
    None = 0,
    Transport = 1,
    Authentication = 2,
    Validation = 3,
    Server = 4,
    Local = 5,
}

impl From<tuneshare_core::FailureKind> for FfiFailureKind {
    fn from(kind: tuneshare_core::FailureKind) -> Self {
        use tuneshare_core::FailureKind;
        match kind {
            FailureKind::Transport => FfiFailureKind::Transport,
            FailureKind::Authentication => FfiFailureKind::Authentication,
            FailureKind::Validation => FfiFailureKind::Validation,
            FailureKind::Server => FfiFailureKind::Server,
            FailureKind::Local => FfiFailureKind::Local,
        }
    }
}
