//! Client core for the tuneshare music-sharing backend.
//!
//! # Overview
//! `ApiClient` holds the backend base path and the current bearer token and
//! builds every request the app makes: JSON by default, multipart for
//! uploads, always with an `Authorization: Bearer <token>` header (empty
//! before login). A `Transport` executes the requests; responses come back
//! unchanged and each caller decides what a status means.
//!
//! # Design
//! - `ApiClient::instance()` is the process-wide client; `ApiClient` handles
//!   can also be passed around explicitly and share the same token.
//! - `build_*` methods stop before I/O so a native host can run the request
//!   itself (see the `tuneshare-ffi` crate).
//! - Upload payloads use the `FormValue` sum type instead of probing fields.
//! - `Session` keeps the client token and durable storage in step.
//! - `services` holds the thin per-endpoint callers.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod services;
pub mod session;
pub mod transport;
pub mod types;

pub use client::{ApiClient, Payload};
pub use config::ClientConfig;
pub use error::{ApiError, FailureKind};
pub use form::{encode_form, FileField, FormPart, FormPayload, FormValue, MultipartForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore, TOKEN_KEY};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Page, PageRequest};
