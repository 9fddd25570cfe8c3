//! The authenticated API client.
//!
//! # Design
//! `ApiClient` owns the backend base path and the current bearer token. It is
//! a cheap handle: clones share the same token cell, so a handle injected into
//! a service and the process-wide `ApiClient::instance()` observe the same
//! session. Every verb shares one header assembly step, which reads the token
//! exactly once; a token change never alters a request that was already built.
//!
//! Each verb has a `build_*` twin that stops before the network, for hosts
//! that execute requests themselves.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::form::{encode_form, FormPayload};
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, RequestBody, APPLICATION_JSON, AUTHORIZATION,
    CONTENT_TYPE, MULTIPART_FORM_DATA,
};
use crate::transport::{ReqwestTransport, Transport};

static INSTANCE: OnceLock<ApiClient> = OnceLock::new();

/// Body handed to `build_request` before header defaults are applied.
#[derive(Debug)]
pub enum Payload<'a, T: Serialize + ?Sized = serde_json::Value> {
    None,
    Json(&'a T),
    Form(&'a FormPayload),
}

#[derive(Clone)]
pub struct ApiClient {
    base_path: String,
    authorization: Arc<RwLock<String>>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_path", &self.base_path)
            .field("authorized", &!self.authorization().is_empty())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Client for `base_path` using the default reqwest transport.
    pub fn new(base_path: &str) -> Self {
        Self::with_transport(base_path, Arc::new(ReqwestTransport::default()))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_path())
    }

    pub fn with_transport(base_path: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
            authorization: Arc::new(RwLock::new(String::new())),
            transport,
        }
    }

    /// The process-wide client, built from the environment on first use.
    pub fn instance() -> &'static ApiClient {
        INSTANCE.get_or_init(|| {
            let config = ClientConfig::from_env();
            tracing::debug!(base_path = %config.base_path(), "initializing shared api client");
            ApiClient::from_config(&config)
        })
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Replace the bearer token for every request built from now on.
    pub fn set_authorization(&self, token: impl Into<String>) {
        let mut slot = self
            .authorization
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = token.into();
    }

    /// Forget the bearer token. Requests still carry an empty `Bearer ` value.
    pub fn clear_authorization(&self) {
        self.set_authorization(String::new());
    }

    pub fn authorization(&self) -> String {
        self.authorization
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True when both handles share one token cell.
    pub fn shares_state_with(&self, other: &ApiClient) -> bool {
        Arc::ptr_eq(&self.authorization, &other.authorization)
    }

    /// Build a request descriptor without sending it.
    ///
    /// `Content-Type` defaults to `application/json`; `overrides` replace
    /// same-named headers or are appended. Form payloads always get
    /// `multipart/form-data`. `Authorization` always reflects the stored token.
    pub fn build_request<T: Serialize + ?Sized>(
        &self,
        path: &str,
        method: HttpMethod,
        payload: Payload<'_, T>,
        overrides: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        let body = match payload {
            Payload::None => None,
            Payload::Json(value) => Some(RequestBody::Json(
                serde_json::to_string(value).map_err(ApiError::Serialization)?,
            )),
            Payload::Form(form) => Some(RequestBody::Multipart(encode_form(form))),
        };
        Ok(self.assemble(path, method, body, overrides))
    }

    pub fn build_get(&self, path: &str) -> HttpRequest {
        self.build_bodiless(path, HttpMethod::Get)
    }

    pub fn build_post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpRequest, ApiError> {
        self.build_request(path, HttpMethod::Post, Payload::Json(body), &[])
    }

    pub fn build_post_form(&self, path: &str, form: &FormPayload) -> HttpRequest {
        self.build_form(path, HttpMethod::Post, form)
    }

    pub fn build_patch<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpRequest, ApiError> {
        self.build_request(path, HttpMethod::Patch, Payload::Json(body), &[])
    }

    pub fn build_patch_form(&self, path: &str, form: &FormPayload) -> HttpRequest {
        self.build_form(path, HttpMethod::Patch, form)
    }

    pub fn build_put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpRequest, ApiError> {
        self.build_request(path, HttpMethod::Put, Payload::Json(body), &[])
    }

    pub fn build_delete(&self, path: &str) -> HttpRequest {
        self.build_bodiless(path, HttpMethod::Delete)
    }

    /// Build and execute a request. The response is returned as received.
    pub async fn send<T: Serialize + ?Sized>(
        &self,
        path: &str,
        method: HttpMethod,
        payload: Payload<'_, T>,
        overrides: &[(&str, &str)],
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(path, method, payload, overrides)?;
        self.execute(request).await
    }

    /// Execute an already built request.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.execute(request).await
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_get(path)).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_post(path, body)?).await
    }

    pub async fn post_form(&self, path: &str, form: &FormPayload) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_post_form(path, form)).await
    }

    pub async fn patch<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_patch(path, body)?).await
    }

    pub async fn patch_form(&self, path: &str, form: &FormPayload) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_patch_form(path, form)).await
    }

    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_put(path, body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<HttpResponse, ApiError> {
        self.execute(self.build_delete(path)).await
    }

    fn build_bodiless(&self, path: &str, method: HttpMethod) -> HttpRequest {
        self.assemble(path, method, None, &[])
    }

    fn build_form(&self, path: &str, method: HttpMethod, form: &FormPayload) -> HttpRequest {
        self.assemble(path, method, Some(RequestBody::Multipart(encode_form(form))), &[])
    }

    fn assemble(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<RequestBody>,
        overrides: &[(&str, &str)],
    ) -> HttpRequest {
        let mut headers = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
        for (name, value) in overrides {
            if name.eq_ignore_ascii_case(AUTHORIZATION) {
                continue;
            }
            set_header(&mut headers, name, value);
        }
        if matches!(body, Some(RequestBody::Multipart(_))) {
            set_header(&mut headers, CONTENT_TYPE, MULTIPART_FORM_DATA);
        }
        // read once: the request keeps this token even if it changes later
        let bearer = format!("Bearer {}", self.authorization());
        set_header(&mut headers, AUTHORIZATION, &bearer);

        HttpRequest {
            method,
            path: format!("{}{}", self.base_path, path),
            headers,
            body,
        }
    }
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(name)) {
        Some(slot) => slot.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}
