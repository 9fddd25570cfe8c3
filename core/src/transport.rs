//! Executes `HttpRequest` descriptors.
//!
//! # Design
//! `Transport` is the single I/O seam of the crate. `ReqwestTransport` is the
//! default; tests and native hosts substitute their own. A transport returns
//! every response it receives, whatever the status, and configures no retry
//! and no timeout of its own.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::error::ApiError;
use crate::form::{FormValue, MultipartForm};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody, CONTENT_TYPE};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            path,
            headers,
            body,
        } = request;

        let is_multipart = matches!(body, Some(RequestBody::Multipart(_)));
        let mut builder = self.client.request(reqwest_method(method), &path);
        for (name, value) in &headers {
            // reqwest writes its own multipart content type, boundary included
            if is_multipart && name.eq_ignore_ascii_case(CONTENT_TYPE) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match body {
            Some(RequestBody::Json(text)) => builder.body(text),
            Some(RequestBody::Multipart(form)) => builder.multipart(to_reqwest_form(form).await?),
            None => builder,
        };

        tracing::debug!(%method, %path, "sending request");
        let response = builder.send().await.map_err(ApiError::Transport)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(ApiError::Transport)?;
        tracing::debug!(%method, %path, status, "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

async fn to_reqwest_form(form: MultipartForm) -> Result<Form, ApiError> {
    let mut out = Form::new();
    for part in form.parts {
        out = match part.value {
            FormValue::Text(text) => out.text(part.name, text),
            FormValue::File(file) => {
                let bytes = tokio::fs::read(local_path(&file.uri))
                    .await
                    .map_err(|source| ApiError::Upload {
                        uri: file.uri.clone(),
                        source,
                    })?;
                let attachment = Part::bytes(bytes)
                    .file_name(file.name)
                    .mime_str(&file.mime_type)
                    .map_err(|err| ApiError::Upload {
                        uri: file.uri.clone(),
                        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, err),
                    })?;
                out.part(part.name, attachment)
            }
        };
    }
    Ok(out)
}

/// Strip a `file://` scheme; anything else is taken as a filesystem path.
fn local_path(uri: &str) -> &str {
    uri.strip_prefix("file://").unwrap_or(uri)
}
