//! Multipart intake and the request echo endpoint.

use axum::body::to_bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Failure;

/// One part of a received multipart body, as the echo endpoint reports it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    /// UTF-8 content of text parts; `None` for files.
    pub text: Option<String>,
    pub size: usize,
}

pub(crate) async fn read_parts(mut multipart: Multipart) -> Result<Vec<ReceivedPart>, Failure> {
    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| Failure::bad_request("malformed multipart body"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|_| Failure::bad_request("truncated multipart field"))?;
        let text = if file_name.is_none() {
            Some(String::from_utf8_lossy(&bytes).into_owned())
        } else {
            None
        };
        parts.push(ReceivedPart {
            name,
            file_name,
            content_type,
            text,
            size: bytes.len(),
        });
    }
    Ok(parts)
}

pub(crate) fn text_field<'a>(parts: &'a [ReceivedPart], name: &str) -> Option<&'a str> {
    parts
        .iter()
        .find(|p| p.name == name)
        .and_then(|p| p.text.as_deref())
}

/// Pretend to store an uploaded file and return where it would be served.
pub(crate) fn stored_file_url(parts: &[ReceivedPart], name: &str) -> Option<String> {
    parts
        .iter()
        .find(|p| p.name == name)
        .and_then(|p| p.file_name.as_deref())
        .map(|file_name| format!("/media/{}/{file_name}", Uuid::new_v4()))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub parts: Vec<ReceivedPart>,
}

/// Report exactly what arrived: method, headers, and body or multipart parts.
pub(crate) async fn echo(request: Request) -> Result<Json<Echo>, Failure> {
    let method = request.method().to_string();
    let path = request.uri().to_string();
    let headers: Vec<(String, String)> = request
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let (body, parts) = if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|_| Failure::bad_request("malformed multipart body"))?;
        (None, read_parts(multipart).await?)
    } else {
        let bytes = to_bytes(request.into_body(), usize::MAX)
            .await
            .map_err(|_| Failure::bad_request("unreadable body"))?;
        let body = (!bytes.is_empty()).then(|| String::from_utf8_lossy(&bytes).into_owned());
        (body, Vec::new())
    };

    Ok(Json(Echo {
        method,
        path,
        headers,
        body,
        parts,
    }))
}
