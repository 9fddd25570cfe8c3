//! Multipart form payloads for upload endpoints.
//!
//! # Design
//! A payload is an ordered list of keys, each holding either a text value,
//! a file reference, or nothing. `encode_form` walks it once, in insertion
//! order, and emits a part for every present value. Files stay references
//! (`uri`, filename, media type) until a transport reads them.

use serde::{Deserialize, Serialize};

/// A local resource to upload: where it lives, what to call it, what it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileField {
    pub uri: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl FileField {
    pub fn new(uri: impl Into<String>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FileField),
}

/// Ordered key/value input for `post_form` and `patch_form`.
///
/// Re-inserting an existing key replaces its value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    entries: Vec<(String, Option<FormValue>)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scalar, stored as its string rendering.
    pub fn text(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, Some(FormValue::Text(value.to_string())));
        self
    }

    pub fn file(mut self, key: impl Into<String>, file: FileField) -> Self {
        self.insert(key, Some(FormValue::File(file)));
        self
    }

    /// Add a scalar that may be absent. Absent keys produce no part.
    pub fn optional_text<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.insert(key, value.map(|v| FormValue::Text(v.to_string())));
        self
    }

    pub fn optional_file(mut self, key: impl Into<String>, file: Option<FileField>) -> Self {
        self.insert(key, file.map(FormValue::File));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<FormValue>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&FormValue>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_ref()))
    }
}

/// One named part of an encoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

impl FormPart {
    pub fn is_file(&self) -> bool {
        matches!(self.value, FormValue::File(_))
    }
}

/// Encoded multipart body: the parts in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn part(&self, name: &str) -> Option<&FormPart> {
        self.parts.iter().find(|part| part.name == name)
    }
}

/// Encode a payload into multipart parts, skipping absent values.
pub fn encode_form(payload: &FormPayload) -> MultipartForm {
    let parts = payload
        .entries()
        .filter_map(|(name, value)| {
            value.map(|value| FormPart {
                name: name.to_string(),
                value: value.clone(),
            })
        })
        .collect();
    MultipartForm { parts }
}
