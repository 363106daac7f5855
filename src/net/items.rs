//! Typed helpers for the generic item endpoints (sale items, brands,
//! orders, profiles).
//!
//! ERROR HANDLING
//! ==============
//! Read paths wrap any failure into a fixed user-facing message and discard
//! the cause. Mutating paths log the cause and surface the HTTP status. A
//! 404 on a get-by-id is an absent result, not an error. Every call flows
//! through the authenticated fetch, so the silent-refresh retry applies
//! uniformly.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::net::fetch::ApiClient;

const GET_ITEMS_FAILED: &str = "can not get your items";
const GET_ITEM_FAILED: &str = "can not get your item";
const DELETE_ITEM_FAILED: &str = "can not delete your item";
const ADD_ITEM_FAILED: &str = "can not add your item";
const EDIT_ITEM_FAILED: &str = "can not edit your item";

// =============================================================================
// REQUEST BODIES
// =============================================================================

/// One part of a multipart form, owned so a retry can rebuild the form.
#[derive(Debug, Clone)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, filename: String, mime: String, bytes: Vec<u8> },
}

impl FormPart {
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text { name: name.into(), value: value.into() }
    }

    #[must_use]
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self::File { name: name.into(), filename: filename.into(), mime: mime.into(), bytes }
    }
}

/// Body of an add/edit call. JSON bodies go out with an explicit
/// `Content-Type: application/json`; multipart bodies carry no explicit
/// content-type header — reqwest supplies the boundary-bearing one.
#[derive(Debug, Clone)]
pub enum Body {
    Json(serde_json::Value),
    Form(Vec<FormPart>),
}

impl Body {
    /// JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// [`ApiError::Network`] when the value cannot be serialized.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Json(value) => builder.json(value),
            Self::Form(parts) => builder.multipart(build_form(parts)),
        }
    }
}

fn build_form(parts: &[FormPart]) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File { name, filename, mime, bytes } => {
                let file = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(filename.clone())
                    .mime_str(mime)
                    .unwrap_or_else(|_| {
                        // Unparseable mime string: let the server sniff it.
                        reqwest::multipart::Part::bytes(bytes.clone()).file_name(filename.clone())
                    });
                form.part(name.clone(), file)
            }
        };
    }
    form
}

// =============================================================================
// ITEM ENDPOINTS
// =============================================================================

impl ApiClient {
    /// Fetch a collection.
    ///
    /// # Errors
    ///
    /// Any failure — transport, status, or parse — collapses into a single
    /// fixed-message [`ApiError::Network`].
    pub async fn get_items<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let url = self.config().url(path);
        let response = self
            .send(|c| c.get(&url))
            .await
            .map_err(|_| ApiError::Network(GET_ITEMS_FAILED.into()))?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|_| ApiError::Network(GET_ITEMS_FAILED.into()))
    }

    /// Fetch one item by id. A 404 is an absent result, not an error.
    ///
    /// # Errors
    ///
    /// Fixed-message [`ApiError::Network`] on any other failure.
    pub async fn get_item_by_id<T: DeserializeOwned>(
        &self,
        path: &str,
        id: &str,
    ) -> Result<Option<T>, ApiError> {
        let url = format!("{}/{id}", self.config().url(path));
        let response = self
            .send(|c| c.get(&url))
            .await
            .map_err(|_| ApiError::Network(GET_ITEM_FAILED.into()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|_| ApiError::Network(GET_ITEM_FAILED.into()))
    }

    /// Delete one item by id, returning the response status code.
    ///
    /// # Errors
    ///
    /// Fixed-message [`ApiError::Network`] on transport failure.
    pub async fn delete_item_by_id(&self, path: &str, id: &str) -> Result<u16, ApiError> {
        let url = format!("{}/{id}", self.config().url(path));
        let response = self
            .send(|c| c.delete(&url))
            .await
            .map_err(|_| ApiError::Network(DELETE_ITEM_FAILED.into()))?;
        Ok(response.status().as_u16())
    }

    /// Create an item with a JSON or multipart body.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unexpected`] on a non-success status;
    /// [`ApiError::Network`] (cause logged) on transport or parse failure.
    pub async fn add_item<T: DeserializeOwned>(&self, path: &str, body: Body) -> Result<T, ApiError> {
        let url = self.config().url(path);
        self.mutate(|c| body.apply(c.post(&url)), ADD_ITEM_FAILED).await
    }

    /// Update an item by id with a JSON or multipart body.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unexpected`] on a non-success status;
    /// [`ApiError::Network`] (cause logged) on transport or parse failure.
    pub async fn edit_item<T: DeserializeOwned>(
        &self,
        path: &str,
        id: &str,
        body: Body,
    ) -> Result<T, ApiError> {
        let url = format!("{}/{id}", self.config().url(path));
        self.mutate(|c| body.apply(c.put(&url)), EDIT_ITEM_FAILED).await
    }

    async fn mutate<T, F>(&self, build: F, fixed_message: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let response = self.send(build).await.map_err(|e| {
            tracing::error!(error = %e, "item mutation failed");
            ApiError::Network(fixed_message.into())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "item mutation rejected");
            return Err(ApiError::Unexpected { status: status.as_u16() });
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, "item mutation response parse failed");
            ApiError::Network(fixed_message.into())
        })
    }
}

#[cfg(test)]
#[path = "items_test.rs"]
mod items_test;
