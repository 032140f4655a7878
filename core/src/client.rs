//! Stateless HTTP request builder and response parser for the posts API.
//!
//! # Design
//! `PostClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! caller executes the actual HTTP round-trip, keeping the core deterministic
//! and free of I/O dependencies.
//!
//! Presence validation happens in the `build_*` methods: an incomplete payload
//! or empty search query is rejected before a request value exists, so no
//! network traffic can result from an invalid action.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Post, PostInput, SearchField, SortDirection, SortField};

/// Synchronous, stateless client for the posts API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct PostClient {
    base_url: String,
}

impl PostClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_posts(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/posts", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_sort_posts(&self, field: SortField, direction: SortDirection) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!(
                "{}/posts?direction={}&sort={}",
                self.base_url,
                direction.as_str(),
                field.as_str()
            ),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Rejects an empty query with `ApiError::EmptyQuery` before any request
    /// value is created. The query is spliced into the query string verbatim,
    /// matching the server's plain substring matching.
    pub fn build_search_posts(
        &self,
        field: SearchField,
        query: &str,
    ) -> Result<HttpRequest, ApiError> {
        if query.is_empty() {
            return Err(ApiError::EmptyQuery);
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/posts/search?{}={}", self.base_url, field.as_str(), query),
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_create_post(&self, input: &PostInput) -> Result<HttpRequest, ApiError> {
        if !input.is_complete() {
            return Err(ApiError::MissingFields);
        }
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/posts", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Same payload and validation as create; the target id goes in the path.
    pub fn build_update_post(&self, id: u64, input: &PostInput) -> Result<HttpRequest, ApiError> {
        if !input.is_complete() {
            return Err(ApiError::MissingFields);
        }
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/posts/{id}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_delete_post(&self, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/posts/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Like list, but a body that is valid JSON without being an array maps to
    /// `ApiError::UnexpectedFormat` so callers can tell a misbehaving server
    /// apart from an unreachable one.
    pub fn parse_sort_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        check_status(&response)?;
        let value: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        if !value.is_array() {
            return Err(ApiError::UnexpectedFormat);
        }
        serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// An empty result array is a normal outcome here, not an error; the
    /// caller decides how to report "nothing matched".
    pub fn parse_search_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_update_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Any 2xx is success; the server's message body is ignored.
    pub fn parse_delete_post(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
