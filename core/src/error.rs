//! Error types for the posts API client.
//!
//! # Design
//! Two families of variants. Validation errors (`MissingFields`, `EmptyQuery`)
//! fire while a request is being built — before anything touches the network —
//! so callers can surface the rejection without a round-trip. Request errors
//! cover everything after the wire: `NotFound` gets a dedicated variant because
//! callers distinguish "the post does not exist" from other failures, and
//! `UnexpectedFormat` marks the sort endpoint's "valid JSON, wrong shape"
//! outcome, which is not a parse failure.

use std::fmt;

/// Errors returned by `PostClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// One of title, content, or author was empty. No request was built.
    MissingFields,

    /// The search query was empty. No request was built.
    EmptyQuery,

    /// The server returned 404 — the requested post does not exist.
    NotFound,

    /// The server returned a non-2xx status other than 404.
    HttpError { status: u16, body: String },

    /// The body parsed as JSON but was not the array the endpoint promises.
    UnexpectedFormat,

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl ApiError {
    /// True for errors raised before any request was built.
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::MissingFields | ApiError::EmptyQuery)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingFields => {
                write!(f, "title, content, and author are required")
            }
            ApiError::EmptyQuery => write!(f, "search query is empty"),
            ApiError::NotFound => write!(f, "post not found"),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::UnexpectedFormat => {
                write!(f, "unexpected response format from server")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
