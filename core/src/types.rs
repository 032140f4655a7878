//! Domain DTOs and typed query parameters for the blog posts API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently from
//! the mock-server crate; integration tests catch any schema drift between the
//! two. `id`, `created`, and `updated` are server-owned — the client never
//! fabricates them, so the request payload (`PostInput`) carries only the
//! user-editable fields.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single blog post returned by the API.
///
/// Dates are ISO-8601 calendar dates on the wire (`"2024-01-01"`). `updated`
/// stays `None` until the server applies its first update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<NaiveDate>,
}

/// Request payload for creating or updating a post.
///
/// Create and update send the same three fields; the server fills in `id`,
/// `created`, and `updated` itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub author: String,
}

impl PostInput {
    /// True when every required field is non-empty. The client refuses to
    /// build a request for an incomplete payload.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.content.is_empty() && !self.author.is_empty()
    }
}

/// Field accepted by the `sort` query parameter of `GET /posts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Content,
    Author,
    Created,
    Updated,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Content => "content",
            SortField::Author => "author",
            SortField::Created => "created",
            SortField::Updated => "updated",
        }
    }
}

impl FromStr for SortField {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortField::Title),
            "content" => Ok(SortField::Content),
            "author" => Ok(SortField::Author),
            "created" => Ok(SortField::Created),
            "updated" => Ok(SortField::Updated),
            other => Err(ParseFieldError(other.to_string())),
        }
    }
}

/// Direction accepted by the `direction` query parameter of `GET /posts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ParseFieldError(other.to_string())),
        }
    }
}

/// Field a search query runs against (`GET /posts/search?{field}={query}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Content,
    Author,
}

impl SearchField {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Content => "content",
            SearchField::Author => "author",
        }
    }
}

impl FromStr for SearchField {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SearchField::Title),
            "content" => Ok(SearchField::Content),
            "author" => Ok(SearchField::Author),
            other => Err(ParseFieldError(other.to_string())),
        }
    }
}

/// A string did not name a known sort/search field or direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFieldError(pub String);

impl fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field or direction: {}", self.0)
    }
}

impl std::error::Error for ParseFieldError {}
