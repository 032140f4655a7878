//! In-memory implementation of the blog posts API, used by integration tests
//! and for local development.
//!
//! Matches the real backend's observable behavior: integer autoincrement ids,
//! ISO calendar dates for `created`/`updated`, 400 + `{"error": ...}` on bad
//! sort parameters or missing required fields, 404 + `{"error": ...}` for
//! unknown ids, and 200 + `{"message": ...}` on delete.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created: NaiveDate,
    pub updated: Option<NaiveDate>,
}

/// Create payload. Fields default to empty so presence validation can answer
/// with the backend's 400 message instead of axum's 422.
#[derive(Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
}

/// Update payload. Only the fields present in the JSON are applied; omitted
/// fields remain unchanged on the server.
#[derive(Deserialize)]
pub struct UpdateInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    posts: BTreeMap<u64, Post>,
}

pub type Db = Arc<RwLock<Store>>;

type ApiRejection = (StatusCode, Json<Value>);

const SORT_FIELDS: [&str; 6] = ["id", "title", "content", "author", "created", "updated"];

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/search", get(search_posts))
        .route("/posts/{id}", put(update_post).delete(delete_post))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn bad_request(message: String) -> ApiRejection {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found(id: u64) -> ApiRejection {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("No post found with ID {id}.") })),
    )
}

async fn list_posts(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Post>>, ApiRejection> {
    let sort = params.get("sort");
    let direction = params.get("direction").map(String::as_str).unwrap_or("asc");

    if let Some(sort) = sort {
        if !SORT_FIELDS.contains(&sort.as_str()) {
            return Err(bad_request(format!(
                "Invalid sort field. Valid options are: {}.",
                SORT_FIELDS.join(", ")
            )));
        }
    }
    if direction != "asc" && direction != "desc" {
        return Err(bad_request(
            "Invalid direction. Valid options are 'asc' or 'desc'.".to_string(),
        ));
    }

    let store = db.read().await;
    let mut posts: Vec<Post> = store.posts.values().cloned().collect();
    if let Some(sort) = sort {
        sort_posts(&mut posts, sort);
        if direction == "desc" {
            posts.reverse();
        }
    }
    Ok(Json(posts))
}

fn sort_posts(posts: &mut [Post], field: &str) {
    match field {
        "id" => posts.sort_by_key(|p| p.id),
        "title" => posts.sort_by(|a, b| a.title.cmp(&b.title)),
        "content" => posts.sort_by(|a, b| a.content.cmp(&b.content)),
        "author" => posts.sort_by(|a, b| a.author.cmp(&b.author)),
        "created" => posts.sort_by_key(|p| p.created),
        "updated" => posts.sort_by_key(|p| p.updated),
        _ => unreachable!("sort field validated by caller"),
    }
}

/// First required field missing from the payload, capitalized for the error
/// message, in title/content/author order.
fn first_missing_field(input: &PostInput) -> Option<&'static str> {
    if input.title.is_empty() {
        Some("Title")
    } else if input.content.is_empty() {
        Some("Content")
    } else if input.author.is_empty() {
        Some("Author")
    } else {
        None
    }
}

async fn create_post(
    State(db): State<Db>,
    Json(input): Json<PostInput>,
) -> Result<(StatusCode, Json<Post>), ApiRejection> {
    if let Some(field) = first_missing_field(&input) {
        return Err(bad_request(format!("{field} is required.")));
    }

    let mut store = db.write().await;
    store.next_id += 1;
    let post = Post {
        id: store.next_id,
        title: input.title,
        content: input.content,
        author: input.author,
        created: today(),
        updated: None,
    };
    store.posts.insert(post.id, post.clone());
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateInput>,
) -> Result<Json<Post>, ApiRejection> {
    let mut store = db.write().await;
    let post = store.posts.get_mut(&id).ok_or_else(|| not_found(id))?;
    if let Some(title) = input.title {
        post.title = title;
    }
    if let Some(content) = input.content {
        post.content = content;
    }
    if let Some(author) = input.author {
        post.author = author;
    }
    post.updated = Some(today());
    Ok(Json(post.clone()))
}

async fn delete_post(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiRejection> {
    let mut store = db.write().await;
    store.posts.remove(&id).ok_or_else(|| not_found(id))?;
    Ok(Json(json!({
        "message": format!("Post with ID {id} has been deleted successfully.")
    })))
}

async fn search_posts(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Post>>, ApiRejection> {
    let store = db.read().await;
    let mut results: Vec<Post> = store.posts.values().cloned().collect();
    for (field, value) in &params {
        let needle = value.to_lowercase();
        match field.as_str() {
            "title" => results.retain(|p| p.title.to_lowercase().contains(&needle)),
            "content" => results.retain(|p| p.content.to_lowercase().contains(&needle)),
            "author" => results.retain(|p| p.author.to_lowercase().contains(&needle)),
            other => {
                return Err(bad_request(format!("Cannot search by field: {other}.")));
            }
        }
    }
    Ok(Json(results))
}
