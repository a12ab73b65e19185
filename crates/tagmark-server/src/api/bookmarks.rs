//! Bookmark CRUD endpoints
//!
//! Handlers only translate HTTP into store calls; tagging, classification
//! and persistence all happen inside [`tagmark_core::Store`].

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tagmark_core::{Bookmark, BookmarkDraft, BookmarkPatch};
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Body of `POST /bookmark` and each item of a batch
///
/// Everything is optional at the wire level so a missing `url` can be
/// reported as a 400 rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct NewBookmarkRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewBookmarkRequest {
    fn into_draft(self) -> Result<BookmarkDraft, ApiError> {
        let url = self
            .url
            .ok_or_else(|| ApiError::BadRequest("URL is required".to_string()))?;
        Ok(BookmarkDraft::new(url)
            .with_title(self.title.unwrap_or_default())
            .with_tags(self.tags.unwrap_or_default())
            .with_category(self.category))
    }
}

/// Body of `POST /bookmarks/batch`
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub bookmarks: Option<Vec<NewBookmarkRequest>>,
}

#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    pub message: String,
    pub bookmark: Bookmark,
}

#[derive(Debug, Serialize)]
pub struct BookmarkListResponse {
    pub bookmarks: Vec<Bookmark>,
}

impl<'a> FromIterator<&'a Bookmark> for BookmarkListResponse {
    fn from_iter<I: IntoIterator<Item = &'a Bookmark>>(iter: I) -> Self {
        Self {
            bookmarks: iter.into_iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub message: String,
    pub bookmarks: Vec<Bookmark>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /bookmark
pub async fn add_bookmark(
    State(state): State<AppState>,
    body: Result<Json<NewBookmarkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookmarkResponse>), ApiError> {
    let Json(request) = body.map_err(|_| ApiError::BadRequest("URL is required".to_string()))?;
    let draft = request.into_draft()?;

    let bookmark = state.with_store(move |store| store.add(draft)).await??;

    Ok((
        StatusCode::CREATED,
        Json(BookmarkResponse {
            message: "Bookmark processed successfully".to_string(),
            bookmark,
        }),
    ))
}

/// POST /bookmarks/batch
///
/// Every item is validated before any is added, so a bad item leaves the
/// collection untouched.
pub async fn add_bookmarks_batch(
    State(state): State<AppState>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    let items = body
        .ok()
        .and_then(|Json(request)| request.bookmarks)
        .ok_or_else(|| ApiError::BadRequest("Bookmarks array is required".to_string()))?;

    let drafts = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            item.into_draft().map_err(|_| {
                ApiError::BadRequest(format!("URL is required (bookmark {})", index))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let bookmarks = state
        .with_store(move |store| store.add_batch(drafts))
        .await??;

    Ok((
        StatusCode::CREATED,
        Json(BatchResponse {
            message: format!("Successfully processed {} bookmarks", bookmarks.len()),
            bookmarks,
        }),
    ))
}

/// GET /bookmarks
pub async fn list_bookmarks(State(state): State<AppState>) -> Json<BookmarkListResponse> {
    let store = state.store.lock().await;
    Json(store.all().iter().collect())
}

/// GET /bookmarks/category/:category
pub async fn list_bookmarks_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<BookmarkListResponse> {
    let store = state.store.lock().await;
    Json(store.by_category(&category).into_iter().collect())
}

/// GET /bookmarks/tag/:tag
pub async fn list_bookmarks_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Json<BookmarkListResponse> {
    let store = state.store.lock().await;
    Json(store.by_tag(&tag).into_iter().collect())
}

/// DELETE /bookmark/*url
///
/// 404 carries a `message` rather than an `error`, matching the success body.
pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(url): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let target = url.clone();
    let removed = state
        .with_store(move |store| store.remove(&target))
        .await??;
    debug!(url = %url, removed, "Delete request");

    let (status, message) = if removed {
        (StatusCode::OK, "Bookmark deleted successfully")
    } else {
        (StatusCode::NOT_FOUND, "Bookmark not found")
    };

    Ok((
        status,
        Json(MessageResponse {
            message: message.to_string(),
        }),
    ))
}

/// PUT /bookmark/*url
///
/// The body must be a non-empty JSON object; `{}` counts as missing.
pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(url): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BookmarkResponse>, ApiError> {
    let patch = parse_patch(body)?;

    let bookmark = state
        .with_store(move |store| store.update(&url, &patch))
        .await??
        .ok_or_else(|| ApiError::NotFound("Bookmark not found".to_string()))?;

    Ok(Json(BookmarkResponse {
        message: "Bookmark updated successfully".to_string(),
        bookmark,
    }))
}

fn parse_patch(body: Result<Json<Value>, JsonRejection>) -> Result<BookmarkPatch, ApiError> {
    let value = match body {
        Ok(Json(Value::Object(fields))) if !fields.is_empty() => Value::Object(fields),
        _ => return Err(ApiError::BadRequest("Request body is required".to_string())),
    };

    serde_json::from_value(value)
        .map_err(|e| ApiError::BadRequest(format!("Invalid update: {}", e)))
}
