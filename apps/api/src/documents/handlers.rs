//! Axum route handlers for document CRUD and photo attachments.
//!
//! Plain keyed-collection semantics: last-write-wins by id, deletes are
//! idempotent. Photo failures never block document operations.

use axum::{
    extract::{Path, State},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::StoredDocument;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub resume: ResumeDocument,
}

/// GET /api/v1/documents
pub async fn handle_list(State(state): State<AppState>) -> Json<Vec<StoredDocument>> {
    Json(state.documents.list().await)
}

/// POST /api/v1/documents
pub async fn handle_create(
    State(state): State<AppState>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<Json<StoredDocument>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    let document = StoredDocument::new(request.title.trim().to_string(), request.resume);
    state.documents.add(document.clone()).await;
    Ok(Json(document))
}

/// GET /api/v1/documents/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredDocument>, AppError> {
    state
        .documents
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))
}

/// PUT /api/v1/documents/:id
///
/// Last-write-wins replacement. The photo reference and creation time of an
/// existing document survive the update.
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<Json<StoredDocument>, AppError> {
    let existing = state.documents.get(id).await;
    let document = StoredDocument {
        id,
        title: request.title.trim().to_string(),
        resume: request.resume,
        photo_id: existing.as_ref().and_then(|d| d.photo_id),
        created_at: existing.map(|d| d.created_at).unwrap_or_else(Utc::now),
        updated_at: Utc::now(),
    };
    state.documents.update(id, document.clone()).await;
    Ok(Json(document))
}

/// DELETE /api/v1/documents/:id
///
/// Idempotent; also drops any photos owned by the document.
pub async fn handle_delete(State(state): State<AppState>, Path(id): Path<Uuid>) {
    state.documents.delete(id).await;
    state.attachments.delete_all_for_owner(id).await;
}

/// POST /api/v1/documents/:id/photo
///
/// Stores the raw body as the document's photo, replacing any previous one.
pub async fn handle_store_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut document = state
        .documents
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;

    if body.is_empty() {
        return Err(AppError::Validation("photo body cannot be empty".to_string()));
    }

    if let Some(old) = document.photo_id {
        state.attachments.delete(old).await;
    }
    let photo_id = state.attachments.store(body, id).await;
    document.photo_id = Some(photo_id);
    document.updated_at = Utc::now();
    state.documents.update(id, document).await;

    Ok(Json(serde_json::json!({ "photo_id": photo_id })))
}

/// GET /api/v1/documents/:id/photo
///
/// A dangling photo reference returns 404 here but the document itself
/// stays readable — the client renders a placeholder.
pub async fn handle_get_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Bytes, AppError> {
    let document = state
        .documents
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;

    let photo_id = document
        .photo_id
        .ok_or_else(|| AppError::NotFound(format!("Document {id} has no photo")))?;

    state
        .attachments
        .get(photo_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Photo {photo_id} not found")))
}

/// DELETE /api/v1/documents/:id/photo
pub async fn handle_delete_photo(State(state): State<AppState>, Path(id): Path<Uuid>) {
    if let Some(document) = state.documents.get(id).await {
        if let Some(photo_id) = document.photo_id {
            state.attachments.delete(photo_id).await;
            let mut updated = document;
            updated.photo_id = None;
            updated.updated_at = Utc::now();
            state.documents.update(id, updated).await;
        }
    }
}
