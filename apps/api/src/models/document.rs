use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::resume::ResumeDocument;

/// A résumé document as held by the document store. The photo is an opaque
/// attachment reference; a dangling `photo_id` never invalidates the
/// document — the display layer shows a placeholder instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: Uuid,
    pub title: String,
    pub resume: ResumeDocument,
    #[serde(default)]
    pub photo_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredDocument {
    pub fn new(title: String, resume: ResumeDocument) -> Self {
        let now = Utc::now();
        StoredDocument {
            id: Uuid::new_v4(),
            title,
            resume,
            photo_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
