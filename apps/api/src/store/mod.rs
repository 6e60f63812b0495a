//! Store collaborators — a keyed document collection and an opaque blob
//! store for photos.
//!
//! Semantics are deliberately loose: last-write-wins by id, deleting a
//! nonexistent id is a no-op, and no transaction spans the two stores. A
//! document whose `photo_id` dangles stays valid; the display layer shows a
//! placeholder.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::document::StoredDocument;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn add(&self, document: StoredDocument);
    /// Replaces the document with this id, or inserts it if absent.
    async fn update(&self, id: Uuid, document: StoredDocument);
    /// No-op when the id does not exist.
    async fn delete(&self, id: Uuid);
    async fn get(&self, id: Uuid) -> Option<StoredDocument>;
    /// Insertion order.
    async fn list(&self) -> Vec<StoredDocument>;
}

#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn store(&self, blob: Bytes, owner: Uuid) -> Uuid;
    async fn get(&self, id: Uuid) -> Option<Bytes>;
    /// No-op when the id does not exist.
    async fn delete(&self, id: Uuid);
    async fn delete_all_for_owner(&self, owner: Uuid);
}

/// Insertion-ordered in-memory document collection.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<StoredDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn add(&self, document: StoredDocument) {
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => documents.push(document),
        }
    }

    async fn update(&self, id: Uuid, mut document: StoredDocument) {
        document.id = id;
        self.add(document).await;
    }

    async fn delete(&self, id: Uuid) {
        self.documents.write().await.retain(|d| d.id != id);
    }

    async fn get(&self, id: Uuid) -> Option<StoredDocument> {
        self.documents
            .read()
            .await
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    async fn list(&self) -> Vec<StoredDocument> {
        self.documents.read().await.clone()
    }
}

#[derive(Default)]
pub struct InMemoryAttachmentStore {
    blobs: RwLock<HashMap<Uuid, (Uuid, Bytes)>>,
}

impl InMemoryAttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttachmentStore for InMemoryAttachmentStore {
    async fn store(&self, blob: Bytes, owner: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        self.blobs.write().await.insert(id, (owner, blob));
        id
    }

    async fn get(&self, id: Uuid) -> Option<Bytes> {
        self.blobs.read().await.get(&id).map(|(_, blob)| blob.clone())
    }

    async fn delete(&self, id: Uuid) {
        self.blobs.write().await.remove(&id);
    }

    async fn delete_all_for_owner(&self, owner: Uuid) {
        self.blobs.write().await.retain(|_, (o, _)| *o != owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeDocument;

    fn document(title: &str) -> StoredDocument {
        StoredDocument::new(title.to_string(), ResumeDocument::default())
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = InMemoryDocumentStore::new();
        store.add(document("first")).await;
        store.add(document("second")).await;
        store.add(document("third")).await;

        let titles: Vec<String> = store.list().await.into_iter().map(|d| d.title).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_update_is_last_write_wins() {
        let store = InMemoryDocumentStore::new();
        let doc = document("original");
        let id = doc.id;
        store.add(doc).await;

        let mut replacement = document("replacement");
        replacement.id = id;
        store.update(id, replacement).await;

        assert_eq!(store.get(id).await.unwrap().title, "replacement");
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_a_noop() {
        let store = InMemoryDocumentStore::new();
        store.add(document("kept")).await;
        store.delete(Uuid::new_v4()).await;
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_attachment_round_trip_and_owner_cleanup() {
        let store = InMemoryAttachmentStore::new();
        let owner = Uuid::new_v4();
        let other_owner = Uuid::new_v4();

        let id = store.store(Bytes::from_static(b"photo-bytes"), owner).await;
        let kept = store.store(Bytes::from_static(b"other"), other_owner).await;
        assert_eq!(store.get(id).await.unwrap(), Bytes::from_static(b"photo-bytes"));

        store.delete_all_for_owner(owner).await;
        assert!(store.get(id).await.is_none());
        assert!(store.get(kept).await.is_some());
    }

    #[tokio::test]
    async fn test_dangling_photo_reference_leaves_document_valid() {
        let documents = InMemoryDocumentStore::new();
        let attachments = InMemoryAttachmentStore::new();

        let mut doc = document("with photo");
        let photo_id = attachments.store(Bytes::from_static(b"img"), doc.id).await;
        doc.photo_id = Some(photo_id);
        let id = doc.id;
        documents.add(doc).await;

        // Attachment store failure or cleanup must not block document reads
        attachments.delete(photo_id).await;
        let fetched = documents.get(id).await.unwrap();
        assert_eq!(fetched.photo_id, Some(photo_id));
        assert!(attachments.get(photo_id).await.is_none());
    }
}
