//! # Edit Session
//!
//! One author's editing state for one document: the dual-view synchronizer,
//! the image resource map, undo history and the blob store that holds
//! uploaded images.

use crate::blob::{BlobRef, BlobStore, MemoryBlobStore};
use crate::history::History;
use crate::mutations::{Mutation, MutationResult};
use crate::store::{Article, NewArticle};
use crate::sync::{SyncEvent, Synchronizer, ViewMode};
use crate::tree::BlockTree;
use crate::EditorError;
use ednotes_blocks::{serialize, Document, ImageResourceMap, ValidationPolicy};
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct EditSession<B: BlobStore = MemoryBlobStore> {
    /// Key seeding block ids (file path, article id)
    key: String,

    sync: Synchronizer,
    resources: ImageResourceMap,
    history: History,
    blobs: B,

    /// Bumped whenever rendered output could change
    render_revision: u64,
}

impl EditSession<MemoryBlobStore> {
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_blob_store(key, MemoryBlobStore::new())
    }
}

impl<B: BlobStore> EditSession<B> {
    pub fn with_blob_store(key: impl Into<String>, blobs: B) -> Self {
        let key = key.into();
        Self {
            sync: Synchronizer::new(BlockTree::new(&key)),
            key,
            resources: ImageResourceMap::new(),
            history: History::new(),
            blobs,
            render_revision: 0,
        }
    }

    /// Start over with an empty document
    pub fn new_document(&mut self) {
        self.sync.reset(Document::new());
        self.resources = ImageResourceMap::new();
        self.history.clear();
        self.render_revision += 1;
    }

    /// Load raw text, rebuilding the resource map. Invalid text leaves the
    /// session as it was.
    pub fn load(&mut self, text: &str) -> Result<(), EditorError> {
        self.sync.load(text)?;
        self.resources = ImageResourceMap::from_document(self.sync.document());
        self.history.clear();
        self.render_revision += 1;
        info!(
            key = %self.key,
            blocks = self.sync.document().len(),
            resources = self.resources.len(),
            "session loaded document"
        );
        Ok(())
    }

    pub fn load_article(&mut self, article: &Article) -> Result<(), EditorError> {
        self.load(&article.content)
    }

    /// Payload for creating or updating the stored article
    pub fn to_article(&self, title: impl Into<String>, category_id: Option<u64>) -> NewArticle {
        NewArticle {
            title: title.into(),
            content: serialize(self.sync.document()),
            category_id,
        }
    }

    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let before = self.sync.snapshot();
        let description = mutation.describe();
        let result = self.sync.apply(mutation)?;
        self.committed(before, description);
        Ok(result)
    }

    /// Raw text edit; rejected text is reported through [`Self::drain_events`].
    pub fn edit_raw(&mut self, text: impl Into<String>) {
        let before = self.sync.snapshot();
        let version = self.sync.version();
        self.sync.edit_raw(text);
        if self.sync.version() != version {
            self.committed(before, "Edit raw text");
        }
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.sync.set_mode(mode);
    }

    pub fn set_policy(&mut self, policy: ValidationPolicy) {
        self.sync.set_policy(policy);
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Group subsequent edits into one undo step
    pub fn begin_batch(&mut self, description: impl Into<String>) {
        self.history.begin_batch();
        self.history.set_batch_description(description);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    /// Store uploaded image bytes and point `resource_id` at them.
    pub fn upload_image(
        &mut self,
        resource_id: &str,
        bytes: Vec<u8>,
        media_type: &str,
    ) -> Result<BlobRef, EditorError> {
        if !self.resources.contains(resource_id) {
            return Err(EditorError::UnknownResource(resource_id.to_string()));
        }
        if !media_type.starts_with("image/") {
            return Err(EditorError::UnsupportedMediaType(media_type.to_string()));
        }

        let size = bytes.len();
        let blob = self.blobs.put(bytes, media_type)?;
        self.resources.replace(resource_id, blob.as_str());
        self.render_revision += 1;
        info!(resource = resource_id, %blob, size, "replaced image resource");
        Ok(blob)
    }

    /// Point a resource at an external source without uploading
    pub fn set_resource(&mut self, resource_id: impl Into<String>, src: impl Into<String>) {
        self.resources.replace(resource_id, src);
        self.render_revision += 1;
    }

    pub fn document(&self) -> &Document {
        self.sync.document()
    }

    pub fn snapshot(&self) -> Arc<Document> {
        self.sync.snapshot()
    }

    pub fn raw(&self) -> &str {
        self.sync.raw()
    }

    pub fn resources(&self) -> &ImageResourceMap {
        &self.resources
    }

    pub fn render_revision(&self) -> u64 {
        self.render_revision
    }

    pub fn sync(&self) -> &Synchronizer {
        &self.sync
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    pub fn drain_events(&mut self) -> Vec<SyncEvent> {
        self.sync.drain_events()
    }

    fn restore(&mut self, snapshot: Arc<Document>) {
        self.sync.restore(snapshot);
        self.adopt_new_resources();
        self.render_revision += 1;
    }

    fn committed(&mut self, before: Arc<Document>, description: impl Into<String>) {
        self.history.record(before, self.sync.snapshot(), description);
        self.adopt_new_resources();
        self.render_revision += 1;
    }

    /// Resource ids declared since load get their block's source; existing
    /// entries (uploads included) are left alone.
    fn adopt_new_resources(&mut self) {
        let declared = ImageResourceMap::from_document(self.sync.document());
        for (id, src) in declared.iter() {
            if !self.resources.contains(id) {
                self.resources.replace(id, src);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ednotes_blocks::{Block, BlockKind, BlockPath};

    const DOC: &str = r#"[
      {"type": "imageResource", "id": "shapes", "src": "/img/shapes.jpg"},
      {"type": "demo", "demoType": "convolution", "imageId": "shapes"}
    ]"#;

    #[test]
    fn test_session_creation() {
        let session = EditSession::new("article-1");
        assert!(session.document().is_empty());
        assert!(session.resources().is_empty());
        assert_eq!(session.render_revision(), 0);
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_upload_replaces_resource() {
        let mut session = EditSession::new("article-1");
        session.load(DOC).unwrap();
        let revision = session.render_revision();

        let blob = session.upload_image("shapes", vec![0x89, 0x50], "image/png").unwrap();
        assert_eq!(session.resources().get("shapes"), Some(blob.as_str()));
        assert!(session.render_revision() > revision);

        // The document itself still names the original source
        assert_eq!(
            session.document().blocks[0],
            Block::ImageResource {
                id: "shapes".to_string(),
                src: "/img/shapes.jpg".to_string(),
                alt: None,
            }
        );
    }

    #[test]
    fn test_upload_errors() {
        let mut session = EditSession::new("article-1");
        session.load(DOC).unwrap();

        assert!(matches!(
            session.upload_image("missing", vec![1], "image/png"),
            Err(EditorError::UnknownResource(id)) if id == "missing"
        ));
        assert!(matches!(
            session.upload_image("shapes", vec![1], "text/plain"),
            Err(EditorError::UnsupportedMediaType(_))
        ));
        assert!(session.blobs().is_empty());
    }

    #[test]
    fn test_undo_redo_restores_snapshots() {
        let mut session = EditSession::new("article-1");
        session.apply(Mutation::insert_top(Block::template(BlockKind::Header))).unwrap();
        session.apply(Mutation::insert_top(Block::template(BlockKind::Paragraph))).unwrap();
        assert_eq!(session.document().len(), 2);

        assert!(session.undo());
        assert_eq!(session.document().len(), 1);
        assert!(session.undo());
        assert!(session.document().is_empty());
        assert!(!session.undo());

        assert!(session.redo());
        assert_eq!(session.document().blocks, vec![Block::template(BlockKind::Header)]);
    }

    #[test]
    fn test_inserted_resource_is_adopted() {
        let mut session = EditSession::new("article-1");
        session.apply(Mutation::insert_top(Block::template(BlockKind::ImageResource))).unwrap();
        assert_eq!(session.resources().get("image-1"), Some("image.jpg"));
    }

    #[test]
    fn test_article_round_trip() {
        let mut session = EditSession::new("article-1");
        session.load(DOC).unwrap();
        let payload = session.to_article("Convolution", Some(2));

        let mut other = EditSession::new("article-1");
        other
            .load_article(&Article {
                id: 1,
                title: payload.title,
                content: payload.content,
                category_id: payload.category_id,
            })
            .unwrap();
        assert_eq!(other.document(), session.document());
        assert!(other.document().get(&BlockPath::from([1])).is_some());
    }
}
