//! Storage for uploaded image bytes.
//!
//! An upload is stored once and referenced by an opaque [`BlobRef`] that the
//! image resource map can hold in place of a URL.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::{Cursor, Read};
use thiserror::Error;

/// Opaque reference to stored bytes, usable as an image source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobRef(String);

impl BlobRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty upload")]
    Empty,
}

pub trait BlobStore: fmt::Debug {
    fn put(&mut self, bytes: Vec<u8>, media_type: &str) -> Result<BlobRef, BlobError>;

    fn resolve(&self, blob: &BlobRef) -> Option<Box<dyn Read + '_>>;

    fn media_type(&self, blob: &BlobRef) -> Option<&str>;
}

#[derive(Debug)]
struct StoredBlob {
    media_type: String,
    bytes: Vec<u8>,
}

/// In-process store issuing `blob:ednotes/{n}` references
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<BlobRef, StoredBlob>,
    next: u64,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&mut self, bytes: Vec<u8>, media_type: &str) -> Result<BlobRef, BlobError> {
        if bytes.is_empty() {
            return Err(BlobError::Empty);
        }
        self.next += 1;
        let blob = BlobRef(format!("blob:ednotes/{}", self.next));
        self.blobs.insert(
            blob.clone(),
            StoredBlob {
                media_type: media_type.to_string(),
                bytes,
            },
        );
        Ok(blob)
    }

    fn resolve(&self, blob: &BlobRef) -> Option<Box<dyn Read + '_>> {
        let stored = self.blobs.get(blob)?;
        Some(Box::new(Cursor::new(stored.bytes.as_slice())))
    }

    fn media_type(&self, blob: &BlobRef) -> Option<&str> {
        self.blobs.get(blob).map(|stored| stored.media_type.as_str())
    }
}
