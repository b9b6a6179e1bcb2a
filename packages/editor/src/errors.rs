//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] ednotes_blocks::ParseError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Article store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Blob store error: {0}")]
    Blob(#[from] crate::blob::BlobError),

    #[error("Unknown image resource: {0}")]
    UnknownResource(String),

    #[error("Unsupported media type for an image upload: {0}")]
    UnsupportedMediaType(String),
}
