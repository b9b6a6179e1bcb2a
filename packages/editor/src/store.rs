//! Article persistence boundary.
//!
//! Articles travel as a title, a category and the serialized block document.
//! Remote stores implement [`ArticleStore`]; [`MemoryArticleStore`] serves
//! tests and the command line.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: u64,
    pub title: String,
    /// Serialized block document
    pub content: String,
    #[serde(default)]
    pub category_id: Option<u64>,
}

/// Create or update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category_id: Option<u64>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Article not found: {0}")]
    NotFound(u64),

    #[error("Article title must not be empty")]
    EmptyTitle,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub trait ArticleStore {
    fn create(&mut self, article: NewArticle) -> Result<Article, StoreError>;

    fn fetch(&self, id: u64) -> Result<Article, StoreError>;

    fn update(&mut self, id: u64, article: NewArticle) -> Result<Article, StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    articles: IndexMap<u64, Article>,
    next_id: u64,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Article> {
        self.articles.values()
    }
}

impl ArticleStore for MemoryArticleStore {
    fn create(&mut self, article: NewArticle) -> Result<Article, StoreError> {
        if article.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        self.next_id += 1;
        let stored = Article {
            id: self.next_id,
            title: article.title,
            content: article.content,
            category_id: article.category_id,
        };
        debug!(id = stored.id, title = %stored.title, "created article");
        self.articles.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: u64) -> Result<Article, StoreError> {
        self.articles.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn update(&mut self, id: u64, article: NewArticle) -> Result<Article, StoreError> {
        if article.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let stored = self.articles.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        stored.title = article.title;
        stored.content = article.content;
        stored.category_id = article.category_id;
        debug!(id, "updated article");
        Ok(stored.clone())
    }
}
