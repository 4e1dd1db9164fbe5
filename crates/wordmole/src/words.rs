//! Word lookup hook.
//!
//! The engine does not ship a word database; it asks a [`WordService`]
//! for a word/reference pair at game start. Production wires this to
//! whatever backs the category catalog; tests and local play use
//! [`InMemoryWordService`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

/// A secret word plus the related reference word for the same category.
///
/// The word goes to civilians at role assignment. The reference word is
/// part of the lookup response and is stored on the room, but the
/// engine never emits it to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPair {
    pub word: String,
    pub reference: String,
}

impl WordPair {
    pub fn new(word: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            reference: reference.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WordServiceError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("word service unavailable: {0}")]
    Unavailable(String),
}

/// Fetches a word pair for a category.
///
/// `Send + Sync + 'static` so the service can be shared with the async
/// runtime for the lifetime of the engine.
pub trait WordService: Send + Sync + 'static {
    /// Picks a word pair from `category_id`.
    fn fetch_pair(
        &self,
        category_id: &str,
    ) -> impl std::future::Future<Output = Result<WordPair, WordServiceError>> + Send;
}

// ---------------------------------------------------------------------------
// InMemoryWordService
// ---------------------------------------------------------------------------

/// Static word lists, served round-robin per call. Suitable for tests
/// and local play; deterministic given the call sequence.
pub struct InMemoryWordService {
    categories: HashMap<String, Vec<WordPair>>,
    cursor: AtomicUsize,
}

impl InMemoryWordService {
    pub fn new(categories: HashMap<String, Vec<WordPair>>) -> Self {
        Self {
            categories,
            cursor: AtomicUsize::new(0),
        }
    }

    /// A small built-in catalog, enough to play a game out of the box.
    pub fn with_defaults() -> Self {
        let mut categories = HashMap::new();
        categories.insert(
            "animals".to_string(),
            vec![
                WordPair::new("mole", "burrow"),
                WordPair::new("otter", "river"),
                WordPair::new("owl", "night"),
            ],
        );
        categories.insert(
            "food".to_string(),
            vec![
                WordPair::new("paella", "rice"),
                WordPair::new("croissant", "butter"),
            ],
        );
        Self::new(categories)
    }
}

impl WordService for InMemoryWordService {
    async fn fetch_pair(
        &self,
        category_id: &str,
    ) -> Result<WordPair, WordServiceError> {
        let pairs = self
            .categories
            .get(category_id)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                WordServiceError::UnknownCategory(category_id.to_string())
            })?;
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % pairs.len();
        Ok(pairs[i].clone())
    }
}
