//! Where upstream documentation pages come from.

use bridgen_docs::DocKind;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// A documentation source failed for one entity.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to fetch docs for {kind} `{name}`: {message}")]
pub struct SourceError {
    pub kind: DocKind,
    pub name: String,
    pub message: String,
}

/// Supplies raw Markdown pages by entity kind and upstream name.
///
/// `Ok(None)` means the entity has no page, which is not an error.
pub trait DocsSource: Send + Sync {
    fn fetch(&self, kind: DocKind, raw_name: &str) -> Result<Option<Vec<u8>>, SourceError>;
}

/// In-memory pages.
#[derive(Debug, Clone, Default)]
pub struct StaticDocs {
    pages: BTreeMap<(DocKind, String), Vec<u8>>,
}

impl StaticDocs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: DocKind, raw_name: impl Into<String>, page: impl Into<Vec<u8>>) {
        self.pages.insert((kind, raw_name.into()), page.into());
    }

    pub fn with(
        mut self,
        kind: DocKind,
        raw_name: impl Into<String>,
        page: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(kind, raw_name, page);
        self
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl DocsSource for StaticDocs {
    fn fetch(&self, kind: DocKind, raw_name: &str) -> Result<Option<Vec<u8>>, SourceError> {
        Ok(self.pages.get(&(kind, raw_name.to_string())).cloned())
    }
}

type CacheKey = (DocKind, String);

/// Memoizes another source for the lifetime of one build.
///
/// Successful lookups, including "no page", are cached; failures are not.
pub struct DocsCache<'s> {
    source: &'s dyn DocsSource,
    entries: Mutex<HashMap<CacheKey, Option<Arc<[u8]>>>>,
}

impl<'s> DocsCache<'s> {
    pub fn new(source: &'s dyn DocsSource) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fetches a page, consulting the underlying source at most once per key.
    pub fn get(&self, kind: DocKind, raw_name: &str) -> Result<Option<Arc<[u8]>>, SourceError> {
        let key = (kind, raw_name.to_string());
        if let Some(hit) = self.lock().get(&key) {
            return Ok(hit.clone());
        }
        // Not held across the fetch; two threads may race on a miss and both fetch.
        let page: Option<Arc<[u8]>> = self.source.fetch(kind, raw_name)?.map(Arc::from);
        Ok(self.lock().entry(key).or_insert(page).clone())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Option<Arc<[u8]>>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocsSource for DocsCache<'_> {
    fn fetch(&self, kind: DocKind, raw_name: &str) -> Result<Option<Vec<u8>>, SourceError> {
        Ok(self.get(kind, raw_name)?.map(|page| page.to_vec()))
    }
}
