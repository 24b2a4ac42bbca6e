/// List source trait and implementations
///
/// A [`ListSource`] resolves a [`PredefinedList`] to its raw text. Because
/// the argument is already a known identifier, unknown names are rejected
/// by parsing before any source is consulted.
use async_trait::async_trait;
use std::collections::HashMap;
#[cfg(feature = "tokio-runtime")]
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

#[cfg(feature = "builtin-lists")]
use crate::builtin_lists;
use crate::lists::PredefinedList;

/// Error types for list loading
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("List not found: {0}")]
    NotFound(PredefinedList),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Fetch failed: {0}")]
    Fetch(String),
}

/// Async trait for fetching the text of a predefined list
#[async_trait]
pub trait ListSource: Send + Sync {
    async fn fetch(&self, list: PredefinedList) -> Result<String, LoadError>;
}

/// Filesystem source reading `<dir>/<id>.txt`
///
/// Only available with the `tokio-runtime` feature (not on WASM).
#[cfg(feature = "tokio-runtime")]
pub struct FolderSource {
    base_path: PathBuf,
}

#[cfg(feature = "tokio-runtime")]
impl FolderSource {
    /// # Example
    /// ```no_run
    /// use list_selector::loader::FolderSource;
    /// use std::path::PathBuf;
    ///
    /// let source = FolderSource::new(PathBuf::from("./lists"));
    /// ```
    pub fn new(base_path: PathBuf) -> Self {
        FolderSource { base_path }
    }
}

#[cfg(feature = "tokio-runtime")]
#[async_trait]
impl ListSource for FolderSource {
    async fn fetch(&self, list: PredefinedList) -> Result<String, LoadError> {
        let path = self.base_path.join(list.filename());
        debug!(path = %path.display(), "reading list file");
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(LoadError::NotFound(list)),
            Err(e) => Err(LoadError::Io(e.to_string())),
        }
    }
}

/// In-memory source, useful for testing and embedding
#[derive(Clone, Default)]
pub struct InMemorySource {
    lists: Arc<RwLock<HashMap<PredefinedList, String>>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Example
    /// ```
    /// use list_selector::lists::PredefinedList;
    /// use list_selector::loader::InMemorySource;
    ///
    /// let source = InMemorySource::new();
    /// source.add(PredefinedList::SayAnythingEn, "first\nsecond");
    /// ```
    pub fn add(&self, list: PredefinedList, text: impl Into<String>) {
        let mut lists = self.lists.write().unwrap_or_else(PoisonError::into_inner);
        lists.insert(list, text.into());
    }

    pub fn remove(&self, list: PredefinedList) -> bool {
        let mut lists = self.lists.write().unwrap_or_else(PoisonError::into_inner);
        lists.remove(&list).is_some()
    }

    pub fn contains(&self, list: PredefinedList) -> bool {
        let lists = self.lists.read().unwrap_or_else(PoisonError::into_inner);
        lists.contains_key(&list)
    }
}

#[async_trait]
impl ListSource for InMemorySource {
    async fn fetch(&self, list: PredefinedList) -> Result<String, LoadError> {
        let lists = self.lists.read().unwrap_or_else(PoisonError::into_inner);
        lists.get(&list).cloned().ok_or(LoadError::NotFound(list))
    }
}

/// Lists bundled into the binary
///
/// Only available with the `builtin-lists` feature.
#[cfg(feature = "builtin-lists")]
#[derive(Clone, Copy, Default)]
pub struct BuiltinLists;

#[cfg(feature = "builtin-lists")]
impl BuiltinLists {
    pub fn new() -> Self {
        BuiltinLists
    }
}

#[cfg(feature = "builtin-lists")]
#[async_trait]
impl ListSource for BuiltinLists {
    async fn fetch(&self, list: PredefinedList) -> Result<String, LoadError> {
        builtin_lists::get(list)
            .map(str::to_string)
            .ok_or(LoadError::NotFound(list))
    }
}

/// Tries sources in order until one has the list
///
/// Any error other than `NotFound` stops the chain.
#[derive(Clone, Default)]
pub struct ChainSource {
    sources: Vec<Arc<dyn ListSource>>,
}

impl ChainSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources are tried in the order they are added.
    pub fn with_source(mut self, source: Arc<dyn ListSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn from_sources(sources: Vec<Arc<dyn ListSource>>) -> Self {
        ChainSource { sources }
    }
}

#[async_trait]
impl ListSource for ChainSource {
    async fn fetch(&self, list: PredefinedList) -> Result<String, LoadError> {
        for source in &self.sources {
            match source.fetch(list).await {
                Ok(text) => return Ok(text),
                Err(LoadError::NotFound(_)) => {
                    debug!(%list, "not in source, trying next");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        Err(LoadError::NotFound(list))
    }
}

/// Default source: bundled lists when available, otherwise nothing
pub fn default_source() -> Arc<dyn ListSource> {
    #[cfg(feature = "builtin-lists")]
    {
        Arc::new(BuiltinLists::new())
    }
    #[cfg(not(feature = "builtin-lists"))]
    {
        Arc::new(ChainSource::new())
    }
}
