//! Document stores for posts.
//!
//! A store keeps raw JSON documents keyed by id and knows nothing about the
//! post schema beyond the `category`, counter and `comments` fields it
//! updates. Each mutation is applied under a single lock, so counter
//! increments and comment appends are atomic with respect to each other.

use async_trait::async_trait;
use opendonate_core::error::{Error, ErrorCode};
use opendonate_core::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use uuid::Uuid;

/// Counter fields that can be incremented in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Views,
    Likes,
}

impl Counter {
    pub fn field(self) -> &'static str {
        match self {
            Counter::Views => "views",
            Counter::Likes => "likes",
        }
    }
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Store a new document and return its generated id.
    async fn insert(&self, doc: Value) -> Result<String>;

    async fn get(&self, id: &str) -> Result<Option<Value>>;

    /// Every document, ordered by id.
    async fn list(&self) -> Result<Vec<(String, Value)>>;

    /// Documents whose `category` equals `category`.
    async fn list_by_category(&self, category: &str) -> Result<Vec<(String, Value)>>;

    /// Add one to a counter. Fails with `NotFound` for a missing document.
    async fn increment(&self, id: &str, counter: Counter) -> Result<()>;

    /// Append to `comments` and add one to `commentCount` in one step.
    async fn append_comment(&self, id: &str, comment: Value) -> Result<()>;

    /// Remove a document. Fails with `NotFound` for a missing document.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Document map shared by the store implementations.
#[derive(Debug, Default, Clone)]
struct Documents(BTreeMap<String, Value>);

impl Documents {
    fn insert(&mut self, doc: Value) -> Result<String> {
        if !doc.is_object() {
            return Err(Error::new(ErrorCode::InvalidFormat, "Document must be a JSON object"));
        }
        let id = Uuid::new_v4().simple().to_string();
        self.0.insert(id.clone(), doc);
        Ok(id)
    }

    fn doc_mut(&mut self, id: &str) -> Result<&mut serde_json::Map<String, Value>> {
        self.0
            .get_mut(id)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| Error::not_found(format!("Post not found: {id}")))
    }

    fn increment(&mut self, id: &str, field: &str) -> Result<()> {
        let doc = self.doc_mut(id)?;
        let current = match doc.get(field) {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_u64().ok_or_else(|| {
                Error::malformed(id, format!("Counter {field} is not a non-negative integer"))
            })?,
        };
        doc.insert(field.to_string(), Value::from(current + 1));
        Ok(())
    }

    fn append_comment(&mut self, id: &str, comment: Value) -> Result<()> {
        let doc = self.doc_mut(id)?;
        let count = match doc.get("commentCount") {
            None | Some(Value::Null) => 0,
            Some(value) => value
                .as_u64()
                .ok_or_else(|| Error::malformed(id, "commentCount is not a non-negative integer"))?,
        };
        match doc.entry("comments").or_insert_with(|| Value::Array(Vec::new())) {
            Value::Array(comments) => comments.push(comment),
            _ => return Err(Error::malformed(id, "comments is not an array")),
        }
        doc.insert("commentCount".to_string(), Value::from(count + 1));
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.0
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("Post not found: {id}")))
    }

    fn all(&self) -> Vec<(String, Value)> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn by_category(&self, category: &str) -> Vec<(String, Value)> {
        self.0
            .iter()
            .filter(|(_, v)| v.get("category").and_then(Value::as_str) == Some(category))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// In-process store, mainly for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    docs: Mutex<Documents>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing documents, e.g. fixtures.
    pub fn with_documents(docs: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            docs: Mutex::new(Documents(docs.into_iter().collect())),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Documents) -> R) -> R {
        let mut guard = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn insert(&self, doc: Value) -> Result<String> {
        self.with(|d| d.insert(doc))
    }

    async fn get(&self, id: &str) -> Result<Option<Value>> {
        Ok(self.with(|d| d.0.get(id).cloned()))
    }

    async fn list(&self) -> Result<Vec<(String, Value)>> {
        Ok(self.with(|d| d.all()))
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<(String, Value)>> {
        Ok(self.with(|d| d.by_category(category)))
    }

    async fn increment(&self, id: &str, counter: Counter) -> Result<()> {
        self.with(|d| d.increment(id, counter.field()))
    }

    async fn append_comment(&self, id: &str, comment: Value) -> Result<()> {
        self.with(|d| d.append_comment(id, comment))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.with(|d| d.delete(id))
    }
}

/// Store backed by one JSON file holding an object of id → document.
///
/// Every call reads the file, applies the change and writes it back through
/// a temporary file and rename. A missing file is an empty store. File I/O
/// runs on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct JsonFilePostStore {
    inner: Arc<PostFile>,
}

#[derive(Debug)]
struct PostFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl PostFile {
    fn read(&self) -> Result<Documents> {
        if !self.path.exists() {
            return Ok(Documents::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Documents::default());
        }
        let docs: BTreeMap<String, Value> = serde_json::from_str(&content).map_err(|e| {
            Error::new(ErrorCode::MalformedDocument, format!("Invalid post file: {e}"))
                .with_context(self.path.display().to_string())
        })?;
        Ok(Documents(docs))
    }

    fn write(&self, docs: &Documents) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&docs.0)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), posts = docs.0.len(), "Wrote post file");
        Ok(())
    }
}

impl JsonFilePostStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(PostFile {
                path: path.into(),
                lock: Mutex::new(()),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    async fn blocking<R: Send + 'static>(
        &self,
        f: impl FnOnce(&PostFile) -> Result<R> + Send + 'static,
    ) -> Result<R> {
        let file = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&file))
            .await
            .map_err(|e| Error::service(ErrorCode::StorageFailed, format!("Post file task failed: {e}")))?
    }

    async fn view<R: Send + 'static>(
        &self,
        f: impl FnOnce(&Documents) -> R + Send + 'static,
    ) -> Result<R> {
        self.blocking(move |file| {
            let _guard = file.lock.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(f(&file.read()?))
        })
        .await
    }

    async fn update<R: Send + 'static>(
        &self,
        f: impl FnOnce(&mut Documents) -> Result<R> + Send + 'static,
    ) -> Result<R> {
        self.blocking(move |file| {
            let _guard = file.lock.lock().unwrap_or_else(PoisonError::into_inner);
            let mut docs = file.read()?;
            let out = f(&mut docs)?;
            file.write(&docs)?;
            Ok(out)
        })
        .await
    }
}

#[async_trait]
impl PostStore for JsonFilePostStore {
    async fn insert(&self, doc: Value) -> Result<String> {
        self.update(move |d| d.insert(doc)).await
    }

    async fn get(&self, id: &str) -> Result<Option<Value>> {
        let id = id.to_string();
        self.view(move |d| d.0.get(&id).cloned()).await
    }

    async fn list(&self) -> Result<Vec<(String, Value)>> {
        self.view(Documents::all).await
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<(String, Value)>> {
        let category = category.to_string();
        self.view(move |d| d.by_category(&category)).await
    }

    async fn increment(&self, id: &str, counter: Counter) -> Result<()> {
        let id = id.to_string();
        self.update(move |d| d.increment(&id, counter.field())).await
    }

    async fn append_comment(&self, id: &str, comment: Value) -> Result<()> {
        let id = id.to_string();
        self.update(move |d| d.append_comment(&id, comment)).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.update(move |d| d.delete(&id)).await
    }
}
