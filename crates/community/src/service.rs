//! Community board operations.

use crate::document::{comment_document, new_post_document, parse_post, validate_draft};
use crate::model::{Comment, CommunityPost, NewPost, PostCategory};
use crate::session::Session;
use crate::store::{Counter, PostStore};
use chrono::Utc;
use opendonate_core::error::{Error, ErrorCode};
use opendonate_core::validation::Validator;
use opendonate_core::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Posts and comments over an injected store, acting as `session`.
pub struct CommunityService {
    store: Arc<dyn PostStore>,
    session: Session,
}

impl CommunityService {
    pub fn new(store: Arc<dyn PostStore>, session: Session) -> Self {
        Self { store, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Publish a new post and return its id. Requires a signed-in session.
    #[instrument(skip(self, draft), fields(category = %draft.category))]
    pub async fn create_post(&self, draft: &NewPost) -> Result<String> {
        let author = self.session.author()?;
        validate_draft(draft)?;

        let doc = new_post_document(draft, author, Utc::now())?;
        let id = self.store.insert(doc).await.map_err(storage_failure)?;
        info!(post_id = %id, "Post created");
        Ok(id)
    }

    /// Every readable post, pinned first, then newest first.
    pub async fn all_posts(&self) -> Result<Vec<CommunityPost>> {
        let docs = self.store.list().await.map_err(storage_failure)?;
        Ok(sorted(parse_all(docs)))
    }

    pub async fn posts_by_category(&self, category: PostCategory) -> Result<Vec<CommunityPost>> {
        let docs = self
            .store
            .list_by_category(category.label())
            .await
            .map_err(storage_failure)?;
        Ok(sorted(parse_all(docs)))
    }

    /// One post. A missing id is a `NotFound` error; a malformed document is
    /// rejected.
    pub async fn post_by_id(&self, id: &str) -> Result<CommunityPost> {
        let doc = self
            .store
            .get(id)
            .await
            .map_err(storage_failure)?
            .ok_or_else(|| Error::not_found(format!("Post not found: {id}")))?;
        parse_post(id, &doc)
    }

    /// Count a view. Failures are logged, never returned.
    pub async fn increment_views(&self, id: &str) {
        self.bump(id, Counter::Views).await;
    }

    /// Count a like. Failures are logged, never returned.
    pub async fn increment_likes(&self, id: &str) {
        self.bump(id, Counter::Likes).await;
    }

    /// Append a comment and bump the comment count. Requires a signed-in
    /// session.
    #[instrument(skip(self, content))]
    pub async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment> {
        let author = self.session.author()?;
        let content = content.trim();
        Validator::new()
            .required("content", content)
            .validate()
            .into_result_with(ErrorCode::InvalidInput)?;

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4().simple().to_string(),
            post_id: post_id.to_string(),
            content: content.to_string(),
            author,
            created_at: now,
            updated_at: now,
            likes: 0,
        };

        self.store
            .append_comment(post_id, comment_document(&comment)?)
            .await
            .map_err(storage_failure)?;
        debug!(comment_id = %comment.id, "Comment added");
        Ok(comment)
    }

    /// Delete a post. Only its author may delete it.
    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: &str) -> Result<()> {
        let author = self.session.author()?;
        let post = self.post_by_id(id).await?;
        if post.author.id != author.id {
            return Err(Error::new(
                ErrorCode::NotAuthor,
                format!("Post {id} belongs to another user"),
            ));
        }

        self.store.delete(id).await.map_err(storage_failure)?;
        info!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn bump(&self, id: &str, counter: Counter) {
        if let Err(e) = self.store.increment(id, counter).await {
            warn!(post_id = %id, counter = counter.field(), error = %e, "Failed to increment counter");
        }
    }
}

/// Absence and schema errors pass through; anything else from the store is
/// reported as a storage failure.
fn storage_failure(err: Error) -> Error {
    match err.code {
        ErrorCode::NotFound | ErrorCode::MalformedDocument | ErrorCode::InvalidFormat => err,
        _ => Error::service(ErrorCode::StorageFailed, "Document store request failed").with_source(err),
    }
}

fn parse_all(docs: Vec<(String, Value)>) -> Vec<CommunityPost> {
    docs.into_iter()
        .filter_map(|(id, doc)| match parse_post(&id, &doc) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!(post_id = %id, error = %e, "Skipping malformed post");
                None
            }
        })
        .collect()
}

fn sorted(mut posts: Vec<CommunityPost>) -> Vec<CommunityPost> {
    posts.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    posts
}
