//! Storage boundary.
//!
//! Stores hold untyped JSON documents. Every document is parsed and
//! validated here before it becomes a [`CommunityPost`]; anything that does
//! not fit the schema is rejected with `MalformedDocument`. Optional
//! collections and counters default to empty/zero when absent, but a field
//! of the wrong type is never coerced.

use crate::model::{Author, Comment, CommunityPost, NewPost, PostCategory, MAX_TITLE_CHARS};
use chrono::{DateTime, Utc};
use opendonate_core::error::{Error, ErrorCode};
use opendonate_core::validation::Validator;
use opendonate_core::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored body of a post. The id is the document key, not a field.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostDocument {
    title: String,
    content: String,
    #[serde(default)]
    attachments: Vec<String>,
    author: Author,
    category: PostCategory,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    is_pinned: bool,
    #[serde(default)]
    views: u64,
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    comment_count: u64,
}

/// Parse a stored document into a post, failing closed.
pub fn parse_post(id: &str, doc: &Value) -> Result<CommunityPost> {
    let body: PostDocument = PostDocument::deserialize(doc)
        .map_err(|e| Error::malformed(id, format!("Invalid post document: {e}")))?;

    Validator::new()
        .required("title", &body.title)
        .required("author.id", &body.author.id)
        .custom("updatedAt", || {
            (body.updated_at < body.created_at).then(|| "updatedAt precedes createdAt".to_string())
        })
        .custom("comments", || {
            body.comments
                .iter()
                .find(|c| c.post_id != id)
                .map(|c| format!("comment {} belongs to post {}", c.id, c.post_id))
        })
        .validate()
        .into_result_with(ErrorCode::MalformedDocument)
        .map_err(|e| e.with_context(format!("document {id}")))?;

    Ok(CommunityPost {
        id: id.to_string(),
        title: body.title,
        content: body.content,
        attachments: body.attachments,
        author: body.author,
        category: body.category,
        created_at: body.created_at,
        updated_at: body.updated_at,
        is_pinned: body.is_pinned,
        views: body.views,
        likes: body.likes,
        comments: body.comments,
        comment_count: body.comment_count,
    })
}

/// Check a draft before it is written.
pub fn validate_draft(draft: &NewPost) -> Result<()> {
    let title = draft.title.trim();
    Validator::new()
        .required("title", title)
        .max_length("title", title, MAX_TITLE_CHARS)
        .required("content", &draft.content)
        .validate()
        .into_result_with(ErrorCode::InvalidInput)
}

/// Document for a new post: trimmed text, zero counters, no comments.
pub fn new_post_document(draft: &NewPost, author: Author, now: DateTime<Utc>) -> Result<Value> {
    let body = PostDocument {
        title: draft.title.trim().to_string(),
        content: draft.content.trim().to_string(),
        attachments: draft.attachments.clone(),
        author,
        category: draft.category,
        created_at: now,
        updated_at: now,
        is_pinned: false,
        views: 0,
        likes: 0,
        comments: Vec::new(),
        comment_count: 0,
    };
    Ok(serde_json::to_value(body)?)
}

pub fn comment_document(comment: &Comment) -> Result<Value> {
    Ok(serde_json::to_value(comment)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn author() -> Author {
        Author {
            id: "u1".to_string(),
            display_name: "김기부".to_string(),
            photo_url: None,
        }
    }

    fn stored() -> Value {
        json!({
            "title": "첫 기부 후기",
            "content": "따뜻한 겨울 보내세요",
            "author": {"id": "u1", "displayName": "김기부"},
            "category": "기부후기",
            "createdAt": "2024-01-15T09:00:00Z",
            "updatedAt": "2024-01-15T09:00:00Z",
            "views": 3,
            "likes": 1
        })
    }

    #[test]
    fn test_parse_applies_defaults() {
        let post = parse_post("p1", &stored()).unwrap();
        assert_eq!(post.id, "p1");
        assert_eq!(post.category, PostCategory::DonationReview);
        assert_eq!(post.views, 3);
        assert!(post.comments.is_empty());
        assert_eq!(post.comment_count, 0);
        assert!(!post.is_pinned);
    }

    #[test]
    fn test_wrong_type_rejected() {
        // A numeric comment list is malformed, not an empty list
        let mut doc = stored();
        doc["comments"] = json!(0);
        let err = parse_post("p1", &doc).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedDocument);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut doc = stored();
        doc["category"] = json!("잡담");
        assert_eq!(
            parse_post("p1", &doc).unwrap_err().code,
            ErrorCode::MalformedDocument
        );
    }

    #[test]
    fn test_missing_author_rejected() {
        let mut doc = stored();
        doc.as_object_mut().unwrap().remove("author");
        assert!(parse_post("p1", &doc).is_err());

        let mut doc = stored();
        doc["author"]["id"] = json!("");
        let err = parse_post("p1", &doc).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedDocument);
        assert_eq!(err.context.as_deref(), Some("document p1"));
    }

    #[test]
    fn test_foreign_comment_rejected() {
        let mut doc = stored();
        doc["comments"] = json!([{
            "id": "c1",
            "postId": "other",
            "content": "좋아요",
            "author": {"id": "u2", "displayName": "이웃"},
            "createdAt": "2024-01-16T09:00:00Z",
            "updatedAt": "2024-01-16T09:00:00Z"
        }]);
        assert!(parse_post("p1", &doc).is_err());

        doc["comments"][0]["postId"] = json!("p1");
        assert_eq!(parse_post("p1", &doc).unwrap().comments.len(), 1);
    }

    #[test]
    fn test_timestamps_ordered() {
        let mut doc = stored();
        doc["updatedAt"] = json!("2024-01-14T09:00:00Z");
        assert!(parse_post("p1", &doc).is_err());
    }

    #[test]
    fn test_draft_validation() {
        assert!(validate_draft(&NewPost::new(PostCategory::FreeBoard, "제목", "내용")).is_ok());

        let err = validate_draft(&NewPost::new(PostCategory::FreeBoard, "   ", "내용")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        assert!(validate_draft(&NewPost::new(PostCategory::FreeBoard, "제목", " \n ")).is_err());

        let long_title = "가".repeat(MAX_TITLE_CHARS + 1);
        assert!(validate_draft(&NewPost::new(PostCategory::FreeBoard, long_title, "내용")).is_err());
        let max_title = "가".repeat(MAX_TITLE_CHARS);
        assert!(validate_draft(&NewPost::new(PostCategory::FreeBoard, max_title, "내용")).is_ok());
    }

    #[test]
    fn test_new_document_round_trip() {
        let now = Utc::now();
        let draft = NewPost::new(PostCategory::Notice, "  공지  ", " 점검 안내 ");
        let doc = new_post_document(&draft, author(), now).unwrap();
        assert_eq!(doc["category"], "공지사항");
        assert_eq!(doc["commentCount"], 0);

        let post = parse_post("n1", &doc).unwrap();
        assert_eq!(post.title, "공지");
        assert_eq!(post.content, "점검 안내");
        assert_eq!(post.created_at, now);
    }
}
