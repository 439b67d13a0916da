//! Community board records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest accepted post title, in characters.
pub const MAX_TITLE_CHARS: usize = 60;

/// Display name used when the signed-in user has none.
pub const ANONYMOUS_NAME: &str = "익명";

/// Board a post belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostCategory {
    #[serde(rename = "기부후기")]
    DonationReview,
    #[serde(rename = "자유게시판")]
    FreeBoard,
    #[serde(rename = "공지사항")]
    Notice,
}

impl PostCategory {
    pub const ALL: [PostCategory; 3] = [
        PostCategory::DonationReview,
        PostCategory::FreeBoard,
        PostCategory::Notice,
    ];

    /// Stored label
    pub fn label(self) -> &'static str {
        match self {
            PostCategory::DonationReview => "기부후기",
            PostCategory::FreeBoard => "자유게시판",
            PostCategory::Notice => "공지사항",
        }
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PostCategory {
    type Err = String;

    /// Accepts the stored label or `review` / `free` / `notice`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "기부후기" | "review" => Ok(PostCategory::DonationReview),
            "자유게시판" | "free" => Ok(PostCategory::FreeBoard),
            "공지사항" | "notice" => Ok(PostCategory::Notice),
            other => Err(format!("unknown board: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub display_name: String,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub content: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: u64,
}

/// A post as read back from the store. The id is the document key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub attachments: Vec<String>,
    pub author: Author,
    pub category: PostCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_pinned: bool,
    pub views: u64,
    pub likes: u64,
    pub comments: Vec<Comment>,
    pub comment_count: u64,
}

/// Fields supplied by the writer of a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: PostCategory,
    pub attachments: Vec<String>,
}

impl NewPost {
    pub fn new(category: PostCategory, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category,
            attachments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels() {
        assert_eq!(
            serde_json::to_value(PostCategory::DonationReview).unwrap(),
            "기부후기"
        );
        let parsed: PostCategory = serde_json::from_value("공지사항".into()).unwrap();
        assert_eq!(parsed, PostCategory::Notice);
        assert!(serde_json::from_value::<PostCategory>("잡담".into()).is_err());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("free".parse::<PostCategory>().unwrap(), PostCategory::FreeBoard);
        assert_eq!("기부후기".parse::<PostCategory>().unwrap(), PostCategory::DonationReview);
        assert!("FREE".parse::<PostCategory>().is_err());
    }

    #[test]
    fn test_author_photo_field_name() {
        let author = Author {
            id: "u1".to_string(),
            display_name: "홍길동".to_string(),
            photo_url: Some("https://example.com/p.png".to_string()),
        };
        let value = serde_json::to_value(&author).unwrap();
        assert_eq!(value["photoURL"], "https://example.com/p.png");
        assert_eq!(value["displayName"], "홍길동");
    }
}
