//! Community board for Open Donate.
//!
//! Posts live in a [`PostStore`] as untyped JSON documents; the
//! [`CommunityService`] validates them on the way in and out (see
//! [`document`]) and acts on behalf of an explicit [`Session`].
//!
//! ```
//! use opendonate_community::{CommunityService, MemoryPostStore, NewPost, PostCategory, Session};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let service = CommunityService::new(
//!     Arc::new(MemoryPostStore::new()),
//!     Session::signed_in("u1", Some("김기부".to_string())),
//! );
//! let id = service
//!     .create_post(&NewPost::new(PostCategory::DonationReview, "기부 후기", "감사합니다"))
//!     .await?;
//! assert_eq!(service.post_by_id(&id).await?.views, 0);
//! # Ok::<(), opendonate_core::Error>(())
//! # }).unwrap();
//! ```

pub mod document;
pub mod model;
pub mod service;
pub mod session;
pub mod store;

pub use model::{Author, Comment, CommunityPost, NewPost, PostCategory};
pub use service::CommunityService;
pub use session::{Session, User};
pub use store::{Counter, JsonFilePostStore, MemoryPostStore, PostStore};
