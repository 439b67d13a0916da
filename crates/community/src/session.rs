//! Authentication session passed into the community service.

use crate::model::{Author, ANONYMOUS_NAME};
use opendonate_core::error::Error;
use opendonate_core::Result;
use serde::{Deserialize, Serialize};

/// Signed-in account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    SignedIn(User),
}

impl Session {
    pub fn signed_in(uid: impl Into<String>, display_name: Option<String>) -> Self {
        Session::SignedIn(User {
            uid: uid.into(),
            display_name,
            photo_url: None,
        })
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Anonymous => None,
            Session::SignedIn(user) => Some(user),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user().is_some()
    }

    /// Author record for content written in this session.
    pub fn author(&self) -> Result<Author> {
        let user = self.user().ok_or_else(Error::unauthenticated)?;
        let display_name = user
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS_NAME)
            .to_string();

        Ok(Author {
            id: user.uid.clone(),
            display_name,
            photo_url: user.photo_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendonate_core::ErrorCode;

    #[test]
    fn test_anonymous_has_no_author() {
        let err = Session::Anonymous.author().unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[test]
    fn test_display_name_fallback() {
        let author = Session::signed_in("u1", None).author().unwrap();
        assert_eq!(author.display_name, "익명");

        let author = Session::signed_in("u1", Some("  ".to_string())).author().unwrap();
        assert_eq!(author.display_name, "익명");

        let author = Session::signed_in("u1", Some("김기부".to_string())).author().unwrap();
        assert_eq!(author.display_name, "김기부");
        assert_eq!(author.id, "u1");
    }
}
