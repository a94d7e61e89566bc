use uuid::Uuid;

use crate::{Error, Time, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

/// One persisted comment record. The reply structure is flat on the wire:
/// `parent_id` is the only link, and the nested tree is derived client-side.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,

    /// `None` marks a top-level comment
    pub parent_id: Option<CommentId>,

    pub author: String,
    pub text: String,

    /// Opaque credential supplied at creation and compared verbatim to
    /// authorize edit/delete. This is a UI gate, not an auth mechanism:
    /// anything that can read the record can read the token.
    pub ownership_token: String,

    /// Assigned by the store when the record is committed
    pub created_at: Time,
}

/// What a client submits; the store assigns `id` and `created_at`.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub parent_id: Option<CommentId>,
    pub author: String,
    pub ownership_token: String,
    pub text: String,
}

impl NewComment {
    pub fn top_level(author: &str, ownership_token: &str, text: &str) -> NewComment {
        NewComment {
            parent_id: None,
            author: author.to_string(),
            ownership_token: ownership_token.to_string(),
            text: text.to_string(),
        }
    }

    pub fn reply_to(
        parent: CommentId,
        author: &str,
        ownership_token: &str,
        text: &str,
    ) -> NewComment {
        NewComment {
            parent_id: Some(parent),
            ..NewComment::top_level(author, ownership_token, text)
        }
    }

    // See comments on other `validate` functions throughout agora-api
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string("author", &self.author)?;
        crate::validate_string("ownership_token", &self.ownership_token)?;
        crate::validate_string("text", &self.text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_comment_validation() {
        assert_eq!(NewComment::top_level("A", "p1", "hello").validate(), Ok(()));
        assert_eq!(
            NewComment::top_level("A", "p1", " \n ").validate(),
            Err(Error::MissingField("text"))
        );
        assert_eq!(
            NewComment::top_level("", "p1", "hello").validate(),
            Err(Error::MissingField("author"))
        );
        assert_eq!(
            NewComment::reply_to(CommentId::stub(), "A", "", "hello").validate(),
            Err(Error::MissingField("ownership_token"))
        );
    }

    #[test]
    fn comment_roundtrips_through_json() {
        let c = Comment {
            id: CommentId::stub(),
            parent_id: Some(CommentId::stub()),
            author: String::from("A"),
            text: String::from("hello\nworld"),
            ownership_token: String::from("p1"),
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(serde_json::from_str::<Comment>(&json).unwrap(), c);
    }
}
