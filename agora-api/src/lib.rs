use chrono::Utc;

pub use uuid::{uuid, Uuid};

pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

mod comment;
mod error;
mod store;
mod topic;

pub use comment::{Comment, CommentId, NewComment};
pub use error::Error;
pub use store::{CommentFeed, FeedMessage, Store};
pub use topic::{NewTopic, Topic, TopicId, TopicPatch, FALLBACK_SUB_CATEGORY};

/// Checks that a user-supplied required field is actually usable: not empty
/// once trimmed, and without embedded null bytes (those tend to break
/// document stores in interesting ways).
pub fn validate_string(field: &'static str, s: &str) -> Result<(), Error> {
    if s.trim().is_empty() {
        return Err(Error::MissingField(field));
    }
    if s.contains('\0') {
        return Err(Error::NullByteInString(s.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_string_rejects_blank_and_nul() {
        assert_eq!(validate_string("author", "alice"), Ok(()));
        assert_eq!(
            validate_string("author", "   "),
            Err(Error::MissingField("author"))
        );
        assert_eq!(validate_string("text", ""), Err(Error::MissingField("text")));
        assert_eq!(
            validate_string("text", "a\0b"),
            Err(Error::NullByteInString(String::from("a\0b")))
        );
    }
}
