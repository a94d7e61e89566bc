use crate::{CommentId, TopicId};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("required field {0:?} is empty")]
    MissingField(&'static str),

    #[error("null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("ownership token mismatch")]
    PermissionDenied,

    #[error("comment {0:?} does not exist")]
    CommentNotFound(CommentId),

    #[error("topic {0:?} does not exist")]
    TopicNotFound(TopicId),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl Error {
    /// Validation and authorization failures are the caller's to fix by
    /// resubmitting; an unavailable store is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}
