//! Mutations against the comment store. All of them are fire-and-forget with
//! respect to the live view: a successful write shows up through the next
//! snapshot, never by patching local state. Failures are surfaced to the
//! caller for user-facing notification; nothing here retries.

use crate::api::{
    validate_string, CommentId, Error, NewComment, NewTopic, Store, Topic, TopicId, TopicPatch,
};
use crate::tree::subtree_ids;

/// Appends a new comment (top-level or reply). Validation failures issue no
/// store write at all.
pub async fn create_comment<S: Store>(
    store: &S,
    topic: TopicId,
    data: NewComment,
) -> Result<CommentId, Error> {
    data.validate()?;
    store.add_comment(topic, data).await
}

/// Replaces a comment's text, authorized by a verbatim ownership-token
/// comparison against the stored record. Only the text changes.
pub async fn edit_comment<S: Store>(
    store: &S,
    topic: TopicId,
    comment: CommentId,
    supplied_token: &str,
    new_text: &str,
) -> Result<(), Error> {
    validate_string("text", new_text)?;
    let current = store.get_comment(topic, comment).await?;
    if current.ownership_token != supplied_token {
        return Err(Error::PermissionDenied);
    }
    store
        .update_comment_text(topic, comment, new_text.to_string())
        .await
}

/// Deletes a comment together with its whole reply subtree, as one atomic
/// batch: no snapshot can ever show the subtree without its root or vice
/// versa.
pub async fn delete_comment<S: Store>(
    store: &S,
    topic: TopicId,
    comment: CommentId,
    supplied_token: &str,
) -> Result<(), Error> {
    let current = store.get_comment(topic, comment).await?;
    if current.ownership_token != supplied_token {
        return Err(Error::PermissionDenied);
    }
    let records = store.list_comments(topic).await?;
    let doomed = subtree_ids(&records, comment);
    tracing::info!(?comment, num_deleted = doomed.len(), "deleting comment subtree");
    store.delete_comments(topic, doomed).await
}

/// Posts a new topic. Whether the caller is allowed to administrate topics
/// is decided outside this crate; there is deliberately no credential here.
pub async fn post_topic<S: Store>(store: &S, topic: NewTopic) -> Result<Topic, Error> {
    topic.validate()?;
    store.add_topic(topic).await
}

pub async fn revise_topic<S: Store>(
    store: &S,
    topic: TopicId,
    patch: TopicPatch,
) -> Result<(), Error> {
    patch.validate()?;
    store.update_topic(topic, patch).await
}

/// Removes a topic and, with it, every comment it anchors
pub async fn remove_topic<S: Store>(store: &S, topic: TopicId) -> Result<(), Error> {
    store.delete_topic(topic).await
}
