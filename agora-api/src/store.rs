use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{Comment, CommentId, Error, NewComment, NewTopic, Topic, TopicId, TopicPatch};

/// Capability interface over the hosted document database. Everything the
/// client core needs is expressed here; no byte-level protocol leaks through.
///
/// All operations surface transport failures as `Error::StoreUnavailable`,
/// kept distinct from validation and authorization failures.
#[async_trait]
pub trait Store {
    /// Resolves once the store is usable. Replaces "poll an interval until
    /// the SDK global shows up" with an explicit readiness signal.
    async fn ready(&self) -> Result<(), Error>;

    /// The single discussion-anchor topic of a category, if one exists
    async fn topic_in_category(&self, category: &str) -> Result<Option<Topic>, Error>;

    async fn list_topics(&self, category: &str) -> Result<Vec<Topic>, Error>;

    async fn add_topic(&self, topic: NewTopic) -> Result<Topic, Error>;

    async fn update_topic(&self, topic: TopicId, patch: TopicPatch) -> Result<(), Error>;

    /// Removes the topic and every comment under it as one atomic batch
    async fn delete_topic(&self, topic: TopicId) -> Result<(), Error>;

    /// Full current comment set for a topic, ordered by `created_at` ascending
    async fn list_comments(&self, topic: TopicId) -> Result<Vec<Comment>, Error>;

    async fn get_comment(&self, topic: TopicId, comment: CommentId) -> Result<Comment, Error>;

    /// Appends a new record; the store assigns both id and creation time
    async fn add_comment(&self, topic: TopicId, data: NewComment) -> Result<CommentId, Error>;

    async fn update_comment_text(
        &self,
        topic: TopicId,
        comment: CommentId,
        text: String,
    ) -> Result<(), Error>;

    /// All-or-nothing batch delete: either every listed comment is gone or
    /// none is. Partial deletion must never be observable in any snapshot.
    async fn delete_comments(&self, topic: TopicId, comments: Vec<CommentId>) -> Result<(), Error>;

    /// Opens a live full-snapshot subscription for a topic. The current
    /// snapshot is delivered immediately, then one message per committed
    /// change, in commit order.
    async fn subscribe_comments(&self, topic: TopicId) -> Result<CommentFeed, Error>;
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum FeedMessage {
    /// A full, point-in-time listing of all comments for the topic,
    /// superseding every previous snapshot
    Snapshot(Vec<Comment>),

    /// The subscription failed for good; the feed will yield nothing more.
    /// Recovery is re-subscribing, not waiting.
    Lost(String),
}

/// Exclusively-owned handle on one topic's snapshot subscription. Messages
/// are delivered strictly serially. Dropping the handle unsubscribes: the
/// store side notices the closed channel and stops relaying, and nothing can
/// be observed from the feed afterwards.
#[derive(Debug)]
pub struct CommentFeed {
    topic: TopicId,
    messages: mpsc::UnboundedReceiver<FeedMessage>,
}

impl CommentFeed {
    pub fn new(topic: TopicId, messages: mpsc::UnboundedReceiver<FeedMessage>) -> CommentFeed {
        CommentFeed { topic, messages }
    }

    pub fn topic(&self) -> TopicId {
        self.topic
    }

    /// Next message, or `None` once the store side went away entirely
    pub async fn next(&mut self) -> Option<FeedMessage> {
        self.messages.recv().await
    }

    /// Non-blocking variant, for draining already-delivered snapshots
    pub fn try_next(&mut self) -> Option<FeedMessage> {
        self.messages.try_recv().ok()
    }
}
