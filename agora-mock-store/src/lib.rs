//! In-memory implementation of the `Store` capability, for tests and local
//! development. Every mutation relays a fresh full snapshot to the live
//! feeds of the affected topic, the way a hosted document store's
//! subscription would.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

use agora_api::{
    Comment, CommentFeed, CommentId, Error, FeedMessage, NewComment, NewTopic, Store, Time, Topic,
    TopicId, TopicPatch,
};

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    topics: HashMap<TopicId, Topic>,
    /// Per topic, in insertion order; snapshots re-sort by `created_at`
    comments: HashMap<TopicId, Vec<Comment>>,
    feeds: HashMap<TopicId, Vec<mpsc::UnboundedSender<FeedMessage>>>,
    offline: bool,
}

impl Inner {
    fn check_online(&self) -> Result<(), Error> {
        match self.offline {
            true => Err(Error::StoreUnavailable(String::from("store is offline"))),
            false => Ok(()),
        }
    }

    fn topic(&self, topic: TopicId) -> Result<&Topic, Error> {
        self.topics.get(&topic).ok_or(Error::TopicNotFound(topic))
    }

    fn snapshot(&self, topic: TopicId) -> Vec<Comment> {
        let mut records = self.comments.get(&topic).cloned().unwrap_or_default();
        // stable, so same-timestamp records keep their commit order
        records.sort_by_key(|c| c.created_at);
        records
    }

    /// Pushes the current snapshot to every live feed of the topic,
    /// forgetting feeds whose receiving end was dropped
    fn relay(&mut self, topic: TopicId) {
        let snapshot = self.snapshot(topic);
        if let Some(feeds) = self.feeds.get_mut(&topic) {
            feeds.retain(|f| f.send(FeedMessage::Snapshot(snapshot.clone())).is_ok());
        }
    }
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Makes every subsequent operation fail with `StoreUnavailable`
    pub fn test_set_offline(&self, offline: bool) {
        self.inner.lock().unwrap().offline = offline;
    }

    /// Terminates every live feed of a topic with `FeedMessage::Lost`
    pub fn test_drop_feeds(&self, topic: TopicId) {
        let mut inner = self.inner.lock().unwrap();
        for f in inner.feeds.remove(&topic).unwrap_or_default() {
            let _ = f.send(FeedMessage::Lost(String::from("subscription dropped")));
        }
    }

    /// Number of feeds for a topic whose subscriber is still alive
    pub fn test_num_feeds(&self, topic: TopicId) -> usize {
        self.inner
            .lock()
            .unwrap()
            .feeds
            .get(&topic)
            .map(|feeds| feeds.iter().filter(|f| !f.is_closed()).count())
            .unwrap_or(0)
    }

    /// Inserts a topic with a caller-chosen creation time, for tests that
    /// need a deterministic ordering
    pub fn test_add_topic_at(&self, data: NewTopic, created_at: Time) -> Topic {
        let mut inner = self.inner.lock().unwrap();
        let topic = Topic {
            id: TopicId(Uuid::new_v4()),
            title: data.title,
            content: data.content,
            category: data.category,
            sub_category: data.sub_category,
            created_at,
        };
        inner.topics.insert(topic.id, topic.clone());
        topic
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ready(&self) -> Result<(), Error> {
        self.inner.lock().unwrap().check_online()
    }

    async fn topic_in_category(&self, category: &str) -> Result<Option<Topic>, Error> {
        let inner = self.inner.lock().unwrap();
        inner.check_online()?;
        Ok(inner
            .topics
            .values()
            .filter(|t| t.category == category)
            .min_by_key(|t| t.created_at)
            .cloned())
    }

    async fn list_topics(&self, category: &str) -> Result<Vec<Topic>, Error> {
        let inner = self.inner.lock().unwrap();
        inner.check_online()?;
        Ok(inner
            .topics
            .values()
            .filter(|t| t.category == category)
            .cloned()
            .collect())
    }

    async fn add_topic(&self, data: NewTopic) -> Result<Topic, Error> {
        self.inner.lock().unwrap().check_online()?;
        Ok(self.test_add_topic_at(data, Utc::now()))
    }

    async fn update_topic(&self, topic: TopicId, patch: TopicPatch) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_online()?;
        let t = inner
            .topics
            .get_mut(&topic)
            .ok_or(Error::TopicNotFound(topic))?;
        if let Some(title) = patch.title {
            t.title = title;
        }
        if let Some(content) = patch.content {
            t.content = content;
        }
        if let Some(sub_category) = patch.sub_category {
            t.sub_category = Some(sub_category);
        }
        Ok(())
    }

    async fn delete_topic(&self, topic: TopicId) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_online()?;
        inner.topic(topic)?;
        // one lock, so the topic and its comments go together or not at all
        inner.topics.remove(&topic);
        inner.comments.remove(&topic);
        inner.relay(topic);
        Ok(())
    }

    async fn list_comments(&self, topic: TopicId) -> Result<Vec<Comment>, Error> {
        let inner = self.inner.lock().unwrap();
        inner.check_online()?;
        inner.topic(topic)?;
        Ok(inner.snapshot(topic))
    }

    async fn get_comment(&self, topic: TopicId, comment: CommentId) -> Result<Comment, Error> {
        let inner = self.inner.lock().unwrap();
        inner.check_online()?;
        inner.topic(topic)?;
        inner
            .comments
            .get(&topic)
            .and_then(|records| records.iter().find(|c| c.id == comment))
            .cloned()
            .ok_or(Error::CommentNotFound(comment))
    }

    async fn add_comment(&self, topic: TopicId, data: NewComment) -> Result<CommentId, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_online()?;
        inner.topic(topic)?;
        let record = Comment {
            id: CommentId(Uuid::new_v4()),
            parent_id: data.parent_id,
            author: data.author,
            text: data.text,
            ownership_token: data.ownership_token,
            created_at: Utc::now(),
        };
        let id = record.id;
        inner.comments.entry(topic).or_default().push(record);
        inner.relay(topic);
        Ok(id)
    }

    async fn update_comment_text(
        &self,
        topic: TopicId,
        comment: CommentId,
        text: String,
    ) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_online()?;
        inner.topic(topic)?;
        let record = inner
            .comments
            .get_mut(&topic)
            .and_then(|records| records.iter_mut().find(|c| c.id == comment))
            .ok_or(Error::CommentNotFound(comment))?;
        record.text = text;
        inner.relay(topic);
        Ok(())
    }

    async fn delete_comments(&self, topic: TopicId, comments: Vec<CommentId>) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_online()?;
        inner.topic(topic)?;
        // single lock scope: the whole batch lands in one snapshot
        if let Some(records) = inner.comments.get_mut(&topic) {
            records.retain(|c| !comments.contains(&c.id));
        }
        inner.relay(topic);
        Ok(())
    }

    async fn subscribe_comments(&self, topic: TopicId) -> Result<CommentFeed, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_online()?;
        inner.topic(topic)?;
        let (sender, receiver) = mpsc::unbounded_channel();
        sender
            .send(FeedMessage::Snapshot(inner.snapshot(topic)))
            .expect("receiver alive in this scope");
        inner.feeds.entry(topic).or_default().push(sender);
        Ok(CommentFeed::new(topic, receiver))
    }
}
