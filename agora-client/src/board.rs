use std::collections::HashSet;

use crate::api::{
    Comment, CommentFeed, Error, FeedMessage, NewTopic, Store, Topic,
};
use crate::state::UiState;
use crate::tree::{build_forest, CommentNode};
use crate::view::{render, split_lines, ViewNode};

/// Health of the live subscription backing a board
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FeedStatus {
    Live,
    /// The subscription is gone for good; only re-opening the board recovers
    Lost(String),
}

/// Everything the presentation layer needs for one paint of the board
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoardView {
    pub topic_title: String,
    pub topic_body: Vec<String>,
    pub comments: Vec<ViewNode>,
    /// Persistent failure message, rendered until the user re-navigates
    pub notice: Option<String>,
}

/// One open discussion board: the exclusive owner of its topic's snapshot
/// subscription. All derived state (forest, view) is rebuilt from scratch on
/// every snapshot; the latest snapshot fully supersedes everything before it.
pub struct Board<S> {
    store: S,
    topic: Topic,
    feed: CommentFeed,
    records: Vec<Comment>,
    forest: Vec<CommentNode>,
    ui: UiState,
    status: FeedStatus,
}

impl<S: Store> Board<S> {
    /// Opens the board for a category: waits for the store to be ready,
    /// finds the category's topic (provisioning the default one on a first
    /// visit), subscribes, and applies the initial snapshot.
    pub async fn open(store: S, category: &str) -> Result<Board<S>, Error> {
        store.ready().await?;
        let topic = match store.topic_in_category(category).await? {
            Some(topic) => topic,
            // Two concurrent first visits can each provision a default topic
            // here; the store offers no uniqueness primitive, so the
            // duplicate is accepted and left to manual cleanup.
            None => {
                tracing::info!(category, "no topic yet, provisioning the default one");
                store.add_topic(NewTopic::default_for(category)).await?
            }
        };
        let feed = store.subscribe_comments(topic.id).await?;
        let mut board = Board {
            store,
            topic,
            feed,
            records: Vec::new(),
            forest: Vec::new(),
            ui: UiState::new(),
            status: FeedStatus::Live,
        };
        // the subscription delivers the current snapshot up front
        board.next_change().await;
        Ok(board)
    }

    /// Moves to another category's board. The old subscription is released
    /// before the new one is acquired, so no stale callback can fire into
    /// the new view.
    pub async fn switch_category(self, category: &str) -> Result<Board<S>, Error> {
        let Board { store, feed, .. } = self;
        drop(feed);
        Board::open(store, category).await
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Transient edit/reply state, preserved across snapshots
    pub fn ui(&mut self) -> &mut UiState {
        &mut self.ui
    }

    /// Latest flat snapshot, as delivered by the store
    pub fn records(&self) -> &[Comment] {
        &self.records
    }

    pub fn comments(&self) -> Vec<ViewNode> {
        render(&self.forest, &self.ui)
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            topic_title: self.topic.title.clone(),
            topic_body: split_lines(&self.topic.content),
            comments: self.comments(),
            notice: match &self.status {
                FeedStatus::Live => None,
                FeedStatus::Lost(reason) => Some(format!(
                    "live updates were interrupted ({reason}); reload the board to retry"
                )),
            },
        }
    }

    /// Waits for and applies exactly one feed message. Messages are
    /// processed strictly serially; there is no queue to manage beyond the
    /// feed itself. Returns `false` once the feed can yield nothing more.
    pub async fn next_change(&mut self) -> bool {
        match self.feed.next().await {
            Some(msg) => {
                self.apply(msg);
                true
            }
            None => {
                if self.status == FeedStatus::Live {
                    self.status = FeedStatus::Lost(String::from("feed closed"));
                }
                false
            }
        }
    }

    /// Applies every already-delivered message without waiting. Each
    /// snapshot replaces the previous state wholesale, so processing all of
    /// them is equivalent to keeping only the latest.
    pub fn drain_changes(&mut self) {
        while let Some(msg) = self.feed.try_next() {
            self.apply(msg);
        }
    }

    fn apply(&mut self, msg: FeedMessage) {
        match msg {
            FeedMessage::Snapshot(records) => {
                let alive = records.iter().map(|c| c.id).collect::<HashSet<_>>();
                self.ui.retain(&alive);
                self.forest = build_forest(&records);
                self.records = records;
                tracing::debug!(
                    topic = ?self.topic.id,
                    num_comments = self.records.len(),
                    "applied snapshot"
                );
            }
            FeedMessage::Lost(reason) => {
                tracing::error!(topic = ?self.topic.id, %reason, "comment feed lost");
                self.status = FeedStatus::Lost(reason);
            }
        }
    }
}
