mod board;
pub use board::{Board, BoardView, FeedStatus};

mod catalog;
pub use catalog::topics_newest_first;

mod mutate;
pub use mutate::{
    create_comment, delete_comment, edit_comment, post_topic, remove_topic, revise_topic,
};

mod state;
pub use state::{NodeMode, UiState};

mod tree;
pub use tree::{build_forest, subtree_ids, CommentNode};

mod view;
pub use view::{render, ViewNode};

pub mod api {
    pub use agora_api::*;
}
