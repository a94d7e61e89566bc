use crate::api::CommentId;
use crate::state::{NodeMode, UiState};
use crate::tree::CommentNode;

/// What the presentation layer shows for one comment. A pure projection of
/// the forest plus transient UI state; rebuilding it is cheap enough to do
/// on every snapshot, so no diffing is needed for correctness.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ViewNode {
    pub id: CommentId,
    pub author: String,
    /// Comment text with newline sequences mapped to separate lines
    pub lines: Vec<String>,
    pub posted_at: String,
    pub mode: NodeMode,
    pub children: Vec<ViewNode>,
}

pub fn render(forest: &[CommentNode], ui: &UiState) -> Vec<ViewNode> {
    forest.iter().map(|node| render_node(node, ui)).collect()
}

fn render_node(node: &CommentNode, ui: &UiState) -> ViewNode {
    ViewNode {
        id: node.comment.id,
        author: node.comment.author.clone(),
        lines: split_lines(&node.comment.text),
        posted_at: node.comment.created_at.format("%Y-%m-%d %H:%M").to_string(),
        mode: ui.mode(node.comment.id).clone(),
        children: render(&node.children, ui),
    }
}

pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}
