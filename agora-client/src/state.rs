use std::collections::{HashMap, HashSet};

use crate::api::CommentId;

/// Per-comment display state: `Viewing -> Editing -> Viewing` on save or
/// cancel, `Viewing -> ComposingReply -> Viewing` on submit or cancel.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum NodeMode {
    #[default]
    Viewing,
    Editing {
        draft: String,
    },
    ComposingReply {
        draft: String,
    },
}

const VIEWING: NodeMode = NodeMode::Viewing;

/// Transient UI state living outside the persisted model: unsaved drafts
/// survive snapshot re-renders until the user cancels or the underlying
/// comment disappears.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UiState {
    modes: HashMap<CommentId, NodeMode>,
}

impl UiState {
    pub fn new() -> UiState {
        UiState::default()
    }

    pub fn mode(&self, id: CommentId) -> &NodeMode {
        self.modes.get(&id).unwrap_or(&VIEWING)
    }

    /// Starts editing a comment, seeding the draft with its current text
    pub fn start_edit(&mut self, id: CommentId, current_text: &str) {
        self.modes.insert(
            id,
            NodeMode::Editing {
                draft: current_text.to_string(),
            },
        );
    }

    pub fn start_reply(&mut self, id: CommentId) {
        self.modes.insert(
            id,
            NodeMode::ComposingReply {
                draft: String::new(),
            },
        );
    }

    /// Replaces the in-progress draft; ignored when the node is not in an
    /// edit or reply composition
    pub fn set_draft(&mut self, id: CommentId, text: &str) {
        match self.modes.get_mut(&id) {
            Some(NodeMode::Editing { draft }) | Some(NodeMode::ComposingReply { draft }) => {
                *draft = text.to_string();
            }
            _ => (),
        }
    }

    /// Reverts the node to `Viewing`, discarding any unsaved draft
    pub fn cancel(&mut self, id: CommentId) {
        self.modes.remove(&id);
    }

    /// Ends the edit/reply and hands the draft back for submission
    pub fn take_draft(&mut self, id: CommentId) -> Option<String> {
        match self.modes.remove(&id) {
            Some(NodeMode::Editing { draft }) | Some(NodeMode::ComposingReply { draft }) => {
                Some(draft)
            }
            _ => None,
        }
    }

    /// Drops state for comments no longer present in the latest snapshot
    pub(crate) fn retain(&mut self, alive: &HashSet<CommentId>) {
        self.modes.retain(|id, _| alive.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Uuid;

    fn id(n: u128) -> CommentId {
        CommentId(Uuid::from_u128(n))
    }

    #[test]
    fn edit_cancel_reverts_to_viewing() {
        let mut ui = UiState::new();
        assert_eq!(*ui.mode(id(1)), NodeMode::Viewing);

        ui.start_edit(id(1), "original");
        ui.set_draft(id(1), "changed locally");
        assert_eq!(
            *ui.mode(id(1)),
            NodeMode::Editing {
                draft: String::from("changed locally")
            }
        );

        ui.cancel(id(1));
        assert_eq!(*ui.mode(id(1)), NodeMode::Viewing);
        assert_eq!(ui.take_draft(id(1)), None);
    }

    #[test]
    fn take_draft_ends_the_composition() {
        let mut ui = UiState::new();
        ui.start_reply(id(2));
        ui.set_draft(id(2), "hi there");
        assert_eq!(ui.take_draft(id(2)), Some(String::from("hi there")));
        assert_eq!(*ui.mode(id(2)), NodeMode::Viewing);
    }

    #[test]
    fn set_draft_requires_a_composition() {
        let mut ui = UiState::new();
        ui.set_draft(id(3), "into the void");
        assert_eq!(*ui.mode(id(3)), NodeMode::Viewing);
    }

    #[test]
    fn retain_prunes_deleted_comments_only() {
        let mut ui = UiState::new();
        ui.start_edit(id(1), "keep me");
        ui.start_reply(id(2));
        ui.retain(&[id(1)].into_iter().collect());
        assert_eq!(
            *ui.mode(id(1)),
            NodeMode::Editing {
                draft: String::from("keep me")
            }
        );
        assert_eq!(*ui.mode(id(2)), NodeMode::Viewing);
    }
}
