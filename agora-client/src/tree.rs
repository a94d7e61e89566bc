use std::collections::{HashMap, HashSet};

use crate::api::{Comment, CommentId};

/// One comment with its replies attached. Only ever derived from the flat
/// record set, never persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentNode {
    pub comment: Comment,
    /// Replies, ordered by `created_at` ascending
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    /// Total number of comments in this subtree, itself included
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(CommentNode::len).sum::<usize>()
    }
}

/// Assembles the flat record set of one topic into a forest of reply trees.
///
/// Input order is irrelevant: ordering is re-imposed by `created_at`, with
/// ties between siblings broken by arrival order in `records`. A record
/// whose `parent_id` points at a missing id (deleted concurrently, or a
/// stray self-reference) is promoted to root level rather than dropped.
///
/// Pure: no I/O, `records` untouched, safe to re-run on every snapshot.
pub fn build_forest(records: &[Comment]) -> Vec<CommentNode> {
    let ids = records.iter().map(|c| c.id).collect::<HashSet<_>>();

    let mut ordered = records.iter().collect::<Vec<_>>();
    // stable sort, so same-timestamp siblings keep their arrival order
    ordered.sort_by_key(|c| c.created_at);

    let mut children: HashMap<CommentId, Vec<&Comment>> = HashMap::new();
    let mut roots: Vec<&Comment> = Vec::new();
    for c in ordered {
        match c.parent_id {
            Some(parent) if parent != c.id && ids.contains(&parent) => {
                children.entry(parent).or_default().push(c);
            }
            Some(parent) => {
                tracing::warn!(comment = ?c.id, ?parent, "promoting orphaned reply to root level");
                roots.push(c);
            }
            None => roots.push(c),
        }
    }

    roots
        .into_iter()
        .map(|c| attach_children(c, &mut children))
        .collect()
}

fn attach_children(
    comment: &Comment,
    children: &mut HashMap<CommentId, Vec<&Comment>>,
) -> CommentNode {
    let direct = children.remove(&comment.id).unwrap_or_default();
    CommentNode {
        comment: comment.clone(),
        children: direct
            .into_iter()
            .map(|c| attach_children(c, children))
            .collect(),
    }
}

/// The comment plus every transitive descendant, for the cascading delete.
/// The root id is always first; descendants follow in breadth-first order.
pub fn subtree_ids(records: &[Comment], root: CommentId) -> Vec<CommentId> {
    let mut children: HashMap<CommentId, Vec<CommentId>> = HashMap::new();
    for c in records {
        match c.parent_id {
            Some(parent) if parent != c.id => children.entry(parent).or_default().push(c.id),
            _ => (),
        }
    }
    let mut doomed = vec![root];
    let mut at = 0;
    while at < doomed.len() {
        if let Some(direct) = children.get(&doomed[at]) {
            doomed.extend(direct.iter().copied());
        }
        at += 1;
    }
    doomed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Time, Uuid};
    use chrono::TimeZone;
    use rand::seq::SliceRandom;

    fn id(n: u128) -> CommentId {
        CommentId(Uuid::from_u128(n))
    }

    fn at(secs: i64) -> Time {
        chrono::Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn comment(n: u128, parent: Option<u128>, secs: i64) -> Comment {
        Comment {
            id: id(n),
            parent_id: parent.map(id),
            author: format!("author-{n}"),
            text: format!("text-{n}"),
            ownership_token: String::from("tok"),
            created_at: at(secs),
        }
    }

    fn forest_len(forest: &[CommentNode]) -> usize {
        forest.iter().map(CommentNode::len).sum()
    }

    #[test]
    fn builds_nested_forest_in_chronological_order() {
        let records = vec![
            comment(3, Some(1), 30),
            comment(1, None, 10),
            comment(4, Some(3), 40),
            comment(2, None, 20),
            comment(5, Some(1), 25),
        ];
        let forest = build_forest(&records);
        assert_eq!(forest_len(&forest), records.len());
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].comment.id, id(1));
        assert_eq!(forest[1].comment.id, id(2));
        // children of 1 sorted by created_at: 5 (t=25) before 3 (t=30)
        let kids: Vec<_> = forest[0].children.iter().map(|n| n.comment.id).collect();
        assert_eq!(kids, vec![id(5), id(3)]);
        assert_eq!(forest[0].children[1].children[0].comment.id, id(4));
    }

    #[test]
    fn same_timestamp_siblings_keep_arrival_order() {
        let records = vec![
            comment(1, None, 10),
            comment(7, Some(1), 20),
            comment(8, Some(1), 20),
            comment(9, Some(1), 20),
        ];
        let kids: Vec<_> = build_forest(&records)[0]
            .children
            .iter()
            .map(|n| n.comment.id)
            .collect();
        assert_eq!(kids, vec![id(7), id(8), id(9)]);
    }

    #[test]
    fn forest_is_invariant_under_input_permutation() {
        let mut records = vec![
            comment(1, None, 10),
            comment(2, Some(1), 20),
            comment(3, Some(2), 30),
            comment(4, None, 15),
            comment(5, Some(4), 35),
            comment(6, Some(1), 25),
        ];
        let reference = build_forest(&records);
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            records.shuffle(&mut rng);
            assert_eq!(build_forest(&records), reference);
        }
    }

    #[test]
    fn orphans_are_promoted_to_roots_not_dropped() {
        let records = vec![
            comment(1, None, 10),
            // parent 99 never existed (or was deleted concurrently)
            comment(2, Some(99), 20),
            // a self-referencing record must not recurse forever either
            comment(3, Some(3), 30),
        ];
        let forest = build_forest(&records);
        assert_eq!(forest_len(&forest), 3);
        let roots: Vec<_> = forest.iter().map(|n| n.comment.id).collect();
        assert_eq!(roots, vec![id(1), id(2), id(3)]);
    }

    #[test]
    fn subtree_ids_collects_all_descendants() {
        let records = vec![
            comment(1, None, 10),
            comment(2, Some(1), 20),
            comment(3, Some(1), 30),
            comment(4, Some(2), 40),
            comment(5, None, 50),
        ];
        let mut doomed = subtree_ids(&records, id(1));
        assert_eq!(doomed[0], id(1));
        doomed.sort();
        assert_eq!(doomed, vec![id(1), id(2), id(3), id(4)]);
        assert_eq!(subtree_ids(&records, id(5)), vec![id(5)]);
    }
}
