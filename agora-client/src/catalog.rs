use crate::api::{Error, Store, Topic};

/// Topics of a category, newest first, optionally narrowed to one
/// sub-category. Records without a sub-category land in the fallback bucket,
/// so filtering by it finds them too.
///
/// The sort happens client-side: the store is only trusted for the category
/// filter, not for ordering a filtered query.
pub async fn topics_newest_first<S: Store>(
    store: &S,
    category: &str,
    sub_category: Option<&str>,
) -> Result<Vec<Topic>, Error> {
    let mut topics = store.list_topics(category).await?;
    if let Some(filter) = sub_category {
        topics.retain(|t| t.sub_category() == filter);
    }
    topics.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(topics)
}
