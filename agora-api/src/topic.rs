use uuid::Uuid;

use crate::{Error, Time, STUB_UUID};

/// Sub-category bucket used when a record carries none
pub const FALLBACK_SUB_CATEGORY: &str = "etc";

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct TopicId(pub Uuid);

impl TopicId {
    pub fn stub() -> TopicId {
        TopicId(STUB_UUID)
    }
}

/// The discussion-anchor document comments attach to. Each board category
/// holds at least one of these; the first visit auto-provisions a default.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub created_at: Time,
}

impl Topic {
    pub fn sub_category(&self) -> &str {
        self.sub_category.as_deref().unwrap_or(FALLBACK_SUB_CATEGORY)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewTopic {
    pub title: String,
    pub content: String,
    pub category: String,
    pub sub_category: Option<String>,
}

impl NewTopic {
    /// The default topic provisioned the first time a category is visited
    /// and no topic exists for it yet.
    pub fn default_for(category: &str) -> NewTopic {
        let (title, content) = match category {
            "free" => (
                "Open discussion",
                "Share your thoughts and experiences freely here.",
            ),
            _ => (
                "Ask anything",
                "Post your questions about this board's subject and get answers.",
            ),
        };
        NewTopic {
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            sub_category: None,
        }
    }

    // See comments on other `validate` functions throughout agora-api
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string("title", &self.title)?;
        crate::validate_string("content", &self.content)?;
        crate::validate_string("category", &self.category)?;
        Ok(())
    }
}

/// Partial update for a topic; `None` fields are left untouched.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TopicPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub sub_category: Option<String>,
}

impl TopicPatch {
    // See comments on other `validate` functions throughout agora-api
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(title) = &self.title {
            crate::validate_string("title", title)?;
        }
        if let Some(content) = &self.content {
            crate::validate_string("content", content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_topics_pass_validation() {
        for category in ["free", "qna", "something-else"] {
            let t = NewTopic::default_for(category);
            assert_eq!(t.validate(), Ok(()));
            assert_eq!(t.category, category);
        }
    }

    #[test]
    fn sub_category_falls_back() {
        let mut t = Topic {
            id: TopicId::stub(),
            title: String::from("t"),
            content: String::from("c"),
            category: String::from("free"),
            sub_category: None,
            created_at: chrono::Utc::now(),
        };
        assert_eq!(t.sub_category(), FALLBACK_SUB_CATEGORY);
        t.sub_category = Some(String::from("patterns"));
        assert_eq!(t.sub_category(), "patterns");
    }
}
