//! Star entity - one row per starred repository in the local mirror.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a starred repository, keyed by its HTML URL.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stars")]
pub struct Model {
    /// HTML URL of the repository (natural key).
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub url: String,

    /// When code was last pushed to the repository.
    pub pushed_at: DateTimeWithTimeZone,

    /// Primary language, lower-cased. Empty when the platform reports none.
    pub language: String,

    /// Stargazer count.
    pub stargazers: i32,

    /// Whether the repository is archived (read-only).
    #[sea_orm(default_value = false)]
    pub archived: bool,

    /// Repository description. Empty when the platform reports none.
    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Topics, stored as a JSON array of strings.
    #[sea_orm(column_type = "Json")]
    pub topics: serde_json::Value,

    /// When this record was last written by a sync.
    pub synced_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Topics as owned strings. Non-string JSON entries are skipped.
    pub fn topic_names(&self) -> Vec<String> {
        self.topics
            .as_array()
            .map(|topics| {
                topics
                    .iter()
                    .filter_map(|t| t.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `topic` is one of this repository's topics (exact match).
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics
            .as_array()
            .is_some_and(|topics| topics.iter().any(|t| t.as_str() == Some(topic)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_test_model(topics: serde_json::Value) -> Model {
        let now = Utc::now().fixed_offset();
        Model {
            url: "https://github.com/octocat/hello-world".to_string(),
            pushed_at: now,
            language: "rust".to_string(),
            stargazers: 42,
            archived: false,
            description: String::new(),
            topics,
            synced_at: now,
        }
    }

    #[test]
    fn test_topic_names() {
        let model = make_test_model(serde_json::json!(["cli", "rust"]));
        assert_eq!(model.topic_names(), vec!["cli", "rust"]);
    }

    #[test]
    fn test_topic_names_tolerates_non_array() {
        let model = make_test_model(serde_json::Value::Null);
        assert!(model.topic_names().is_empty());
        assert!(!model.has_topic("cli"));
    }

    #[test]
    fn test_has_topic_is_exact() {
        let model = make_test_model(serde_json::json!(["command-line"]));
        assert!(model.has_topic("command-line"));
        assert!(!model.has_topic("command"));
        assert!(!model.has_topic("Command-Line"));
    }
}
