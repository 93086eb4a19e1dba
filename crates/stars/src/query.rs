//! Read-only queries over the local mirror.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::entity::star::Model as Star;
use crate::error::{Result, StarsError};
use crate::repository::{self, StarFilter};

/// How often a topic occurs across the mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicFrequency {
    pub topic: String,
    pub count: usize,
}

/// Count every topic over every stored star.
///
/// Sorted by count descending, then by topic ascending.
pub async fn topic_frequencies(db: &DatabaseConnection) -> Result<Vec<TopicFrequency>> {
    let stars = repository::find_all(db).await?;
    Ok(count_topics(&stars))
}

fn count_topics(stars: &[Star]) -> Vec<TopicFrequency> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for star in stars {
        for topic in star.topic_names() {
            *counts.entry(topic).or_default() += 1;
        }
    }

    let mut frequencies: Vec<TopicFrequency> = counts
        .into_iter()
        .map(|(topic, count)| TopicFrequency { topic, count })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.topic.cmp(&b.topic)));
    frequencies
}

/// Selection criteria for [`select_projects`].
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    /// Maximum number of stars to return.
    pub count: usize,
    /// Exact language match against the stored lower-cased value; callers
    /// lower-case their input. `None` or empty means any.
    pub language: Option<String>,
    /// Exact topic match. `None` or empty means any.
    pub topic: Option<String>,
    /// Shuffle instead of ranking by stargazers.
    pub random: bool,
}

impl SelectOptions {
    fn language_filter(&self) -> StarFilter {
        match self.language.as_deref() {
            Some(language) if !language.is_empty() => StarFilter::language(language),
            _ => StarFilter::default(),
        }
    }

    fn topic(&self) -> Option<&str> {
        self.topic.as_deref().filter(|t| !t.is_empty())
    }
}

/// Pick stars by language and topic, then shuffle or rank and truncate.
///
/// The language filter runs in the store; the topic filter runs in memory.
/// Ranking is by stargazer count descending; equal counts keep URL order.
///
/// # Errors
/// Returns [`StarsError::NoMatch`] if nothing survives the filters, and
/// [`StarsError::Store`] if the store read fails.
pub async fn select_projects<R: Rng + ?Sized>(
    db: &DatabaseConnection,
    options: &SelectOptions,
    rng: &mut R,
) -> Result<Vec<Star>> {
    let mut stars = repository::find_matching(db, &options.language_filter()).await?;

    if let Some(topic) = options.topic() {
        stars.retain(|star| star.has_topic(topic));
    }

    if stars.is_empty() {
        return Err(StarsError::NoMatch);
    }

    if options.random {
        stars.shuffle(rng);
    } else {
        stars.sort_by(|a, b| b.stargazers.cmp(&a.stargazers));
    }

    stars.truncate(options.count);
    Ok(stars)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn star(url: &str, topics: &[&str]) -> Star {
        let now = Utc::now().fixed_offset();
        Star {
            url: url.to_string(),
            pushed_at: now,
            language: String::new(),
            stargazers: 0,
            archived: false,
            description: String::new(),
            topics: serde_json::json!(topics),
            synced_at: now,
        }
    }

    #[test]
    fn test_count_topics_orders_by_count_then_name() {
        let stars = vec![star("a", &["a", "b"]), star("b", &["a", "c"])];
        let frequencies = count_topics(&stars);

        let pairs: Vec<(&str, usize)> = frequencies
            .iter()
            .map(|f| (f.topic.as_str(), f.count))
            .collect();
        assert_eq!(pairs, vec![("a", 2), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn test_count_topics_empty() {
        assert!(count_topics(&[]).is_empty());
    }

    #[test]
    fn test_select_options_treats_empty_strings_as_unset() {
        let options = SelectOptions {
            language: Some(String::new()),
            topic: Some(String::new()),
            ..Default::default()
        };
        assert!(options.language_filter().is_empty());
        assert_eq!(options.topic(), None);
    }
}
