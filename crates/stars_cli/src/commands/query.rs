//! `stars topics` and `stars show`: read-only views of the mirror.

use serde::Serialize;
use stars::{SelectOptions, StarModel, TopicFrequency};
use tabled::Tabled;

use crate::commands::shared::{Manager, OutputFormat, ensure_populated, print_rows, truncate};

const DESCRIPTION_WIDTH: usize = 60;

#[derive(Debug, Serialize, Tabled)]
struct TopicRow {
    #[tabled(rename = "Topic")]
    topic: String,
    #[tabled(rename = "Stars")]
    count: usize,
}

impl From<TopicFrequency> for TopicRow {
    fn from(frequency: TopicFrequency) -> Self {
        Self {
            topic: frequency.topic,
            count: frequency.count,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct StarRow {
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Language")]
    language: String,
    #[tabled(rename = "Stars")]
    stargazers: i32,
    #[tabled(rename = "Last Push")]
    pushed: String,
    #[tabled(rename = "Archived")]
    archived: bool,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&StarModel> for StarRow {
    fn from(star: &StarModel) -> Self {
        Self {
            url: star.url.clone(),
            language: star.language.clone(),
            stargazers: star.stargazers,
            pushed: star.pushed_at.format("%Y-%m-%d").to_string(),
            archived: star.archived,
            description: truncate(&star.description, DESCRIPTION_WIDTH),
        }
    }
}

/// Handle the topics command.
pub(crate) async fn handle_topics(
    manager: &Manager,
    limit: Option<usize>,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_populated(manager).await?;

    let mut frequencies = manager.topic_frequencies().await?;
    if let Some(limit) = limit {
        frequencies.truncate(limit);
    }

    if frequencies.is_empty() {
        println!("No topics found.");
        return Ok(());
    }

    let rows: Vec<TopicRow> = frequencies.into_iter().map(TopicRow::from).collect();
    print_rows(&rows, output)?;
    Ok(())
}

/// Handle the show command.
pub(crate) async fn handle_show(
    manager: &Manager,
    options: SelectOptions,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_populated(manager).await?;

    let stars = match manager.select_projects(&options, &mut rand::rng()).await {
        Ok(stars) => stars,
        Err(e) if e.is_no_match() => {
            println!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stars)?),
        OutputFormat::Table => {
            let rows: Vec<StarRow> = stars.iter().map(StarRow::from).collect();
            print_rows(&rows, output)?;
        }
    }
    Ok(())
}
