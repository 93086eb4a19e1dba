//! Stars CLI - keep a local mirror of your GitHub stars and prune it.

mod commands;
mod config;
mod progress;
mod shutdown;

use clap::{Parser, Subcommand};
use stars::SelectOptions;
use tracing_subscriber::EnvFilter;

use crate::commands::shared::{OutputFormat, open_manager};

#[derive(Parser)]
#[command(name = "stars")]
#[command(version)]
#[command(about = "A local mirror of your GitHub starred repositories")]
#[command(
    long_about = "Stars keeps a local SQLite copy of the repositories you starred on GitHub. \
It can list popular topics, pick projects by language or topic, and unstar \
repositories on GitHub and locally in one step."
)]
#[command(after_long_help = r#"EXAMPLES
    Populate the mirror (only if empty) or force a full resync:
        $ stars sync
        $ stars sync --force

    Show the 20 most common topics:
        $ stars topics --limit 20

    Pick three random Rust projects tagged "cli":
        $ stars show -c 3 -l rust -t cli -r

    Unstar archived repositories and ones untouched for two years:
        $ stars cleanup -a 24

CONFIGURATION
    Stars reads configuration from:
      1. ~/.config/stars/config.toml (or $XDG_CONFIG_HOME/stars/config.toml)
      2. ./stars.toml
      3. Environment variables (STARS_* prefix, e.g., STARS_GITHUB_TOKEN)
      4. .env file in current directory

    Without a configured token the "api.github.com" entry of ~/.netrc is used.

ENVIRONMENT VARIABLES
    STARS_DATABASE_URL     Database connection string (default: ~/.cache/stars.db)
    STARS_GITHUB_TOKEN     GitHub personal access token
    STARS_GITHUB_USERNAME  Account to mirror (default: the token's owner)
    STARS_GITHUB_HOST      API host (default: api.github.com)
"#)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every starred repository into the mirror
    Sync {
        /// Resync even if the mirror already holds stars
        #[arg(short, long)]
        force: bool,
    },
    /// List topics by how many starred repositories carry them
    Topics {
        /// Show at most this many topics
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Pick starred repositories by language and topic
    Show {
        /// Number of repositories to show
        #[arg(short, long, default_value_t = 5)]
        count: usize,

        /// Only repositories in this language (case-insensitive)
        #[arg(short, long)]
        language: Option<String>,

        /// Only repositories with this topic
        #[arg(short, long)]
        topic: Option<String>,

        /// Pick at random instead of by stargazer count
        #[arg(short, long)]
        random: bool,
    },
    /// Unstar repositories on GitHub and drop them from the mirror
    Remove {
        /// Repository URLs, e.g. https://github.com/owner/name
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Unstar stale or archived repositories
    ///
    /// Removes every star last pushed more than the given number of months
    /// ago, and every star whose archived flag equals --archived.
    Cleanup {
        /// Age threshold in months (default from config or 12)
        #[arg(short, long = "age")]
        age_months: Option<u32>,

        /// Archived flag to match (default from config or true)
        #[arg(long)]
        archived: Option<bool>,
    },
    /// Delete every star from the local mirror (GitHub is not touched)
    ClearCache {
        /// Also delete the SQLite file
        #[arg(long)]
        purge: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("stars=info,stars_cli=info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Config file -> env vars -> defaults
    let config = config::Config::load();

    let cli = Cli::parse();

    if let Commands::ClearCache { purge } = cli.command {
        return commands::cache::handle_clear_cache(&config, purge).await;
    }

    let token = shutdown::setup_shutdown_handler();
    let manager = open_manager(&config, token).await?;

    match cli.command {
        Commands::Sync { force } => {
            commands::sync::handle_sync(&manager, force, cli.output).await?;
        }
        Commands::Topics { limit } => {
            commands::query::handle_topics(&manager, limit, cli.output).await?;
        }
        Commands::Show {
            count,
            language,
            topic,
            random,
        } => {
            let options = show_options(count, language, topic, random);
            commands::query::handle_show(&manager, options, cli.output).await?;
        }
        Commands::Remove { urls } => {
            commands::remove::handle_remove(&manager, &urls).await?;
        }
        Commands::Cleanup {
            age_months,
            archived,
        } => {
            commands::remove::handle_cleanup(
                &manager,
                age_months.unwrap_or(config.cleanup.age_months),
                archived.unwrap_or(config.cleanup.archived),
                cli.output,
            )
            .await?;
        }
        Commands::ClearCache { .. } => {}
    }

    Ok(())
}

/// Stored languages are lower-cased, so the `-l` argument is too.
fn show_options(
    count: usize,
    language: Option<String>,
    topic: Option<String>,
    random: bool,
) -> SelectOptions {
    SelectOptions {
        count,
        language: language.map(|l| l.to_lowercase()),
        topic,
        random,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show_flags() {
        let cli = Cli::try_parse_from(["stars", "show", "-c", "3", "-l", "Go", "-t", "cli", "-r"])
            .unwrap();
        match cli.command {
            Commands::Show {
                count,
                language,
                topic,
                random,
            } => {
                assert_eq!(count, 3);
                assert_eq!(language.as_deref(), Some("Go"));
                assert_eq!(topic.as_deref(), Some("cli"));
                assert!(random);
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_parse_cleanup_defaults_to_config() {
        let cli = Cli::try_parse_from(["stars", "cleanup"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cleanup {
                age_months: None,
                archived: None
            }
        ));

        let cli = Cli::try_parse_from(["stars", "cleanup", "-a", "24", "--archived", "false"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cleanup {
                age_months: Some(24),
                archived: Some(false)
            }
        ));
    }

    #[test]
    fn test_show_options_lowercase_language() {
        let options = show_options(3, Some("Go".to_string()), Some("CLI".to_string()), false);
        assert_eq!(options.language.as_deref(), Some("go"));
        assert_eq!(options.topic.as_deref(), Some("CLI"));
        assert_eq!(options.count, 3);
    }

    #[test]
    fn test_remove_requires_url() {
        assert!(Cli::try_parse_from(["stars", "remove"]).is_err());
    }

    #[test]
    fn test_global_output_flag() {
        let cli = Cli::try_parse_from(["stars", "topics", "--output", "json"]).unwrap();
        assert!(matches!(cli.output, OutputFormat::Json));
    }
}
