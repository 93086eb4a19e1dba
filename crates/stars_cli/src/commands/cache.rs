//! `stars clear-cache`: drop every mirrored star.

use stars::{bootstrap, repository};

use crate::commands::shared::open_database;
use crate::config::Config;

/// Handle the clear-cache command.
///
/// With `purge` the SQLite file itself is removed as well.
pub(crate) async fn handle_clear_cache(
    config: &Config,
    purge: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_database(config).await?;
    let deleted = repository::delete_all(&db).await?;
    println!("Removed {deleted} stars from the local mirror.");

    if purge {
        db.close().await?;
        match config.sqlite_path() {
            Some(path) => {
                bootstrap::remove_cache_file(&path)?;
                println!("Deleted {}", path.display());
            }
            None => tracing::warn!("Database is not a SQLite file; nothing to purge"),
        }
    }
    Ok(())
}
