//! Database connection utilities.

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// How long a file-backed SQLite connection waits on the write lock.
///
/// Page tasks upsert concurrently, so a busy database must make them wait
/// instead of failing with `SQLITE_BUSY`.
#[cfg(feature = "sqlite")]
const SQLITE_BUSY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

fn is_sqlite_file_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite://")
}

/// WAL, busy timeout and NORMAL sync, set on every pooled connection.
#[cfg(feature = "sqlite")]
fn apply_sqlite_options(options: &mut ConnectOptions) {
    use sea_orm::sqlx::sqlite::{SqliteJournalMode, SqliteSynchronous};

    options.map_sqlx_sqlite_opts(|opts| {
        opts.journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(SQLITE_BUSY_TIMEOUT)
            .synchronous(SqliteSynchronous::Normal)
    });
}

#[cfg(not(feature = "sqlite"))]
fn apply_sqlite_options(_options: &mut ConnectOptions) {}

/// Build pool options for `database_url`.
///
/// File-backed SQLite URLs get their pragmas through the connect options, so
/// connections the pool opens later are configured too. In-memory and other
/// backends are left as sea-orm defaults.
pub fn connect_options(database_url: &str) -> ConnectOptions {
    let mut options = ConnectOptions::new(database_url);
    if is_sqlite_file_url(database_url) {
        apply_sqlite_options(&mut options);
    }
    options
}

/// Establish a connection to the mirror database.
///
/// # Arguments
/// * `database_url` - Connection string, e.g. `sqlite:///home/me/.cache/stars.db?mode=rwc`
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(connect_options(database_url)).await
}

/// Establish a connection and bring the schema up to date.
///
/// This is what the engine and the CLI use: an empty or freshly created
/// cache file comes back ready for upserts.
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established or a migration fails.
#[cfg(feature = "migrate")]
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    use sea_orm_migration::MigratorTrait;

    let db = connect(database_url).await?;
    crate::migration::Migrator::up(&db, None).await?;
    tracing::debug!(database_url, "Database ready");
    Ok(db)
}
