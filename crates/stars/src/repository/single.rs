use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::entity::star::{ActiveModel, Column, Entity as Star, Model};

use super::errors::{RepositoryError, Result};

// ─── Single Record Operations ────────────────────────────────────────────────

/// Build the ON CONFLICT clause used by every upsert.
///
/// The URL is the natural key; every other column is overwritten by the
/// incoming snapshot, so the last writer for a key wins.
pub(crate) fn build_upsert_on_conflict() -> OnConflict {
    OnConflict::column(Column::Url)
        .update_columns([
            Column::PushedAt,
            Column::Language,
            Column::Stargazers,
            Column::Archived,
            Column::Description,
            Column::Topics,
            Column::SyncedAt,
        ])
        .to_owned()
}

/// Insert or overwrite a star by its URL.
///
/// This is a single `INSERT .. ON CONFLICT (url) DO UPDATE` statement, so
/// concurrent upserts of the same URL never produce duplicates.
///
/// # Errors
/// Returns `RepositoryError::InvalidInput` if the URL is unset or empty, and
/// `RepositoryError::Database` if the statement fails.
pub async fn upsert(db: &DatabaseConnection, model: ActiveModel) -> Result<()> {
    match &model.url {
        ActiveValue::Set(url) | ActiveValue::Unchanged(url) if !url.is_empty() => {}
        _ => {
            return Err(RepositoryError::InvalidInput {
                message: "Missing required field: url".to_string(),
            });
        }
    }

    Star::insert(model)
        .on_conflict(build_upsert_on_conflict())
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Find a star by its URL.
pub async fn find_by_url(db: &DatabaseConnection, url: &str) -> Result<Option<Model>> {
    Star::find_by_id(url.to_string())
        .one(db)
        .await
        .map_err(RepositoryError::from)
}

/// Delete a star by its URL.
///
/// Returns the number of rows deleted (0 or 1).
pub async fn delete_by_url(db: &DatabaseConnection, url: &str) -> Result<u64> {
    let result = Star::delete_by_id(url.to_string()).exec(db).await?;
    Ok(result.rows_affected)
}
