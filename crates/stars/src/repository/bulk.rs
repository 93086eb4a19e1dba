use sea_orm::{DatabaseConnection, EntityTrait};

use crate::entity::star::{ActiveModel, Entity as Star};

use super::errors::Result;
use super::single::build_upsert_on_conflict;

// ─── Bulk Operations ─────────────────────────────────────────────────────────

/// Upsert many stars in one `INSERT .. ON CONFLICT` statement.
///
/// The statement is atomic: either every row is written or none is.
/// Returns the number of models submitted.
pub async fn upsert_many(db: &DatabaseConnection, models: Vec<ActiveModel>) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }

    let count = models.len() as u64;
    Star::insert_many(models)
        .on_conflict(build_upsert_on_conflict())
        .exec_without_returning(db)
        .await?;
    Ok(count)
}

/// Delete every star in the mirror.
///
/// Returns the number of rows deleted.
pub async fn delete_all(db: &DatabaseConnection) -> Result<u64> {
    let result = Star::delete_many().exec(db).await?;
    Ok(result.rows_affected)
}
