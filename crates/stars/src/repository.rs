//! Store adapter for the local star mirror.
//!
//! Free functions over a `DatabaseConnection`. Writes are keyed on the
//! repository URL and go through a single `INSERT .. ON CONFLICT` statement.

mod bulk;
mod errors;
mod query;
mod single;

pub use bulk::{delete_all, upsert_many};
pub use errors::{RepositoryError, Result};
pub use query::{Match, StarFilter, count, find_all, find_matching};
pub use single::{delete_by_url, find_by_url, upsert};

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbErr, EntityTrait, QueryTrait, Set};
    use serde_json::json;

    use crate::entity::star::{ActiveModel, Entity as Star};

    #[test]
    fn test_repository_error_from_db_err() {
        let err: RepositoryError = DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, RepositoryError::Database(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_upsert_statement_targets_url() {
        let now = chrono::Utc::now().fixed_offset();
        let model = ActiveModel {
            url: Set("https://github.com/o/r".to_string()),
            pushed_at: Set(now),
            language: Set(String::new()),
            stargazers: Set(0),
            archived: Set(false),
            description: Set(String::new()),
            topics: Set(json!([])),
            synced_at: Set(now),
        };
        let sql = Star::insert(model)
            .on_conflict(single::build_upsert_on_conflict())
            .build(sea_orm::DbBackend::Sqlite)
            .to_string();

        assert!(sql.contains("ON CONFLICT (\"url\") DO UPDATE"), "got {sql}");
        assert!(sql.contains("\"description\" = \"excluded\".\"description\""));
        assert!(sql.contains("\"topics\" = \"excluded\".\"topics\""));
    }
}
