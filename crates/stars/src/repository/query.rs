use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::entity::star::{Column, Entity as Star, Model};

use super::errors::{RepositoryError, Result};

/// How the predicates of a [`StarFilter`] are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Match {
    /// Every set predicate must hold.
    #[default]
    All,
    /// At least one set predicate must hold.
    Any,
}

/// Column predicates evaluated by the database.
///
/// Unset predicates are ignored. A filter with no predicates matches every row.
#[derive(Debug, Clone, Default)]
pub struct StarFilter {
    /// Exact, case-sensitive language match against the stored lower-cased value.
    pub language: Option<String>,
    /// Archived flag must equal this value.
    pub archived: Option<bool>,
    /// `pushed_at` must be strictly earlier than this instant.
    pub pushed_before: Option<DateTime<Utc>>,
    /// How set predicates combine.
    pub mode: Match,
}

impl StarFilter {
    /// Filter on a single language.
    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Default::default()
        }
    }

    /// Whether no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.archived.is_none() && self.pushed_before.is_none()
    }

    fn condition(&self) -> Option<Condition> {
        if self.is_empty() {
            return None;
        }

        let mut condition = match self.mode {
            Match::All => Condition::all(),
            Match::Any => Condition::any(),
        };
        if let Some(language) = &self.language {
            condition = condition.add(Column::Language.eq(language.as_str()));
        }
        if let Some(archived) = self.archived {
            condition = condition.add(Column::Archived.eq(archived));
        }
        if let Some(before) = self.pushed_before {
            condition = condition.add(Column::PushedAt.lt(before.fixed_offset()));
        }
        Some(condition)
    }
}

// ─── Query Operations ────────────────────────────────────────────────────────

/// Load every star in the mirror, ordered by URL.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>> {
    Star::find()
        .order_by_asc(Column::Url)
        .all(db)
        .await
        .map_err(RepositoryError::from)
}

/// Load the stars matching `filter`, ordered by URL.
pub async fn find_matching(db: &DatabaseConnection, filter: &StarFilter) -> Result<Vec<Model>> {
    let mut query = Star::find();
    if let Some(condition) = filter.condition() {
        query = query.filter(condition);
    }

    query
        .order_by_asc(Column::Url)
        .all(db)
        .await
        .map_err(RepositoryError::from)
}

/// Count stars in the mirror.
pub async fn count(db: &DatabaseConnection) -> Result<u64> {
    Star::find().count(db).await.map_err(RepositoryError::from)
}
