use chrono::{DateTime, Utc};
use sea_orm::Set;

use crate::entity::star::ActiveModel as StarActiveModel;

use super::types::RemoteRepo;

impl RemoteRepo {
    /// The timestamp stored as `pushed_at`.
    ///
    /// Falls back to `updated_at`, then `created_at`, then the UNIX epoch,
    /// so a repository that never reports a push is treated as old.
    pub fn effective_pushed_at(&self) -> DateTime<Utc> {
        self.pushed_at
            .or(self.updated_at)
            .or(self.created_at)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Normalize this repository into a store record.
    ///
    /// Language is lower-cased; absent language and description become empty
    /// strings; stargazer counts beyond `i32::MAX` saturate.
    pub fn to_active_model(&self, synced_at: DateTime<Utc>) -> StarActiveModel {
        let language = self
            .language
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();
        let stargazers = i32::try_from(self.stargazers).unwrap_or(i32::MAX);

        StarActiveModel {
            url: Set(self.url.clone()),
            pushed_at: Set(self.effective_pushed_at().fixed_offset()),
            language: Set(language),
            stargazers: Set(stargazers),
            archived: Set(self.archived),
            description: Set(self.description.clone().unwrap_or_default()),
            topics: Set(serde_json::json!(self.topics)),
            synced_at: Set(synced_at.fixed_offset()),
        }
    }
}
