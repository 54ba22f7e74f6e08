//! Notice service - queued, read-once user-facing status messages.

use faved_common::{AppResult, IdGenerator, config::LabelsConfig};
use faved_db::{entities::notice, repositories::NoticeRepository};
use sea_orm::Set;

/// Notice service for queueing and draining per-user messages.
#[derive(Clone)]
pub struct NoticeService {
    repo: NoticeRepository,
    labels: LabelsConfig,
    id_gen: IdGenerator,
}

impl NoticeService {
    /// Create a new notice service.
    #[must_use]
    pub const fn new(repo: NoticeRepository, labels: LabelsConfig) -> Self {
        Self {
            repo,
            labels,
            id_gen: IdGenerator::new(),
        }
    }

    /// The configured terminology, for composing user-facing messages.
    #[must_use]
    pub const fn labels(&self) -> &LabelsConfig {
        &self.labels
    }

    async fn add(
        &self,
        user_id: &str,
        kind: notice::NoticeKind,
        message: &str,
    ) -> AppResult<()> {
        if message.is_empty() {
            return Ok(());
        }

        let model = notice::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            kind: Set(kind),
            message: Set(message.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.repo.create(model).await?;
        Ok(())
    }

    /// Queue an error notice.
    pub async fn error(&self, user_id: &str, message: &str) -> AppResult<()> {
        self.add(user_id, notice::NoticeKind::Error, message).await
    }

    /// Queue a success notice.
    pub async fn success(&self, user_id: &str, message: &str) -> AppResult<()> {
        self.add(user_id, notice::NoticeKind::Success, message).await
    }

    /// Queue an info notice.
    pub async fn info(&self, user_id: &str, message: &str) -> AppResult<()> {
        self.add(user_id, notice::NoticeKind::Info, message).await
    }

    /// Return the user's queued notices and clear them (read-once).
    pub async fn drain(&self, user_id: &str) -> AppResult<Vec<notice::Model>> {
        let notices = self.repo.find_by_user(user_id).await?;

        if !notices.is_empty() {
            self.repo.delete_by_user(user_id).await?;
        }

        Ok(notices)
    }
}

/// Uppercase the first character of a label.
#[must_use]
pub fn ucfirst(label: &str) -> String {
    let mut chars = label.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
