use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{Attachment, AttachmentCopy, NewAttachmentData};
use crate::store::{AttachmentStore, SqliteStore};

#[async_trait]
impl AttachmentStore for SqliteStore {
    async fn add_attachment(&self, data: NewAttachmentData) -> Result<Attachment, CoreError> {
        let task_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM tasks WHERE id = $1")
            .bind(data.task_id)
            .fetch_optional(self.pool())
            .await?;
        if task_exists.is_none() {
            return Err(CoreError::NotFound(data.task_id.to_string()));
        }

        let attachment = Attachment {
            id: Uuid::now_v7(),
            task_id: data.task_id,
            file_name: data.file_name,
            uploaded_by: data.uploaded_by,
            uploaded_at: Utc::now(),
        };
        sqlx::query(
            r#"INSERT INTO attachments (id, task_id, file_name, uploaded_by, uploaded_at)
            VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(attachment.id)
        .bind(attachment.task_id)
        .bind(&attachment.file_name)
        .bind(&attachment.uploaded_by)
        .bind(attachment.uploaded_at)
        .execute(self.pool())
        .await?;
        Ok(attachment)
    }

    async fn list_attachments(&self, task_id: Uuid) -> Result<Vec<Attachment>, CoreError> {
        let attachments =
            sqlx::query_as("SELECT * FROM attachments WHERE task_id = $1 ORDER BY uploaded_at")
                .bind(task_id)
                .fetch_all(self.pool())
                .await?;
        Ok(attachments)
    }

    async fn copy_attachments(
        &self,
        source_task_id: Uuid,
        target_task_id: Uuid,
    ) -> Result<AttachmentCopy, CoreError> {
        let originals: Vec<Attachment> =
            sqlx::query_as("SELECT * FROM attachments WHERE task_id = $1 ORDER BY uploaded_at")
                .bind(source_task_id)
                .fetch_all(self.pool())
                .await?;

        let mut tx = self.pool().begin().await?;
        let mut copied = Vec::with_capacity(originals.len());
        let now = Utc::now();
        for original in originals {
            let copy = Attachment {
                id: Uuid::now_v7(),
                task_id: target_task_id,
                file_name: original.file_name,
                uploaded_by: original.uploaded_by,
                uploaded_at: now,
            };
            sqlx::query(
                r#"INSERT INTO attachments (id, task_id, file_name, uploaded_by, uploaded_at)
                VALUES ($1, $2, $3, $4, $5)"#,
            )
            .bind(copy.id)
            .bind(copy.task_id)
            .bind(&copy.file_name)
            .bind(&copy.uploaded_by)
            .bind(copy.uploaded_at)
            .execute(&mut *tx)
            .await?;
            copied.push(copy);
        }
        tx.commit().await?;

        Ok(AttachmentCopy {
            copied_count: copied.len(),
            copied,
        })
    }
}
