use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{Comment, NewTaskData, Task, UpdateTaskData};
use crate::store::{SqliteStore, TaskListRow, TaskStore};

#[async_trait]
impl TaskStore for SqliteStore {
    async fn create_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        if data.title.trim().is_empty() {
            return Err(CoreError::InvalidInput("task title cannot be empty".to_string()));
        }
        if data.due_at < data.start_at {
            return Err(CoreError::InvalidInput(
                "due date must not be before start date".to_string(),
            ));
        }

        let mut tx = self.pool().begin().await?;

        if let Some(parent_id) = data.parent_id {
            let parent_exists: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM tasks WHERE id = $1")
                    .bind(parent_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if parent_exists.is_none() {
                return Err(CoreError::NotFound(format!(
                    "Parent task {} not found",
                    parent_id
                )));
            }
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::now_v7(),
            parent_id: data.parent_id,
            title: data.title,
            description: data.description,
            status: data.status,
            start_at: data.start_at,
            due_at: data.due_at,
            completed_at: None,
            recurrence: data.recurrence,
            recurrence_interval: data.recurrence_interval,
            assignee: data.assignee,
            created_by: data.created_by,
            is_replication_product: data.is_replication_product,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO tasks
            (id, parent_id, title, description, status, start_at, due_at, completed_at,
             recurrence, recurrence_interval, assignee, created_by, is_replication_product,
             created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)"#,
        )
        .bind(task.id)
        .bind(task.parent_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(task.start_at)
        .bind(task.due_at)
        .bind(task.completed_at)
        .bind(&task.recurrence)
        .bind(task.recurrence_interval)
        .bind(&task.assignee)
        .bind(&task.created_by)
        .bind(task.is_replication_product)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&mut *tx)
        .await?;

        for tag in &data.tags {
            sqlx::query("INSERT OR IGNORE INTO task_tags (task_id, tag_name) VALUES ($1, $2)")
                .bind(task.id)
                .bind(tag)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(task)
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError> {
        let mut task: Task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        if let Some(title) = data.title {
            task.title = title;
        }
        if let Some(description) = data.description {
            task.description = description;
        }
        if let Some(status) = data.status {
            task.status = status;
        }
        if let Some(completed_at) = data.completed_at {
            task.completed_at = completed_at;
        }
        if let Some(start_at) = data.start_at {
            task.start_at = start_at;
        }
        if let Some(due_at) = data.due_at {
            task.due_at = due_at;
        }
        if let Some(assignee) = data.assignee {
            task.assignee = assignee;
        }
        if task.due_at < task.start_at {
            return Err(CoreError::InvalidInput(
                "due date must not be before start date".to_string(),
            ));
        }
        task.updated_at = Utc::now();

        sqlx::query(
            r#"UPDATE tasks
            SET title = $1, description = $2, status = $3, completed_at = $4,
                start_at = $5, due_at = $6, assignee = $7, updated_at = $8
            WHERE id = $9"#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(task.completed_at)
        .bind(task.start_at)
        .bind(task.due_at)
        .bind(&task.assignee)
        .bind(task.updated_at)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(task)
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn subtasks_of(&self, parent_id: Uuid) -> Result<Vec<Task>, CoreError> {
        let subtasks = sqlx::query_as("SELECT * FROM tasks WHERE parent_id = $1 ORDER BY created_at")
            .bind(parent_id)
            .fetch_all(self.pool())
            .await?;
        Ok(subtasks)
    }

    async fn list_tags(&self, task_id: Uuid) -> Result<Vec<String>, CoreError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT tag_name FROM task_tags WHERE task_id = $1 ORDER BY tag_name")
                .bind(task_id)
                .fetch_all(self.pool())
                .await?;
        Ok(rows.into_iter().map(|(tag,)| tag).collect())
    }

    async fn add_comment(
        &self,
        task_id: Uuid,
        author: &str,
        body: &str,
    ) -> Result<Comment, CoreError> {
        let comment = Comment {
            id: Uuid::now_v7(),
            task_id,
            author: author.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO comments (id, task_id, author, body, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(comment.id)
        .bind(comment.task_id)
        .bind(&comment.author)
        .bind(&comment.body)
        .bind(comment.created_at)
        .execute(self.pool())
        .await?;
        Ok(comment)
    }

    async fn list_comments(&self, task_id: Uuid) -> Result<Vec<Comment>, CoreError> {
        let comments =
            sqlx::query_as("SELECT * FROM comments WHERE task_id = $1 ORDER BY created_at")
                .bind(task_id)
                .fetch_all(self.pool())
                .await?;
        Ok(comments)
    }

    async fn find_tasks_by_id_prefix(&self, prefix: &str) -> Result<Vec<Task>, CoreError> {
        // Ids are stored as 16-byte blobs; match the human-facing hyphenated
        // form against hex(id).
        let mut pattern: String = prefix
            .chars()
            .filter(|c| *c != '-')
            .collect::<String>()
            .to_uppercase();
        pattern.push('%');

        let tasks: Vec<Task> = sqlx::query_as("SELECT * FROM tasks WHERE hex(id) LIKE ?")
            .bind(pattern)
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    async fn list_tasks_with_depth(&self) -> Result<Vec<TaskListRow>, CoreError> {
        let rows = sqlx::query_as(
            r#"WITH RECURSIVE task_tree
              (id, parent_id, title, status, start_at, due_at, recurrence, recurrence_interval,
               assignee, is_replication_product, depth, path) AS (
                SELECT
                    t.id, t.parent_id, t.title, t.status, t.start_at, t.due_at, t.recurrence,
                    t.recurrence_interval, t.assignee, t.is_replication_product,
                    0 AS depth,
                    CAST(t.created_at AS TEXT) AS path
                FROM tasks t
                WHERE t.parent_id IS NULL
                UNION ALL
                SELECT
                    t.id, t.parent_id, t.title, t.status, t.start_at, t.due_at, t.recurrence,
                    t.recurrence_interval, t.assignee, t.is_replication_product,
                    tt.depth + 1,
                    tt.path || ' -> ' || CAST(t.created_at AS TEXT)
                FROM tasks t
                JOIN task_tree tt ON t.parent_id = tt.id
            )
            SELECT
                tt.id, tt.parent_id, tt.title, tt.status, tt.start_at, tt.due_at, tt.recurrence,
                tt.recurrence_interval, tt.assignee, tt.is_replication_product, tt.depth, tt.path,
                GROUP_CONCAT(g.tag_name) AS tags
            FROM task_tree tt
            LEFT JOIN task_tags g ON tt.id = g.task_id
            GROUP BY tt.id, tt.parent_id, tt.title, tt.status, tt.start_at, tt.due_at,
                     tt.recurrence, tt.recurrence_interval, tt.assignee,
                     tt.is_replication_product, tt.depth, tt.path
            ORDER BY tt.path"#,
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
