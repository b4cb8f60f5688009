//! # SQLite PromptRepository
//!
//! Maps the `prompts` table to the domain model. Ids are stored as 16-byte
//! blobs and timestamps as RFC 3339 text, which keeps their +08:00 offset.

use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use domains::{NewPrompt, Prompt, PromptChanges, PromptRepository};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

pub struct SqlitePromptRepository {
    pool: SqlitePool,
}

impl SqlitePromptRepository {
    /// Opens (creating if needed) the database at `url` and applies migrations.
    ///
    /// In-memory databases live and die with their connection, so they get a
    /// single connection that the pool never recycles.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid sqlite url '{url}'"))?
            .create_if_missing(true);

        let pool_options = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("connecting to sqlite")?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, applying migrations first.
    pub async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("running prompt migrations")?;
        tracing::debug!("prompt schema ready");
        Ok(Self { pool })
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn row_to_prompt(row: &SqliteRow) -> anyhow::Result<Prompt> {
    Ok(Prompt {
        id: row.try_get::<Uuid, _>("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        category: row.try_get("category")?,
        creator_ip: row.try_get("creator_ip")?,
        created_at: row.try_get::<DateTime<FixedOffset>, _>("created_at")?,
    })
}

#[async_trait]
impl PromptRepository for SqlitePromptRepository {
    async fn list_prompts(&self) -> anyhow::Result<Vec<Prompt>> {
        let rows = sqlx::query(
            "SELECT id, title, content, category, creator_ip, created_at FROM prompts ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_prompt).collect()
    }

    async fn get_prompt(&self, id: Uuid) -> anyhow::Result<Option<Prompt>> {
        let row = sqlx::query(
            "SELECT id, title, content, category, creator_ip, created_at FROM prompts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_prompt).transpose()
    }

    async fn create_prompt(&self, prompt: NewPrompt) -> anyhow::Result<Uuid> {
        let id = Uuid::now_v7();
        sqlx::query("INSERT INTO prompts (id, title, content, category, creator_ip, created_at) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(id)
            .bind(prompt.title)
            .bind(prompt.content)
            .bind(prompt.category)
            .bind(prompt.creator_ip)
            .bind(prompt.created_at)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    /// Never writes `creator_ip` or `created_at`.
    async fn update_prompt(&self, id: Uuid, changes: PromptChanges) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE prompts SET title = ?, content = ?, category = ? WHERE id = ?")
            .bind(changes.title)
            .bind(changes.content)
            .bind(changes.category)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_prompt(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_prompts(&self) -> anyhow::Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prompts")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count)?)
    }
}
