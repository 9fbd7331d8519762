//! SQLite storage for job descriptions and the append-only results log.
//!
//! `JobStore` is built once at startup and shared through `AppState`. Every
//! write opens with a write statement, so SQLite takes the write lock first
//! and waits out the busy timeout instead of failing on a lock upgrade.
//! Returning early with `?` drops the `Transaction`, which rolls it back.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::result::{NewResult, ResultRecord, ResultRow, UnknownVerdict};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job '{0}' not found")]
    JobNotFound(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("stored result is corrupt: {0}")]
    CorruptRow(#[from] UnknownVerdict),
}

#[derive(Clone)]
pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a job description or replaces the text of an existing one.
    pub async fn upsert_job(&self, job_id: &str, jd_text: &str) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO job_descriptions (job_id, jd_text) VALUES ($1, $2)
            ON CONFLICT (job_id) DO UPDATE SET jd_text = excluded.jd_text
            "#,
        )
        .bind(job_id)
        .bind(jd_text)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        info!("Stored job description {job_id} ({} chars)", jd_text.len());
        Ok(())
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Option<String>, StoreError> {
        Ok(
            sqlx::query_scalar("SELECT jd_text FROM job_descriptions WHERE job_id = $1")
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Replaces the text of an existing job. Returns `false` if the job is unknown.
    pub async fn update_job(&self, job_id: &str, jd_text: &str) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query("UPDATE job_descriptions SET jd_text = $1 WHERE job_id = $2")
            .bind(jd_text)
            .bind(job_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;

        Ok(updated > 0)
    }

    /// Deletes a job and every result recorded against it.
    pub async fn delete_job(&self, job_id: &str) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let removed_results = sqlx::query("DELETE FROM results WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let removed_jobs = sqlx::query("DELETE FROM job_descriptions WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed_jobs == 0 {
            return Err(StoreError::JobNotFound(job_id.to_string()));
        }
        tx.commit().await?;

        info!("Deleted job {job_id} and {removed_results} associated results");
        Ok(removed_results)
    }

    pub async fn list_job_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(
            sqlx::query_scalar("SELECT job_id FROM job_descriptions ORDER BY job_id ASC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// Appends a result. The referenced job must exist at insertion time;
    /// the check and the insert are one statement.
    pub async fn insert_result(&self, new: NewResult) -> Result<ResultRecord, StoreError> {
        let timestamp = Utc::now();
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO results
                (student_id, job_id, score, verdict, missing_skills, feedback, timestamp)
            SELECT $1, $2, $3, $4, $5, $6, $7
            WHERE EXISTS (SELECT 1 FROM job_descriptions WHERE job_id = $2)
            RETURNING id
            "#,
        )
        .bind(&new.student_id)
        .bind(&new.job_id)
        .bind(i64::from(new.score))
        .bind(new.verdict.as_str())
        .bind(Json(&new.missing_skills))
        .bind(&new.feedback)
        .bind(timestamp)
        .fetch_optional(&self.pool)
        .await?;
        let Some(id) = id else {
            return Err(StoreError::JobNotFound(new.job_id));
        };

        debug!("Recorded result {id} for {} on {}", new.student_id, new.job_id);

        Ok(ResultRecord {
            id,
            student_id: new.student_id,
            job_id: new.job_id,
            score: new.score,
            verdict: new.verdict,
            missing_skills: new.missing_skills,
            feedback: new.feedback,
            timestamp,
        })
    }

    /// Filtered by job: best score first. Unfiltered: newest first.
    pub async fn list_results(&self, job_id: Option<&str>) -> Result<Vec<ResultRecord>, StoreError> {
        let rows: Vec<ResultRow> = match job_id {
            Some(job_id) => {
                sqlx::query_as(
                    "SELECT * FROM results WHERE job_id = $1 ORDER BY score DESC, id ASC",
                )
                .bind(job_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM results ORDER BY timestamp DESC, id DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter()
            .map(|row| ResultRecord::try_from(row).map_err(StoreError::from))
            .collect()
    }
}
