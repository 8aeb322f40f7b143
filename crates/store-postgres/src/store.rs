// Durable Adapter (spec section 4.4, section 4.5)
//
// Atomicity for `claim` comes from `FOR UPDATE SKIP LOCKED`: concurrent claimers each lock a
// disjoint candidate row (or none, if the queue is momentarily drained), so no coordination
// beyond the database is needed. Grounded on the claim-query shape used by Postgres-backed job
// queues elsewhere in the ecosystem (a CTE that selects-and-locks one row, then an
// `UPDATE ... FROM ... RETURNING` that both claims and returns it in a single round trip).
//
// Backoff for `fail` is computed inside the `UPDATE` statement itself, against the
// post-increment `attempts` column already written by `claim` — not recomputed in Rust — so the
// decision and the write happen atomically against whatever `attempts` the database currently
// holds.

use crate::connection::PostgresStoreConfig;
use crate::error_mapping::map_sqlx_error;
use crate::migration::run_migrations;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use queue_core::domain::{JobEnvelope, JobStatus, Payload};
use queue_core::error::{ConfigurationError, StorageError};
use queue_core::port::{ClaimFilter, JobStore};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

pub struct PostgresJobStore {
    pool: PgPool,
    config: PostgresStoreConfig,
    qualified_table: String,
}

impl PostgresJobStore {
    pub fn new(pool: PgPool, config: PostgresStoreConfig) -> Self {
        let qualified_table = format!("{}.{}", config.schema, config.table);
        Self {
            pool,
            config,
            qualified_table,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    trace_id: String,
    job_type: String,
    payload: serde_json::Value,
    status: String,
    priority: i64,
    attempts: i32,
    max_attempts: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    scheduled_for: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    failed_at: Option<DateTime<Utc>>,
    error: Option<String>,
    worker_id: Option<String>,
}

impl JobRow {
    fn into_envelope(self) -> Result<JobEnvelope, StorageError> {
        let status = parse_status(&self.status)?;
        let payload: Payload = serde_json::from_value(self.payload)
            .map_err(|e| StorageError::new(format!("malformed payload in row {}: {e}", self.id)))?;
        Ok(JobEnvelope {
            job_id: self.id,
            trace_id: self.trace_id,
            job_type: self.job_type,
            payload,
            status,
            priority: self.priority,
            attempts: self.attempts,
            max_attempts: self.max_attempts,
            created_at: self.created_at,
            updated_at: self.updated_at,
            scheduled_for: self.scheduled_for,
            started_at: self.started_at,
            completed_at: self.completed_at,
            failed_at: self.failed_at,
            error: self.error,
            worker_id: self.worker_id,
        })
    }
}

fn parse_status(raw: &str) -> Result<JobStatus, StorageError> {
    match raw {
        "pending" => Ok(JobStatus::Pending),
        "processing" => Ok(JobStatus::Processing),
        "completed" => Ok(JobStatus::Completed),
        "failed" => Ok(JobStatus::Failed),
        other => Err(StorageError::new(format!("unknown status in row: {other:?}"))),
    }
}

fn payload_to_json(payload: &Payload) -> Result<serde_json::Value, StorageError> {
    serde_json::to_value(payload).map_err(|e| StorageError::new(format!("payload not serializable: {e}")))
}

#[async_trait]
impl JobStore for PostgresJobStore {
    async fn initialize(&self) -> Result<(), ConfigurationError> {
        run_migrations(&self.pool, &self.config).await
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.pool.close().await;
        Ok(())
    }

    async fn insert(&self, envelope: JobEnvelope) -> Result<JobEnvelope, StorageError> {
        let payload = payload_to_json(&envelope.payload)?;
        let sql = format!(
            "INSERT INTO {table} \
                (id, trace_id, job_type, payload, status, priority, attempts, max_attempts, \
                 created_at, updated_at, scheduled_for, started_at, completed_at, failed_at, error, worker_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING *",
            table = self.qualified_table
        );

        let row: JobRow = sqlx::query_as(&sql)
            .bind(envelope.job_id)
            .bind(&envelope.trace_id)
            .bind(&envelope.job_type)
            .bind(payload)
            .bind(envelope.status.to_string())
            .bind(envelope.priority)
            .bind(envelope.attempts)
            .bind(envelope.max_attempts)
            .bind(envelope.created_at)
            .bind(envelope.updated_at)
            .bind(envelope.scheduled_for)
            .bind(envelope.started_at)
            .bind(envelope.completed_at)
            .bind(envelope.failed_at)
            .bind(&envelope.error)
            .bind(&envelope.worker_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.into_envelope()
    }

    async fn claim(
        &self,
        worker_name: &str,
        job_types: &ClaimFilter,
    ) -> Result<Option<JobEnvelope>, StorageError> {
        let types: Option<Vec<String>> = if job_types.as_slice().is_empty() {
            None
        } else {
            Some(job_types.as_slice().to_vec())
        };

        let sql = format!(
            "WITH candidate AS ( \
                SELECT id FROM {table} \
                WHERE status = 'pending' \
                  AND scheduled_for <= now() \
                  AND ($2::text[] IS NULL OR job_type = ANY($2::text[])) \
                ORDER BY priority DESC, scheduled_for ASC \
                FOR UPDATE SKIP LOCKED \
                LIMIT 1 \
             ) \
             UPDATE {table} t \
             SET status = 'processing', \
                 started_at = now(), \
                 updated_at = now(), \
                 worker_id = $1, \
                 attempts = attempts + 1 \
             FROM candidate \
             WHERE t.id = candidate.id \
             RETURNING t.*",
            table = self.qualified_table
        );

        let row: Option<JobRow> = sqlx::query_as(&sql)
            .bind(worker_name)
            .bind(types)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(JobRow::into_envelope).transpose()
    }

    async fn complete(
        &self,
        job_id: Uuid,
        _result: Option<Payload>,
    ) -> Result<Option<JobEnvelope>, StorageError> {
        // The canonical schema (spec section 3.1) has no result column; the caller's `result`
        // input is echoed back in the `ResultEnvelope` by the application layer, not persisted
        // here. See DESIGN.md for the in-memory adapter's divergent side-table approach.
        let sql = format!(
            "UPDATE {table} \
             SET status = 'completed', completed_at = now(), updated_at = now() \
             WHERE id = $1 AND status = 'processing' \
             RETURNING *",
            table = self.qualified_table
        );

        let row: Option<JobRow> = sqlx::query_as(&sql)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(JobRow::into_envelope).transpose()
    }

    async fn fail(&self, job_id: Uuid, error: &str) -> Result<Option<JobEnvelope>, StorageError> {
        let sql = format!(
            "UPDATE {table} \
             SET error = $2, \
                 updated_at = now(), \
                 status = CASE WHEN attempts >= max_attempts THEN 'failed' ELSE 'pending' END, \
                 failed_at = CASE WHEN attempts >= max_attempts THEN now() ELSE failed_at END, \
                 worker_id = CASE WHEN attempts >= max_attempts THEN worker_id ELSE NULL END, \
                 scheduled_for = CASE WHEN attempts >= max_attempts \
                                       THEN scheduled_for \
                                       ELSE now() + (attempts * interval '30 seconds') END \
             WHERE id = $1 AND status = 'processing' \
             RETURNING *",
            table = self.qualified_table
        );

        let row: Option<JobRow> = sqlx::query_as(&sql)
            .bind(job_id)
            .bind(error)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(JobRow::into_envelope).transpose()
    }

    async fn find_by_id(&self, job_id: Uuid) -> Result<Option<JobEnvelope>, StorageError> {
        let sql = format!("SELECT * FROM {table} WHERE id = $1", table = self.qualified_table);

        let row: Option<JobRow> = sqlx::query_as(&sql)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(JobRow::into_envelope).transpose()
    }

    async fn count_by_status(&self, status: JobStatus) -> Result<i64, StorageError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {table} WHERE status = $1",
            table = self.qualified_table
        );

        let (count,): (i64,) = sqlx::query_as(&sql)
            .bind(status.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }
}
