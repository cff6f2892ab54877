//! Submission persistence.
//!
//! Each `POST /v1/results` inserts one row. Rows are never updated, so a
//! duplicate submission is a second row with its own id.

use chrono::{DateTime, Utc};
use gapwise_core::{AssessorId, ProjectId};
use gapwise_report::AssessmentResult;
use sqlx::PgPool;
use uuid::Uuid;

use super::json_error;
use crate::state::SubmissionRecord;

pub async fn insert(pool: &PgPool, record: &SubmissionRecord) -> Result<(), sqlx::Error> {
    let result = serde_json::to_value(&record.result)
        .map_err(|e| json_error("failed to serialize assessment result", e))?;

    sqlx::query(
        "INSERT INTO submissions (id, assessor_id, project_id, result, result_digest, submitted_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(record.id)
    .bind(record.assessor_id.as_str())
    .bind(record.project_id.as_str())
    .bind(&result)
    .bind(&record.result_digest)
    .bind(record.submitted_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<SubmissionRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, SubmissionRow>(
        "SELECT id, assessor_id, project_id, result, result_digest, submitted_at
         FROM submissions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(SubmissionRow::into_record).transpose()
}

/// Load all submissions on startup, oldest first.
pub async fn load_all(pool: &PgPool) -> Result<Vec<SubmissionRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SubmissionRow>(
        "SELECT id, assessor_id, project_id, result, result_digest, submitted_at
         FROM submissions ORDER BY submitted_at",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(SubmissionRow::into_record).collect()
}

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: Uuid,
    assessor_id: String,
    project_id: String,
    result: serde_json::Value,
    result_digest: String,
    submitted_at: DateTime<Utc>,
}

impl SubmissionRow {
    /// Rows that no longer decode are an error, never a default.
    fn into_record(self) -> Result<SubmissionRecord, sqlx::Error> {
        let result: AssessmentResult = serde_json::from_value(self.result).map_err(|e| {
            tracing::error!(id = %self.id, error = %e, "stored assessment result does not decode");
            json_error("failed to decode stored assessment result", e)
        })?;
        let assessor_id = AssessorId::new(self.assessor_id)
            .map_err(|e| sqlx::Error::Protocol(format!("submission {}: {e}", self.id)))?;
        let project_id = ProjectId::new(self.project_id)
            .map_err(|e| sqlx::Error::Protocol(format!("submission {}: {e}", self.id)))?;

        Ok(SubmissionRecord {
            id: self.id,
            assessor_id,
            project_id,
            result,
            result_digest: self.result_digest,
            submitted_at: self.submitted_at,
        })
    }
}
