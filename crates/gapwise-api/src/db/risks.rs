//! Risk register persistence.
//!
//! Score and level are stored for querying but always recomputed by
//! [`gapwise_risk::RiskEntry`] before a write.

use chrono::{DateTime, Utc};
use gapwise_risk::{RiskEntry, RiskLevel, RiskStatus};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn insert(pool: &PgPool, entry: &RiskEntry) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO risks (id, title, description, category, owner, impact, likelihood,
         score, level, status, mitigation, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
    .bind(entry.id)
    .bind(&entry.title)
    .bind(&entry.description)
    .bind(&entry.category)
    .bind(&entry.owner)
    .bind(i16::from(entry.impact))
    .bind(i16::from(entry.likelihood))
    .bind(i16::from(entry.score))
    .bind(entry.level.as_str())
    .bind(entry.status.as_str())
    .bind(&entry.mitigation)
    .bind(entry.created_at)
    .bind(entry.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite every mutable column. Returns `false` if no row matched.
pub async fn update(pool: &PgPool, entry: &RiskEntry) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE risks SET title = $1, description = $2, category = $3, owner = $4,
         impact = $5, likelihood = $6, score = $7, level = $8, status = $9,
         mitigation = $10, updated_at = $11
         WHERE id = $12",
    )
    .bind(&entry.title)
    .bind(&entry.description)
    .bind(&entry.category)
    .bind(&entry.owner)
    .bind(i16::from(entry.impact))
    .bind(i16::from(entry.likelihood))
    .bind(i16::from(entry.score))
    .bind(entry.level.as_str())
    .bind(entry.status.as_str())
    .bind(&entry.mitigation)
    .bind(entry.updated_at)
    .bind(entry.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM risks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Load the whole register on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<RiskEntry>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RiskRow>(
        "SELECT id, title, description, category, owner, impact, likelihood,
         score, level, status, mitigation, created_at, updated_at
         FROM risks ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(RiskRow::into_entry).collect()
}

#[derive(sqlx::FromRow)]
struct RiskRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    category: Option<String>,
    owner: Option<String>,
    impact: i16,
    likelihood: i16,
    score: i16,
    level: String,
    status: String,
    mitigation: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RiskRow {
    fn into_entry(self) -> Result<RiskEntry, sqlx::Error> {
        let id = self.id;
        let corrupt = |what: &str, detail: String| {
            tracing::error!(%id, detail = %detail, "corrupt {what} in risks table");
            sqlx::Error::Protocol(format!("risk {id}: invalid {what}: {detail}"))
        };
        let narrow = |field: &str, value: i16| {
            u8::try_from(value).map_err(|e| corrupt(field, format!("{value}: {e}")))
        };

        Ok(RiskEntry {
            id,
            impact: narrow("impact", self.impact)?,
            likelihood: narrow("likelihood", self.likelihood)?,
            score: narrow("score", self.score)?,
            level: self
                .level
                .parse::<RiskLevel>()
                .map_err(|e| corrupt("level", e.to_string()))?,
            status: self
                .status
                .parse::<RiskStatus>()
                .map_err(|e| corrupt("status", e.to_string()))?,
            title: self.title,
            description: self.description,
            category: self.category,
            owner: self.owner,
            mitigation: self.mitigation,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
