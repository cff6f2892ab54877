//! Tamper-evident audit log.
//!
//! Stored submissions and register mutations append an [`AuditEvent`].
//! Each row carries the hash of its predecessor and a SHA-256 digest over
//! that hash plus every field of the event, so editing, deleting or
//! reordering rows is detectable by [`verify_chain`].
//!
//! Appends are serialized with a transaction-scoped advisory lock: two
//! concurrent writers never observe the same predecessor.

use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

/// Predecessor hash of the first event.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Advisory lock key held while appending ("gapwaudt").
const APPEND_LOCK_KEY: i64 = 0x6761_7077_6175_6474;

#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: String,
    /// Assessor or API caller, when known.
    pub actor: Option<String>,
    pub resource_type: String,
    pub resource_id: Uuid,
    pub action: String,
    pub metadata: serde_json::Value,
}

/// Digest of one link in the chain.
///
/// The fields are encoded as a JSON array so no two distinct events share
/// an input string. Object keys in `metadata` are sorted first, since
/// JSONB does not keep insertion order.
pub fn chain_hash(previous_hash: &str, event: &AuditEvent) -> String {
    let encoded = serde_json::json!([
        previous_hash,
        event.event_type,
        event.actor,
        event.resource_type,
        event.resource_id,
        event.action,
        sorted_keys(&event.metadata),
    ])
    .to_string();
    format!("{:x}", Sha256::digest(encoded.as_bytes()))
}

fn sorted_keys(value: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sorted_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted_keys).collect()),
        other => other.clone(),
    }
}

/// Append `event` after the current head of the chain.
pub async fn append(pool: &PgPool, event: AuditEvent) -> Result<Uuid, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(APPEND_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    let head: Option<String> =
        sqlx::query_scalar("SELECT event_hash FROM audit_events ORDER BY seq DESC LIMIT 1")
            .fetch_optional(&mut *tx)
            .await?;
    let previous_hash = head.unwrap_or_else(|| GENESIS_HASH.to_string());
    let event_hash = chain_hash(&previous_hash, &event);

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO audit_events (id, event_type, actor, resource_type, resource_id,
         action, metadata, previous_hash, event_hash, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())",
    )
    .bind(id)
    .bind(&event.event_type)
    .bind(&event.actor)
    .bind(&event.resource_type)
    .bind(event.resource_id)
    .bind(&event.action)
    .bind(&event.metadata)
    .bind(&previous_hash)
    .bind(&event_hash)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

/// Best-effort append. The caller's primary write already succeeded, so
/// a failure here is logged rather than surfaced.
pub async fn record(pool: Option<&PgPool>, event: AuditEvent) {
    let Some(pool) = pool else {
        return;
    };
    let event_type = event.event_type.clone();
    if let Err(e) = append(pool, event).await {
        tracing::warn!(error = %e, event_type, "failed to append audit event");
    }
}

/// Walk the oldest `limit` events and check every link.
pub async fn verify_chain(pool: &PgPool, limit: i64) -> Result<ChainReport, sqlx::Error> {
    let rows = sqlx::query_as::<_, StoredEvent>(
        "SELECT id, event_type, actor, resource_type, resource_id,
         action, metadata, previous_hash, event_hash
         FROM audit_events ORDER BY seq ASC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(inspect(&rows))
}

/// Outcome of [`verify_chain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChainReport {
    pub total_events: usize,
    /// Rows whose `previous_hash` is not the hash of the row before them.
    pub broken_links: usize,
    /// Rows whose stored hash no longer matches their content.
    pub altered_events: usize,
    pub chain_valid: bool,
    /// First offending row, if any.
    pub first_fault: Option<Uuid>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct StoredEvent {
    id: Uuid,
    event_type: String,
    actor: Option<String>,
    resource_type: String,
    resource_id: Uuid,
    action: String,
    metadata: serde_json::Value,
    previous_hash: Option<String>,
    event_hash: String,
}

impl StoredEvent {
    fn recomputed_hash(&self) -> String {
        let event = AuditEvent {
            event_type: self.event_type.clone(),
            actor: self.actor.clone(),
            resource_type: self.resource_type.clone(),
            resource_id: self.resource_id,
            action: self.action.clone(),
            metadata: self.metadata.clone(),
        };
        chain_hash(self.previous_hash.as_deref().unwrap_or(GENESIS_HASH), &event)
    }
}

fn inspect(rows: &[StoredEvent]) -> ChainReport {
    let mut broken_links = 0;
    let mut altered_events = 0;
    let mut first_fault = None;
    let mut expected_prev = GENESIS_HASH;

    for row in rows {
        let linked = row.previous_hash.as_deref() == Some(expected_prev);
        let intact = row.recomputed_hash() == row.event_hash;
        if !linked {
            broken_links += 1;
        }
        if !intact {
            altered_events += 1;
        }
        if (!linked || !intact) && first_fault.is_none() {
            first_fault = Some(row.id);
        }
        expected_prev = &row.event_hash;
    }

    ChainReport {
        total_events: rows.len(),
        broken_links,
        altered_events,
        chain_valid: first_fault.is_none(),
        first_fault,
    }
}
