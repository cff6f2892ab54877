//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! - **Catalog**: the control catalog loaded at startup. Immutable.
//! - **Sessions**: in-progress and completed assessment walks. In-memory
//!   only; abandoning a session is the cancellation model. Sessions idle
//!   longer than the configured TTL are evicted by a periodic sweep, and
//!   the store is capped at a maximum session count.
//! - **Submissions**: persisted assessment results.
//! - **Risks**: the risk register.
//!
//! Submissions and risks are written through to PostgreSQL when a pool is
//! configured and hydrated from it on startup.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use gapwise_catalog::ControlCatalog;
use gapwise_core::{AssessmentId, AssessorId, ProjectId};
use gapwise_report::AssessmentResult;
use gapwise_risk::RiskEntry;
use gapwise_state::AssessmentWalker;
use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (`parking_lot::RwLock`) and never hold
/// the lock across an `.await`.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// All records, in no particular order.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Atomically read-validate-update a record.
    ///
    /// The closure runs under a single write lock. Returns `None` if the
    /// record does not exist, otherwise the closure's result.
    pub fn try_update<R, E>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    /// Keep only records for which `keep` returns `true`. Returns the
    /// number removed.
    pub fn retain(&self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let mut data = self.data.write();
        let before = data.len();
        data.retain(|_, v| keep(v));
        before - data.len()
    }

    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Records ------------------------------------------------------------------

/// One assessment walk owned by the service.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    pub id: AssessmentId,
    pub assessor_id: AssessorId,
    pub project_id: ProjectId,
    pub walker: AssessmentWalker,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored assessment result.
///
/// Duplicate submissions of the same result produce distinct records.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionRecord {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub assessor_id: AssessorId,
    #[schema(value_type = String)]
    pub project_id: ProjectId,
    #[schema(value_type = Object)]
    pub result: AssessmentResult,
    /// SHA-256 hex digest of the serialized result.
    pub result_digest: String,
    pub submitted_at: DateTime<Utc>,
}

// -- Configuration ------------------------------------------------------------

pub const DEFAULT_PORT: u16 = 8080;
/// Sessions untouched for this long are evicted (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;
/// How often the background sweep looks for idle sessions.
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application configuration.
///
/// Custom `Debug` redacts the `auth_token`.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Static bearer token. If `None`, authentication is disabled.
    pub auth_token: Option<Zeroizing<String>>,
    /// Custom catalog file. If `None`, the embedded ECC catalog is used.
    pub catalog_path: Option<PathBuf>,
    /// Allowed CORS origin (`*` for any). If `None`, no CORS layer.
    pub cors_allow_origin: Option<String>,
    /// Idle time after which a session is evicted.
    pub session_ttl: Duration,
    /// New sessions are refused once this many are live.
    pub max_sessions: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("catalog_path", &self.catalog_path)
            .field("cors_allow_origin", &self.cors_allow_origin)
            .field("session_ttl", &self.session_ttl)
            .field("max_sessions", &self.max_sessions)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            auth_token: None,
            catalog_path: None,
            cors_allow_origin: None,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `AUTH_TOKEN`, `GAPWISE_CATALOG`, `CORS_ALLOW_ORIGIN`,
    /// `SESSION_TTL_SECS` and `MAX_SESSIONS`. Empty or unparseable values
    /// count as unset.
    pub fn from_env() -> Self {
        let non_empty = |var: &str| std::env::var(var).ok().filter(|v| !v.trim().is_empty());
        Self {
            port: non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            auth_token: non_empty("AUTH_TOKEN").map(Zeroizing::new),
            catalog_path: non_empty("GAPWISE_CATALOG").map(PathBuf::from),
            cors_allow_origin: non_empty("CORS_ALLOW_ORIGIN"),
            session_ttl: Duration::from_secs(
                non_empty("SESSION_TTL_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SESSION_TTL_SECS),
            ),
            max_sessions: non_empty("MAX_SESSIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_SESSIONS),
        }
    }
}

// -- AppState -----------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ControlCatalog>,
    pub sessions: Store<AssessmentSession>,
    pub submissions: Store<SubmissionRecord>,
    pub risks: Store<RiskEntry>,
    /// When `Some`, submissions, risks and audit events are persisted.
    pub db_pool: Option<PgPool>,
    /// Prometheus exposition handle. `/metrics` answers 503 without it.
    pub metrics: Option<PrometheusHandle>,
    pub config: AppConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("framework", &self.catalog.framework())
            .field("sessions", &self.sessions.len())
            .field("submissions", &self.submissions.len())
            .field("risks", &self.risks.len())
            .field("db", &self.db_pool.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl AppState {
    /// In-memory state with default configuration.
    pub fn new(catalog: Arc<ControlCatalog>) -> Self {
        Self::with_config(AppConfig::default(), catalog, None)
    }

    pub fn with_config(
        config: AppConfig,
        catalog: Arc<ControlCatalog>,
        db_pool: Option<PgPool>,
    ) -> Self {
        Self {
            catalog,
            sessions: Store::new(),
            submissions: Store::new(),
            risks: Store::new(),
            db_pool,
            metrics: None,
            config,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Drop sessions whose last transition is older than the session TTL.
    /// Returns the number evicted.
    pub fn evict_idle_sessions(&self, now: DateTime<Utc>) -> usize {
        let cutoff = chrono::Duration::from_std(self.config.session_ttl)
            .ok()
            .and_then(|ttl| now.checked_sub_signed(ttl));
        let Some(cutoff) = cutoff else {
            return 0;
        };
        let evicted = self.sessions.retain(|s| s.updated_at > cutoff);
        if evicted > 0 {
            tracing::info!(
                evicted,
                remaining = self.sessions.len(),
                "evicted idle assessment sessions"
            );
        }
        evicted
    }

    /// Run [`Self::evict_idle_sessions`] every `every` until the runtime
    /// shuts down.
    pub fn spawn_session_sweeper(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                state.evict_idle_sessions(Utc::now());
            }
        })
    }

    /// Load persisted submissions and risks into the in-memory stores.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let submissions = crate::db::submissions::load_all(pool)
            .await
            .map_err(|e| format!("failed to load submissions: {e}"))?;
        let submission_count = submissions.len();
        for record in submissions {
            self.submissions.insert(record.id, record);
        }

        let risks = crate::db::risks::load_all(pool)
            .await
            .map_err(|e| format!("failed to load risks: {e}"))?;
        let risk_count = risks.len();
        for entry in risks {
            self.risks.insert(entry.id, entry);
        }

        tracing::info!(
            submissions = submission_count,
            risks = risk_count,
            "hydrated in-memory stores from database"
        );
        Ok(())
    }
}
