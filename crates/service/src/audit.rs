//! Append-only CSV audit log with a tamper-evidence signature column.
//!
//! Rows are only ever appended; the signature is a SHA-256 over the other
//! columns joined with `|`, which detects edits but is not cryptographic
//! authentication. Logging is best-effort: `log_event` swallows every
//! failure so the primary operation never fails on audit problems.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use crate::errors::ServiceError;

pub const CSV_HEADERS: [&str; 12] = [
    "event_id",
    "timestamp",
    "user_id",
    "action",
    "entity_type",
    "entity_id",
    "source_ip",
    "user_agent",
    "status",
    "details",
    "masked_data",
    "signature",
];

/// One audit event; optional fields serialize as empty columns.
#[derive(Clone, Debug, Default)]
pub struct AuditEvent {
    pub action: String,
    pub user_id: Option<String>,
    pub status: String,
    pub details: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    pub masked_data: bool,
}

impl AuditEvent {
    pub fn new(action: &str, status: &str) -> Self {
        Self {
            action: action.to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }

    pub fn user(mut self, user_id: impl ToString) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn details(mut self, details: impl ToString) -> Self {
        self.details = Some(details.to_string());
        self
    }

    pub fn entity(mut self, entity_type: &str, entity_id: impl ToString) -> Self {
        self.entity_type = Some(entity_type.to_string());
        self.entity_id = Some(entity_id.to_string());
        self
    }

    pub fn request_meta(mut self, source_ip: Option<String>, user_agent: Option<String>) -> Self {
        self.source_ip = source_ip;
        self.user_agent = user_agent;
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked_data = true;
        self
    }
}

/// File-backed audit sink shared across handlers.
#[derive(Clone)]
pub struct AuditLog {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

fn compute_signature(row: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(row.join("|").as_bytes());
    format!("SHA256:{}", hex::encode(hasher.finalize()))
}

fn append_row(path: &Path, row: Vec<String>) -> Result<(), ServiceError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| ServiceError::Db(e.to_string()))?;
        }
    }
    let needs_header = !path.exists();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if needs_header {
        writer
            .write_record(CSV_HEADERS)
            .map_err(|e| ServiceError::Db(e.to_string()))?;
    }
    writer
        .write_record(&row)
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    writer.flush().map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

impl AuditLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), write_lock: Arc::new(Mutex::new(())) }
    }

    /// Append one event. Failures are traced and discarded.
    pub async fn log_event(&self, event: AuditEvent) {
        if let Err(e) = self.record(event).await {
            warn!(error = %e, "audit log append failed");
        }
    }

    /// Append one event, returning its id. Used by `log_event` and tests.
    pub async fn record(&self, event: AuditEvent) -> Result<String, ServiceError> {
        let event_id = Uuid::new_v4().to_string();
        let timestamp = Utc::now().to_rfc3339();

        let mut row = vec![
            event_id.clone(),
            timestamp,
            event.user_id.unwrap_or_default(),
            event.action,
            event.entity_type.unwrap_or_default(),
            event.entity_id.unwrap_or_default(),
            event.source_ip.unwrap_or_default(),
            event.user_agent.unwrap_or_default(),
            event.status,
            event.details.unwrap_or_default(),
            if event.masked_data { "true".into() } else { "false".into() },
        ];
        row.push(compute_signature(&row));

        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || append_row(&path, row))
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))??;
        Ok(event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("audit_{}_{}.csv", tag, Uuid::new_v4()))
    }

    #[tokio::test]
    async fn appends_header_then_rows() {
        let path = tmp_path("rows");
        let log = AuditLog::new(&path);

        log.record(AuditEvent::new("login", "SUCCESS").user("u-1")).await.unwrap();
        log.record(
            AuditEvent::new("login_attempt", "FAILED")
                .user("u-2")
                .details("incorrect password, attempt 1")
                .masked(),
        )
        .await
        .unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), CSV_HEADERS.len());
        assert_eq!(&headers[0], "event_id");
        assert_eq!(&headers[11], "signature");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][3], "login_attempt");
        assert_eq!(&rows[1][10], "true");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn signature_matches_row_contents() {
        let path = tmp_path("sig");
        let log = AuditLog::new(&path);
        log.record(AuditEvent::new("register", "SUCCESS").user("u-9")).await.unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        let fields: Vec<String> = row.iter().take(11).map(str::to_string).collect();
        assert_eq!(&row[11], &compute_signature(&fields));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn log_event_swallows_failures() {
        // A directory path cannot be opened for appending; must not panic.
        let log = AuditLog::new(std::env::temp_dir());
        log.log_event(AuditEvent::new("noop", "FAILED")).await;
    }
}
