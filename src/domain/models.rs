use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonErr {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// One audit exchange as the service returns it. `total_violations` is the
/// server-reported count and is not reconciled against the list length.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuditResponse {
    pub policy_name: String,
    pub total_violations: u64,
    #[serde(default)]
    pub violations: Vec<Violation>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Violation {
    pub event_type: String,
    pub val: f64,
    pub reason: String,
    pub subject_id: String,
    pub source: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StagedFile {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub content_type: String,
    pub sha256: String,
    pub staged_at: String,
}

/// Counters carried across sessions. Serialized camelCase to keep the
/// record shape of earlier deployments of the stats store.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub audit_count: u64,
    pub total_violations: u64,
    pub last_scan_time: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SessionState {
    pub staged: Option<StagedFile>,
    pub last_audit: Option<CompletedAudit>,
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CompletedAudit {
    pub response: AuditResponse,
    pub elapsed_secs: f64,
    pub completed_at: String,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub online: bool,
    pub status: Option<String>,
    pub engine: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}
