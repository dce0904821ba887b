use crate::domain::models::{AuditResponse, HealthReport, StagedFile};
use reqwest::blocking::multipart;
use std::time::{Duration, Instant};

const HEALTH_PATHS: [&str; 2] = ["/", "/api/health"];
const HEALTH_TIMEOUT_MS: u64 = 5000;

#[derive(thiserror::Error, Debug)]
pub enum SubmissionError {
    #[error("audit service returned HTTP {0}")]
    HttpStatus(u16),
    #[error("audit service unreachable or returned a malformed response")]
    Transport,
}

pub struct ApiClient {
    base_url: String,
    timeout: Duration,
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Uploads the staged bytes as multipart field `file` and decodes the
    /// audit response. Also returns wall-clock seconds from submission
    /// start to response receipt; informational only, the deadline is
    /// enforced by the client timeout.
    pub fn submit(
        &self,
        staged: &StagedFile,
        bytes: Vec<u8>,
    ) -> Result<(AuditResponse, f64), SubmissionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                log::warn!("failed to build http client: {}", e);
                SubmissionError::Transport
            })?;

        let part = multipart::Part::bytes(bytes)
            .file_name(staged.name.clone())
            .mime_str(&staged.content_type)
            .map_err(|e| {
                log::warn!("unusable content type {:?}: {}", staged.content_type, e);
                SubmissionError::Transport
            })?;
        let form = multipart::Form::new().part("file", part);

        let started = Instant::now();
        let resp = client
            .post(endpoint(&self.base_url, "/audit"))
            .multipart(form)
            .send()
            .map_err(|e| {
                log::warn!(
                    "transport failure after {:.2}s talking to {}: {}",
                    started.elapsed().as_secs_f64(),
                    self.base_url,
                    e
                );
                SubmissionError::Transport
            })?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("audit endpoint returned HTTP {}", status.as_u16());
            return Err(SubmissionError::HttpStatus(status.as_u16()));
        }

        let report: AuditResponse = resp.json().map_err(|e| {
            log::warn!("malformed audit response body: {}", e);
            SubmissionError::Transport
        })?;
        let elapsed = started.elapsed().as_secs_f64();
        log::debug!(
            "audit of {} completed in {:.2}s ({} violations)",
            staged.name,
            elapsed,
            report.total_violations
        );
        Ok((report, elapsed))
    }

    /// Advisory connectivity probe. Tries `/` then `/api/health`; anything
    /// other than a parseable body with `status == "online"` is offline.
    pub fn health(&self) -> HealthReport {
        let client = match reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(HEALTH_TIMEOUT_MS))
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                log::warn!("failed to build http client: {}", e);
                return HealthReport {
                    online: false,
                    status: None,
                    engine: None,
                };
            }
        };

        for path in HEALTH_PATHS {
            let body: serde_json::Value = match client
                .get(endpoint(&self.base_url, path))
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.json())
            {
                Ok(v) => v,
                Err(e) => {
                    log::debug!("health probe {} failed: {}", path, e);
                    continue;
                }
            };
            let status = body
                .get("status")
                .and_then(|s| s.as_str())
                .map(str::to_string);
            let engine = body
                .get("engine")
                .and_then(|s| s.as_str())
                .map(str::to_string);
            return HealthReport {
                online: status.as_deref() == Some("online"),
                status,
                engine,
            };
        }
        HealthReport {
            online: false,
            status: None,
            engine: None,
        }
    }
}
