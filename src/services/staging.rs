use crate::domain::models::StagedFile;
use sha2::{Digest, Sha256};
use std::path::Path;

pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const ACCEPTED_MIME_TYPES: [&str; 2] = ["application/pdf", "text/plain"];
const ACCEPTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("unsupported file type: expected a PDF or TXT document")]
    UnsupportedType,
    #[error("file too large: {0} bytes exceeds the 10 MB limit")]
    TooLarge(u64),
}

fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Single validation entry point for every path a candidate can arrive
/// through. Type check is permissive: either the declared MIME type or the
/// extension has to match, since the two are inconsistently reported.
pub fn validate_candidate(
    name: &str,
    size: u64,
    declared_type: Option<&str>,
) -> Result<(), ValidationError> {
    let mime_ok = declared_type
        .map(|t| ACCEPTED_MIME_TYPES.contains(&t))
        .unwrap_or(false);
    let ext_ok = extension_of(name)
        .map(|e| ACCEPTED_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or(false);
    if !mime_ok && !ext_ok {
        return Err(ValidationError::UnsupportedType);
    }
    if size > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge(size));
    }
    Ok(())
}

/// The type the upload will declare: the caller-provided MIME type when it
/// is one we accept, otherwise the type implied by the extension.
fn effective_content_type(name: &str, declared_type: Option<&str>) -> String {
    if let Some(t) = declared_type {
        if ACCEPTED_MIME_TYPES.contains(&t) {
            return t.to_string();
        }
    }
    match extension_of(name).as_deref() {
        Some("pdf") => "application/pdf".to_string(),
        _ => "text/plain".to_string(),
    }
}

pub fn select(path: &Path, declared_type: Option<&str>) -> anyhow::Result<StagedFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("not a file path: {}", path.display()))?;
    let meta = std::fs::metadata(path)?;
    validate_candidate(&name, meta.len(), declared_type)?;

    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let sha256 = hex::encode(hasher.finalize());

    let abs = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    Ok(StagedFile {
        name: name.clone(),
        path: abs.to_string_lossy().to_string(),
        size: meta.len(),
        content_type: effective_content_type(&name, declared_type),
        sha256,
        staged_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}

/// Binary-unit size label: 1024-based, rounded to at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exp as i32);
    format!("{} {}", (scaled * 100.0).round() / 100.0, UNITS[exp])
}
