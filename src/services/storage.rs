use crate::domain::models::{ConfigFile, SessionState};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum StateError {
    #[error("no file staged; run `compa stage <FILE>` first")]
    NoStagedFile,
    #[error("an audit is already in progress for this user")]
    AuditInProgress,
}

fn config_base_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/compa"))
}

pub fn state_path() -> anyhow::Result<PathBuf> {
    Ok(config_base_dir()?.join("state.json"))
}

pub fn stats_path() -> anyhow::Result<PathBuf> {
    Ok(config_base_dir()?.join("stats.json"))
}

fn config_path() -> anyhow::Result<PathBuf> {
    Ok(config_base_dir()?.join("config.toml"))
}

fn lock_path() -> anyhow::Result<PathBuf> {
    Ok(config_base_dir()?.join("audit.lock"))
}

/// Session state is last-writer-wins between concurrent invocations, the
/// same race the original had between browser tabs. Only the audit path
/// is serialized (see `AuditLock`); `stage`/`unstage`/`theme` are not.
pub fn load_state() -> anyhow::Result<SessionState> {
    let p = state_path()?;
    if !p.exists() {
        return Ok(SessionState::default());
    }
    let raw = std::fs::read_to_string(&p)?;
    match serde_json::from_str(&raw) {
        Ok(state) => Ok(state),
        Err(e) => {
            log::warn!("unreadable session state at {}: {}", p.display(), e);
            Ok(SessionState::default())
        }
    }
}

pub fn save_state(state: &SessionState) -> anyhow::Result<()> {
    write_atomic(&state_path()?, &serde_json::to_string_pretty(state)?)
}

pub fn load_config() -> anyhow::Result<ConfigFile> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(p)?;
    Ok(toml::from_str(&raw)?)
}

/// Persist via a sibling temp file and rename, so the record is always a
/// single visible write.
pub fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Carrier of the single-in-flight-submission invariant: held from
/// submission start until the render and stats update complete. The
/// original expressed this as the disabled audit button.
pub struct AuditLock {
    path: PathBuf,
}

impl AuditLock {
    pub fn acquire() -> anyhow::Result<AuditLock> {
        let path = lock_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(_) => Ok(AuditLock { path }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(StateError::AuditInProgress.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for AuditLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!("failed to release audit lock {}: {}", self.path.display(), e);
        }
    }
}
