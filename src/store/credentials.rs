//! Credential stores: in-memory and env-file backed.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::traits::CredentialStore;
use crate::config::Service;
use crate::error::ConfigError;

/// Credentials held only in process memory.
#[derive(Default)]
pub struct MemoryCredentialStore {
    values: RwLock<HashMap<Service, SecretString>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for wiring up before the store is shared.
    pub fn with_credential(mut self, service: Service, value: impl Into<String>) -> Self {
        self.values
            .get_mut()
            .insert(service, SecretString::from(value.into()));
        self
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn credential(&self, service: Service) -> Option<SecretString> {
        self.values.read().await.get(&service).cloned()
    }

    async fn set_credential(
        &self,
        service: Service,
        value: SecretString,
    ) -> Result<(), ConfigError> {
        self.values.write().await.insert(service, value);
        info!(service = service.name(), "Credential updated");
        Ok(())
    }
}

/// Credentials loaded from a dotenv file and written back on update.
///
/// Updates splice a single `KEY=value` line into the file; comments and
/// unrelated lines are left as they were. Lookups fall back to the process
/// environment unless disabled.
pub struct EnvFileCredentialStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, SecretString>>,
    inherit_process_env: bool,
}

impl EnvFileCredentialStore {
    /// Load the env file at `path`. A missing file is treated as empty.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let entries = match read_env_file(&path).await? {
            Some(contents) => parse_env_contents(&contents),
            None => {
                debug!(path = %path.display(), "Env file not found, starting empty");
                BTreeMap::new()
            }
        };

        info!(path = %path.display(), keys = entries.len(), "Loaded env file");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
            inherit_process_env: true,
        })
    }

    /// Ignore the process environment; only the file's values count.
    pub fn without_process_env(mut self) -> Self {
        self.inherit_process_env = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for EnvFileCredentialStore {
    async fn credential(&self, service: Service) -> Option<SecretString> {
        let key = service.env_key();
        if let Some(value) = self.entries.read().await.get(key) {
            return Some(value.clone());
        }
        if self.inherit_process_env {
            return std::env::var(key).ok().map(SecretString::from);
        }
        None
    }

    async fn set_credential(
        &self,
        service: Service,
        value: SecretString,
    ) -> Result<(), ConfigError> {
        let key = service.env_key();
        let line = format!("{key}={}", quote_value(key, value.expose_secret())?);

        // Hold the write lock across read-modify-write so concurrent updates serialize.
        let mut entries = self.entries.write().await;
        let existing = read_env_file(&self.path).await?.unwrap_or_default();
        tokio::fs::write(&self.path, splice_env_line(&existing, key, &line)).await?;
        entries.insert(key.to_string(), value);

        info!(
            service = service.name(),
            path = %self.path.display(),
            "Credential updated and persisted"
        );
        Ok(())
    }
}

/// File contents, or `None` when the file does not exist.
async fn read_env_file(path: &Path) -> Result<Option<String>, ConfigError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::Io(e)),
    }
}

/// Parse dotenv contents. Malformed lines are skipped with a warning.
fn parse_env_contents(contents: &str) -> BTreeMap<String, SecretString> {
    let mut entries = BTreeMap::new();
    for item in dotenvy::from_read_iter(contents.as_bytes()) {
        match item {
            Ok((key, value)) => {
                entries.insert(key, SecretString::from(value));
            }
            // The parse error embeds the raw line, which may hold a secret.
            Err(dotenvy::Error::LineParse(_, offset)) => {
                warn!(offset, "Skipping malformed env file line");
            }
            Err(e) => warn!(error = %e, "Skipping unreadable env file entry"),
        }
    }
    entries
}

/// Render a value so the dotenv parser reads it back verbatim.
///
/// Control characters are rejected: a newline would start a new assignment.
fn quote_value(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.chars().any(char::is_control) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "credential must not contain control characters".to_string(),
        });
    }
    if !value.contains('\'') {
        return Ok(format!("'{value}'"));
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Ok(quoted)
}

/// Replace the first assignment to `key` with `line`, drop later duplicates,
/// and append when the key is absent. Every other line is kept.
fn splice_env_line(contents: &str, key: &str, line: &str) -> String {
    let mut out = String::with_capacity(contents.len() + line.len() + 1);
    let mut replaced = false;

    for existing in contents.lines() {
        if assigned_key(existing) == Some(key) {
            if !replaced {
                out.push_str(line);
                out.push('\n');
                replaced = true;
            }
            continue;
        }
        out.push_str(existing);
        out.push('\n');
    }

    if !replaced {
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn assigned_key(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    line.split_once('=').map(|(key, _)| key.trim())
}
