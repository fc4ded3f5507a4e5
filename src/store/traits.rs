//! Storage traits: the conversation log and the credential store.
//!
//! Both are injected into the dispatcher as trait objects so tests (or a
//! persistent backend) can swap them without touching dispatch logic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capabilities::CapabilityOutput;
use crate::config::{Service, is_placeholder};
use crate::error::{ConfigError, LogError};
use crate::intent::{Business, Intent};

/// One processed request. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub message: String,
    pub response: CapabilityOutput,
    pub intent: Intent,
    pub timestamp: DateTime<Utc>,
    /// Copied from `intent.business`.
    pub business: Business,
}

impl ConversationRecord {
    pub fn new(message: impl Into<String>, response: CapabilityOutput, intent: Intent) -> Self {
        let business = intent.business;
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            response,
            intent,
            timestamp: Utc::now(),
            business,
        }
    }
}

/// Append-only, bounded history of processed requests.
#[async_trait]
pub trait ConversationLog: Send + Sync {
    /// Maximum number of records retained.
    fn capacity(&self) -> usize;

    /// Append a record, evicting the oldest entries past capacity.
    async fn append(&self, record: ConversationRecord) -> Result<(), LogError>;

    /// Number of records currently held.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Up to `limit` most recent records, oldest first.
    async fn recent(&self, limit: usize) -> Vec<ConversationRecord>;
}

/// Key/value credential storage for external services.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Raw credential, placeholder or not.
    async fn credential(&self, service: Service) -> Option<SecretString>;

    /// Store a credential, replacing any previous value.
    async fn set_credential(&self, service: Service, value: SecretString)
    -> Result<(), ConfigError>;

    /// A credential is present and is not a placeholder sentinel.
    async fn is_configured(&self, service: Service) -> bool {
        self.credential(service)
            .await
            .is_some_and(|secret| !is_placeholder(secret.expose_secret()))
    }

    /// Configured flag for every known service, keyed by service name.
    async fn status(&self) -> BTreeMap<&'static str, bool> {
        let mut status = BTreeMap::new();
        for service in Service::ALL {
            status.insert(service.name(), self.is_configured(service).await);
        }
        status
    }
}
