//! In-memory conversation log: a bounded sliding window of records.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::traits::{ConversationLog, ConversationRecord};
use crate::config::DEFAULT_LOG_CAPACITY;
use crate::error::LogError;

/// Conversation log held in process memory.
///
/// Appends take the write lock once; push and eviction happen inside that
/// single critical section so the capacity bound is exact under concurrency.
pub struct InMemoryConversationLog {
    records: RwLock<VecDeque<ConversationRecord>>,
    capacity: usize,
}

impl InMemoryConversationLog {
    /// Create a log holding at most `capacity` records (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY))),
            capacity,
        }
    }
}

impl Default for InMemoryConversationLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[async_trait]
impl ConversationLog for InMemoryConversationLog {
    fn capacity(&self) -> usize {
        self.capacity
    }

    async fn append(&self, record: ConversationRecord) -> Result<(), LogError> {
        let mut records = self.records.write().await;
        records.push_back(record);

        let mut evicted = 0;
        while records.len() > self.capacity {
            records.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            debug!(evicted, capacity = self.capacity, "Evicted oldest conversation records");
        }
        Ok(())
    }

    async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    async fn recent(&self, limit: usize) -> Vec<ConversationRecord> {
        let records = self.records.read().await;
        let skip = records.len().saturating_sub(limit);
        records.iter().skip(skip).cloned().collect()
    }
}
