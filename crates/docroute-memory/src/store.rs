//! Context store abstraction and the default in-process implementation.

use crate::error::MemoryError;
use crate::model::MemoryRecord;
use crate::policy::RetentionPolicy;
use docroute_protocol::{RecordId, ThreadId};
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Append-only log of processing records shared by concurrent requests.
///
/// Implementations must make `append` atomic: a reader either sees a whole
/// record or none of it, and records sharing a thread are returned in the
/// order their appends completed.
pub trait ContextStore: Send + Sync {
    /// Append a record and return its id.
    fn append(&self, record: MemoryRecord) -> Result<RecordId, MemoryError>;

    /// Fetch a record by id.
    fn get_by_id(&self, id: RecordId) -> Result<MemoryRecord, MemoryError>;

    /// Records filed under `thread_id`, oldest first.
    fn get_by_thread(&self, thread_id: &str) -> Vec<MemoryRecord>;

    /// Number of retained records.
    fn len(&self) -> usize;

    /// True when no records are retained.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct StoreState {
    /// Retained ids in append order.
    order: VecDeque<RecordId>,
    records: HashMap<RecordId, Arc<MemoryRecord>>,
    threads: HashMap<ThreadId, VecDeque<RecordId>>,
}

impl StoreState {
    /// Drop the oldest record and its thread index entry.
    fn evict_oldest(&mut self) -> Option<RecordId> {
        let id = self.order.pop_front()?;
        let record = self.records.remove(&id)?;
        if let Some(thread_id) = record.thread_id.as_ref() {
            let now_empty = match self.threads.get_mut(thread_id) {
                Some(ids) => {
                    // Globally oldest is also the oldest in its thread.
                    if ids.front() == Some(&id) {
                        ids.pop_front();
                    } else {
                        ids.retain(|candidate| *candidate != id);
                    }
                    ids.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.threads.remove(thread_id);
            }
        }
        Some(id)
    }
}

/// In-process store guarded by a single read/write lock.
#[derive(Clone, Default)]
pub struct InMemoryContextStore {
    state: Arc<RwLock<StoreState>>,
    policy: RetentionPolicy,
}

impl InMemoryContextStore {
    /// Create an empty store that keeps every record.
    pub fn new() -> Self {
        Self::with_policy(RetentionPolicy::unbounded())
    }

    /// Create an empty store with the given retention policy.
    pub fn with_policy(policy: RetentionPolicy) -> Self {
        info!(
            "initialized in-memory context store (max_records={:?})",
            policy.max_records
        );
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            policy,
        }
    }

    /// Retention policy in effect.
    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// Snapshot of every retained record, oldest first.
    pub fn records(&self) -> Vec<MemoryRecord> {
        let state = self.state.read();
        state
            .order
            .iter()
            .filter_map(|id| state.records.get(id))
            .map(|record| MemoryRecord::clone(record))
            .collect()
    }

    /// Number of distinct threads with retained records.
    pub fn thread_count(&self) -> usize {
        self.state.read().threads.len()
    }
}

impl ContextStore for InMemoryContextStore {
    fn append(&self, record: MemoryRecord) -> Result<RecordId, MemoryError> {
        let id = record.id;
        let record = Arc::new(record);
        let mut state = self.state.write();
        if state.records.contains_key(&id) {
            return Err(MemoryError::DuplicateRecord(id));
        }
        state.order.push_back(id);
        if let Some(thread_id) = record.thread_id.clone() {
            state.threads.entry(thread_id).or_default().push_back(id);
        }
        state.records.insert(id, record);

        if let Some(max_records) = self.policy.max_records {
            while state.order.len() > max_records {
                match state.evict_oldest() {
                    Some(evicted) => debug!("evicted record (record_id={evicted})"),
                    None => break,
                }
            }
        }
        debug!(
            "appended record (record_id={}, retained={})",
            id,
            state.order.len()
        );
        Ok(id)
    }

    fn get_by_id(&self, id: RecordId) -> Result<MemoryRecord, MemoryError> {
        self.state
            .read()
            .records
            .get(&id)
            .map(|record| MemoryRecord::clone(record))
            .ok_or(MemoryError::NotFound(id))
    }

    fn get_by_thread(&self, thread_id: &str) -> Vec<MemoryRecord> {
        let state = self.state.read();
        let Some(ids) = state.threads.get(thread_id) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| state.records.get(id))
            .map(|record| MemoryRecord::clone(record))
            .collect()
    }

    fn len(&self) -> usize {
        self.state.read().order.len()
    }
}
