use docroute_memory::{ContextStore, MemoryError, MemoryRecord};
use docroute_protocol::RecordId;
use parking_lot::Mutex;
use std::sync::Arc;

/// Store whose appends always fail with a duplicate-record error.
#[derive(Clone, Default)]
pub struct FailingStore;

impl FailingStore {
    pub fn new() -> Self {
        Self
    }
}

impl ContextStore for FailingStore {
    fn append(&self, record: MemoryRecord) -> Result<RecordId, MemoryError> {
        Err(MemoryError::DuplicateRecord(record.id))
    }

    fn get_by_id(&self, id: RecordId) -> Result<MemoryRecord, MemoryError> {
        Err(MemoryError::NotFound(id))
    }

    fn get_by_thread(&self, _thread_id: &str) -> Vec<MemoryRecord> {
        Vec::new()
    }

    fn len(&self) -> usize {
        0
    }
}

/// Store that keeps every appended record in a flat list for inspection.
#[derive(Clone, Default)]
pub struct RecordingStore {
    records: Arc<Mutex<Vec<MemoryRecord>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of appended records in append order.
    pub fn appended(&self) -> Vec<MemoryRecord> {
        self.records.lock().clone()
    }
}

impl ContextStore for RecordingStore {
    fn append(&self, record: MemoryRecord) -> Result<RecordId, MemoryError> {
        let id = record.id;
        self.records.lock().push(record);
        Ok(id)
    }

    fn get_by_id(&self, id: RecordId) -> Result<MemoryRecord, MemoryError> {
        self.records
            .lock()
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(MemoryError::NotFound(id))
    }

    fn get_by_thread(&self, thread_id: &str) -> Vec<MemoryRecord> {
        self.records
            .lock()
            .iter()
            .filter(|record| record.thread_id.as_deref() == Some(thread_id))
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.records.lock().len()
    }
}
