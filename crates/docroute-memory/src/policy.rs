//! Retention policy for the context store.

/// Policy bounding how many records a store keeps.
#[derive(Debug, Clone, Default)]
pub struct RetentionPolicy {
    /// Optional cap on retained records; the oldest are evicted first.
    /// `None` keeps every record for the life of the process.
    pub max_records: Option<usize>,
}

impl RetentionPolicy {
    /// Keep every record.
    pub fn unbounded() -> Self {
        Self { max_records: None }
    }

    /// Keep at most `max_records` records.
    pub fn capped(max_records: usize) -> Self {
        Self {
            max_records: Some(max_records),
        }
    }
}
