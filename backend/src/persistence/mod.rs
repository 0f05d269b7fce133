//! Persistence collaborator interface
//!
//! The core exchanges [`HorseRecord`]s with a store and knows nothing about
//! file formats. A driver plugs in whatever backing it likes (CSV, database,
//! nothing at all); [`InMemoryRecordStore`] is the reference implementation.

use tracing::debug;

use crate::models::horse::{Horse, HorseError};
use crate::models::record::{HorseRecord, RecordError};
use crate::models::roster::LaneRoster;

/// Narrow capability interface to horse persistence
pub trait HorseRecordStore {
    /// Look up a record by name (case-insensitive)
    fn load_horse_record(&self, name: &str) -> Result<HorseRecord, RecordError>;

    /// Store a new record. A record with the same name is left untouched.
    fn save_horse_record(&mut self, record: HorseRecord) -> Result<(), RecordError>;

    /// Replace an existing record by name
    fn update_horse_record(&mut self, record: HorseRecord) -> Result<(), RecordError>;

    /// All records in insertion order
    fn list_records(&self) -> Vec<HorseRecord>;
}

/// Vec-backed store, insertion ordered
///
/// # Example
/// ```
/// use horse_race_core::persistence::{HorseRecordStore, InMemoryRecordStore};
/// use horse_race_core::{Horse, HorseRecord};
///
/// let mut store = InMemoryRecordStore::new();
/// store.save_horse_record(Horse::new("Golden moon", 'G', 0.6).to_record()).unwrap();
///
/// let record = store.load_horse_record("golden MOON").unwrap();
/// assert_eq!(record.symbol, 'G');
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    records: Vec<HorseRecord>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.name.eq_ignore_ascii_case(name))
    }
}

impl HorseRecordStore for InMemoryRecordStore {
    fn load_horse_record(&self, name: &str) -> Result<HorseRecord, RecordError> {
        self.position(name)
            .map(|i| self.records[i].clone())
            .ok_or_else(|| RecordError::NotFound(name.to_string()))
    }

    fn save_horse_record(&mut self, record: HorseRecord) -> Result<(), RecordError> {
        record.validate()?;
        if self.position(&record.name).is_none() {
            self.records.push(record);
        }
        Ok(())
    }

    fn update_horse_record(&mut self, record: HorseRecord) -> Result<(), RecordError> {
        record.validate()?;
        let index = self
            .position(&record.name)
            .ok_or_else(|| RecordError::NotFound(record.name.clone()))?;
        self.records[index] = record;
        Ok(())
    }

    fn list_records(&self) -> Vec<HorseRecord> {
        self.records.clone()
    }
}

/// Load a horse from `store` by name
pub fn load_horse<S: HorseRecordStore + ?Sized>(store: &S, name: &str) -> Result<Horse, RecordError> {
    let record = store.load_horse_record(name)?;
    Horse::from_record(&record).map_err(|HorseError::Validation(msg)| RecordError::Invalid(msg))
}

/// Write every roster horse back to `store`, inserting unknown ones
///
/// Returns how many records were written.
pub fn sync_roster<S: HorseRecordStore + ?Sized>(
    store: &mut S,
    roster: &LaneRoster,
) -> Result<usize, RecordError> {
    let mut written = 0;
    for horse in roster.horses() {
        let record = horse.to_record();
        match store.update_horse_record(record.clone()) {
            Err(RecordError::NotFound(_)) => store.save_horse_record(record)?,
            other => other?,
        }
        written += 1;
    }
    debug!(written, "roster synced to record store");
    Ok(written)
}
