use std::{
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

use ipmi_sel_core::sel::{EventRecord, RecordId, Severity, Timestamp};
use ipmi_sel_log::{log_vec, LogItem, Loggable};

/// The rendered fields of an event, as accepted by an [`EventStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub name: String,
    pub severity: Severity,
    /// The event type of the originating record.
    pub entry_type: u8,
    /// The event offset of the originating record.
    pub entry_code: u8,
    pub sensor_type: u8,
    pub sensor_number: u8,
    pub message: String,
    /// The legacy record's event bytes: severity, sensor type, sensor number,
    /// event direction/type and the three event data bytes.
    pub raw_data: Vec<u8>,
}

impl LogEntry {
    pub fn from_event(record: &EventRecord, name: String, message: String) -> Self {
        let [ed1, ed2, ed3] = record.event_data();

        Self {
            name,
            severity: record.severity(),
            entry_type: record.event_type(),
            entry_code: record.event_offset(),
            sensor_type: record.sensor_type(),
            sensor_number: record.sensor_number(),
            message,
            raw_data: vec![
                record.severity().code(),
                record.sensor_type(),
                record.sensor_number(),
                record.event_dir_type(),
                ed1,
                ed2,
                ed3,
            ],
        }
    }
}

/// A stored [`LogEntry`] together with the identifiers and time the store gave it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecord {
    /// The identifier of the store slot.
    pub log_id: RecordId,
    /// The SEL record id the entry is reported under.
    pub record_id: RecordId,
    pub created: Timestamp,
    pub entry: LogEntry,
}

impl Loggable for FlatRecord {
    fn as_log(&self) -> Vec<LogItem> {
        let FlatRecord {
            log_id,
            record_id,
            created,
            entry,
        } = self;

        log_vec![
            (0, "Log entry"),
            (1, "Log ID", log_id.value()),
            (1, "Name", &entry.name),
            (1, "Record ID", format!("0x{:04X}", record_id.value())),
            (1, "Severity", entry.severity),
            (1, "Created", created),
            (1, "Entry type", format!("0x{:02X}", entry.entry_type)),
            (1, "Entry code", format!("0x{:02X}", entry.entry_code)),
            (1, "Sensor type", format!("0x{:02X}", entry.sensor_type)),
            (1, "Sensor number", format!("0x{:02X}", entry.sensor_number)),
            (1, "Message", &entry.message),
            (1, "Raw data", format!("{:02X?}", entry.raw_data)),
        ]
    }
}

/// A persistent event log.
pub trait EventStore {
    type Error: core::fmt::Debug;

    /// Store `entry`, returning the newly assigned id.
    fn create(&mut self, entry: LogEntry) -> Result<RecordId, Self::Error>;

    /// The ids of all live records with their creation time, oldest first.
    fn records(&self) -> Result<Vec<(RecordId, Timestamp)>, Self::Error>;

    fn get(&self, id: RecordId) -> Result<Option<FlatRecord>, Self::Error>;

    fn delete(&mut self, id: RecordId) -> Result<(), Self::Error>;

    /// Remove every record. `sensor_number` identifies the SEL device that requested it.
    fn clear(&mut self, sensor_number: u8) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("event store is full")]
    Full,
    #[error("record {} not found", .0.value())]
    NotFound(RecordId),
}

/// The time source of a [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    /// A logical clock: every created record is one second newer than the previous one.
    Sequence(u32),
}

impl Clock {
    fn tick(&mut self) -> Timestamp {
        match self {
            Clock::System => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs().min(u32::MAX as u64) as u32)
                    .unwrap_or(0);
                Timestamp::from(now)
            }
            Clock::Sequence(next) => {
                let now = *next;
                *next = next.saturating_add(1);
                Timestamp::from(now)
            }
        }
    }
}

/// An in-memory [`EventStore`].
///
/// Ids are assigned in increasing order from 1, wrapping after 65535 and skipping ids
/// that are still in use.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    records: BTreeMap<RecordId, FlatRecord>,
    last_id: u16,
    clock: Clock,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Clock::System)
    }
}

impl MemoryStore {
    pub fn new(clock: Clock) -> Self {
        Self {
            records: BTreeMap::new(),
            last_id: 0,
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn next_id(&self) -> Option<RecordId> {
        if self.records.len() >= u16::MAX as usize {
            return None;
        }

        let mut candidate = self.last_id;
        loop {
            candidate = candidate.checked_add(1).unwrap_or(1);

            let id = RecordId::new(candidate)?;
            if !self.records.contains_key(&id) {
                return Some(id);
            }
        }
    }
}

impl EventStore for MemoryStore {
    type Error = StoreError;

    fn create(&mut self, entry: LogEntry) -> Result<RecordId, Self::Error> {
        let id = self.next_id().ok_or(StoreError::Full)?;
        let created = self.clock.tick();

        log::debug!("Storing record 0x{:04X}: {}", id.value(), entry.message);

        self.last_id = id.value();
        self.records.insert(
            id,
            FlatRecord {
                log_id: id,
                record_id: id,
                created,
                entry,
            },
        );

        Ok(id)
    }

    fn records(&self) -> Result<Vec<(RecordId, Timestamp)>, Self::Error> {
        let mut records: Vec<_> = self
            .records
            .values()
            .map(|r| (r.log_id, r.created))
            .collect();

        records.sort_by_key(|(id, created)| (*created, *id));
        Ok(records)
    }

    fn get(&self, id: RecordId) -> Result<Option<FlatRecord>, Self::Error> {
        Ok(self.records.get(&id).cloned())
    }

    fn delete(&mut self, id: RecordId) -> Result<(), Self::Error> {
        log::debug!("Deleting record 0x{:04X}", id.value());

        self.records
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn clear(&mut self, sensor_number: u8) -> Result<(), Self::Error> {
        log::debug!(
            "Clearing {} records on request of sensor 0x{sensor_number:02X}",
            self.records.len()
        );

        self.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> LogEntry {
        let record = EventRecord::new(Severity::Info, 0x10, 0x01, 0x6F, 0x02, 0xFF, 0xFF);
        LogEntry::from_event(&record, "SEL".into(), message.into())
    }

    #[test]
    fn test_log_entry_fields() {
        let record = EventRecord::new(Severity::Critical, 0x02, 0x30, 0x01, 0x49, 0xC8, 0x00);
        let entry = LogEntry::from_event(&record, "P12V".into(), "message".into());

        assert_eq!(entry.entry_type, 0x01);
        assert_eq!(entry.entry_code, 0x09);
        assert_eq!(entry.raw_data, vec![2, 0x02, 0x30, 0x01, 0x49, 0xC8, 0x00]);
    }

    #[test]
    fn test_ids_and_order() {
        let mut store = MemoryStore::new(Clock::Sequence(100));

        let first = store.create(entry("a")).unwrap();
        let second = store.create(entry("b")).unwrap();
        assert_eq!(first.value(), 1);
        assert_eq!(second.value(), 2);

        let records = store.records().unwrap();
        assert_eq!(
            records,
            vec![(first, Timestamp::from(100)), (second, Timestamp::from(101))]
        );

        let stored = store.get(second).unwrap().unwrap();
        assert_eq!(stored.entry.message, "b");
        assert_eq!(stored.record_id, second);

        store.delete(first).unwrap();
        assert_eq!(store.delete(first), Err(StoreError::NotFound(first)));
        assert_eq!(store.get(first).unwrap(), None);

        let third = store.create(entry("c")).unwrap();
        assert_eq!(third.value(), 3);
    }

    #[test]
    fn test_wrapping() {
        let mut store = MemoryStore::new(Clock::Sequence(1));
        store.create(entry("first")).unwrap();
        store.last_id = u16::MAX - 1;

        assert_eq!(store.create(entry("max")).unwrap().value(), u16::MAX);
        // 1 is still in use.
        assert_eq!(store.create(entry("wrapped")).unwrap().value(), 2);
    }

    #[test]
    fn test_clear() {
        let mut store = MemoryStore::new(Clock::Sequence(1));
        store.create(entry("a")).unwrap();
        store.create(entry("b")).unwrap();

        store.clear(0x01).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.records().unwrap(), vec![]);
    }
}
