//! ipmi-sel: an IPMI System Event Log front end.
//!
//! [`EventLog`] renders [`EventRecord`]s into [`LogEntry`]s and hands them to an
//! [`EventStore`]. Stored entries can be exported in the flat-file format (see
//! [`flat_file`]), and legacy fixed-size SEL files are accessed through
//! [`LegacySelFile`].

use std::{io::Write, sync::Arc};

use ipmi_sel_core::{
    sdr::SdrCatalog,
    sel::{assemble_message, lookup_sensor_type_name, EventRecord, OverlengthPolicy, RecordId},
    sel::{RenderError, Severity, Timestamp},
    DefaultPlatform, Platform,
};
use ipmi_sel_log::{LogOutput, Logger};

mod error;
pub use error::EventLogError;

pub mod flat_file;

mod legacy_file;
pub use legacy_file::{LegacyFileError, LegacySelFile};

mod store;
pub use store::{Clock, EventStore, FlatRecord, LogEntry, MemoryStore, StoreError};

/// The sensor type of the SEL device's own sensor.
const EVENT_LOGGING_DISABLED: u8 = 0x10;
/// "Log Area Reset / Cleared".
const LOG_AREA_CLEARED: u8 = 0x02;

pub struct EventLog<S, P = DefaultPlatform> {
    store: S,
    platform: P,
    catalog: Option<Arc<SdrCatalog>>,
    overlength: OverlengthPolicy,
    log_output: Option<LogOutput>,
}

impl<S> EventLog<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            platform: DefaultPlatform,
            catalog: None,
            overlength: OverlengthPolicy::default(),
            log_output: None,
        }
    }
}

impl<S> From<S> for EventLog<S>
where
    S: EventStore,
{
    fn from(value: S) -> Self {
        Self::new(value)
    }
}

impl<S, P> EventLog<S, P> {
    pub fn with_platform<P2>(self, platform: P2) -> EventLog<S, P2> {
        EventLog {
            store: self.store,
            platform,
            catalog: self.catalog,
            overlength: self.overlength,
            log_output: self.log_output,
        }
    }

    /// Resolve sensor names through `catalog`.
    pub fn with_catalog(mut self, catalog: Arc<SdrCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn overlength(mut self, policy: OverlengthPolicy) -> Self {
        self.overlength = policy;
        self
    }

    /// Echo every added entry to `output`.
    pub fn log_output(mut self, output: LogOutput) -> Self {
        self.log_output = Some(output);
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn release(self) -> S {
        self.store
    }
}

impl<S, P> EventLog<S, P>
where
    S: EventStore,
    P: Platform,
{
    /// Render `record` into the entry that [`EventLog::add`] would store.
    ///
    /// The entry is named after the sensor in the attached catalog, or after its sensor
    /// type if the catalog does not know it.
    pub fn render(&self, record: &EventRecord) -> Result<LogEntry, RenderError> {
        let message = assemble_message(&self.platform, record, self.overlength)?;

        let sensor_name = self
            .catalog
            .as_ref()
            .and_then(|c| c.get_by_number(record.sensor_number()))
            .map(|sdr| sdr.sensor_name().to_string());

        let name = match sensor_name {
            Some(name) => name,
            None => lookup_sensor_type_name(&self.platform, record.sensor_type())
                .map_err(|error| RenderError {
                    record_id: record.record_id(),
                    sensor_number: record.sensor_number(),
                    error,
                })?
                .to_string(),
        };

        Ok(LogEntry::from_event(record, name, message))
    }

    pub fn add(&mut self, record: &EventRecord) -> Result<RecordId, EventLogError<S::Error>> {
        let entry = self.render(record).map_err(EventLogError::Render)?;
        let id = self.store.create(entry)?;

        if let Some(output) = &self.log_output {
            if let Some(stored) = self.store.get(id)? {
                Logger::log(output, &stored);
            }
        }

        Ok(id)
    }

    pub fn get(&self, id: RecordId) -> Result<Option<FlatRecord>, EventLogError<S::Error>> {
        let record = self.store.get(id)?;

        if record.is_none() {
            log::debug!("Record 0x{:04X} not found", id.value());
        }

        Ok(record)
    }

    /// Live record ids, oldest first.
    pub fn records(&self) -> Result<Vec<(RecordId, Timestamp)>, EventLogError<S::Error>> {
        Ok(self.store.records()?)
    }

    pub fn delete(&mut self, id: RecordId) -> Result<(), EventLogError<S::Error>> {
        Ok(self.store.delete(id)?)
    }

    /// Clear the log, then record the clear as an event of the SEL device sensor
    /// `sensor_number`. Returns the id of that event.
    pub fn clear(&mut self, sensor_number: u8) -> Result<RecordId, EventLogError<S::Error>> {
        self.store.clear(sensor_number)?;

        let cleared = EventRecord::new(
            Severity::Info,
            EVENT_LOGGING_DISABLED,
            sensor_number,
            0x6F,
            LOG_AREA_CLEARED,
            0xFF,
            0xFF,
        );

        self.add(&cleared)
    }

    /// Write every live record to `writer` in the flat-file format, returning the
    /// number of records written.
    pub fn export<W: Write>(&self, mut writer: W) -> Result<usize, EventLogError<S::Error>> {
        let mut written = 0;

        for (id, _) in self.store.records()? {
            let Some(record) = self.store.get(id)? else {
                continue;
            };

            flat_file::write_record(&mut writer, &record).map_err(EventLogError::Export)?;
            written += 1;
        }

        Ok(written)
    }
}
