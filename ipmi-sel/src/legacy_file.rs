use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use ipmi_sel_core::sel::{DecodeError, EventRecord, RecordId, LEGACY_RECORD_SIZE};

#[derive(Debug, thiserror::Error)]
pub enum LegacyFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode record: {0}")]
    Decode(#[from] DecodeError),
    #[error("cannot store a record without an id")]
    UnassignedId,
}

/// A file of fixed-size legacy records, where record `id` lives at offset
/// `LEGACY_RECORD_SIZE * (id - 1)`.
pub struct LegacySelFile<F> {
    inner: F,
}

impl<F> LegacySelFile<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }

    pub fn release(self) -> F {
        self.inner
    }

    pub fn inner_mut(&mut self) -> &mut F {
        &mut self.inner
    }

    pub fn position(id: RecordId) -> u64 {
        LEGACY_RECORD_SIZE as u64 * (id.value() as u64).saturating_sub(1)
    }
}

impl<F> LegacySelFile<F>
where
    F: Read + Seek,
{
    /// Read record `id`.
    ///
    /// A record that lies beyond the end of the file, or that carries a different
    /// id than the one requested, is reported as not found.
    pub fn get(&mut self, id: RecordId) -> Result<Option<EventRecord>, LegacyFileError> {
        if !id.is_assigned() {
            return Ok(None);
        }

        self.inner.seek(SeekFrom::Start(Self::position(id)))?;

        let mut data = [0u8; LEGACY_RECORD_SIZE];
        match self.inner.read_exact(&mut data) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                log::debug!("Record 0x{:04X} is beyond the end of the file", id.value());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }

        let embedded_id = u16::from_ne_bytes([data[0], data[1]]);
        if embedded_id != id.value() {
            log::warn!(
                "Record at the position of 0x{:04X} has id 0x{embedded_id:04X}",
                id.value()
            );
            return Ok(None);
        }

        Ok(Some(EventRecord::decode_legacy(&data)?))
    }
}

impl<F> LegacySelFile<F>
where
    F: Write + Seek,
{
    /// Write `record` at the position of its id.
    pub fn put(&mut self, record: &EventRecord) -> Result<(), LegacyFileError> {
        if !record.record_id().is_assigned() {
            return Err(LegacyFileError::UnassignedId);
        }

        self.inner
            .seek(SeekFrom::Start(Self::position(record.record_id())))?;
        self.inner.write_all(&record.encode_legacy())?;
        Ok(())
    }
}
