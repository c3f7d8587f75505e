use core::fmt;

use super::{
    format_event_data, lookup_event_name, lookup_sensor_type_name, EventRecord, FormatError,
    RenderError,
};
use crate::Platform;

/// The longest message, in characters, a log store accepts.
pub const MAX_MESSAGE_LEN: usize = 255;

/// What to do with messages longer than [`MAX_MESSAGE_LEN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlengthPolicy {
    #[default]
    Reject,
    Truncate,
}

/// Apply `policy` to `message`. Truncation cuts at a character boundary.
pub fn fit_message(message: String, policy: OverlengthPolicy) -> Result<String, FormatError> {
    let len = message.chars().count();

    if len <= MAX_MESSAGE_LEN {
        return Ok(message);
    }

    match policy {
        OverlengthPolicy::Reject => Err(FormatError::MessageTooLong(len)),
        OverlengthPolicy::Truncate => Ok(message.chars().take(MAX_MESSAGE_LEN).collect()),
    }
}

/// The event name together with its descriptive suffix.
fn describe<P>(platform: &P, record: &EventRecord) -> Result<String, FormatError>
where
    P: Platform + ?Sized,
{
    let name = lookup_event_name(
        platform,
        record.sensor_type(),
        record.event_type(),
        record.event_offset(),
    )?;

    let suffix = format_event_data(
        platform,
        record.sensor_type(),
        record.event_type(),
        record.event_data(),
    )?;

    Ok(format!("{name}{suffix}"))
}

fn render_error(record: &EventRecord) -> impl FnOnce(FormatError) -> RenderError + '_ {
    move |error| RenderError {
        record_id: record.record_id(),
        sensor_number: record.sensor_number(),
        error,
    }
}

/// The full message for `record`:
/// `"<sensor-type-name> sensor 0xNN <asserted|deasserted> <event-name><suffix>"`.
pub fn assemble_message<P>(
    platform: &P,
    record: &EventRecord,
    policy: OverlengthPolicy,
) -> Result<String, RenderError>
where
    P: Platform + ?Sized,
{
    let message = lookup_sensor_type_name(platform, record.sensor_type())
        .and_then(|sensor_type| {
            let description = describe(platform, record)?;

            Ok(format!(
                "{sensor_type} sensor 0x{:02X} {} {description}",
                record.sensor_number(),
                record.event_dir()
            ))
        })
        .and_then(|message| fit_message(message, policy));

    message.map_err(render_error(record))
}

/// The legacy numeric one-line rendering of a record.
///
/// `<id> <time> <SEVERITY> 0xST 0xSN 0xE1 0xE2 0xE3`, with the time in raw seconds.
pub struct LegacyLine<'a>(pub &'a EventRecord);

impl fmt::Display for LegacyLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        let [ed1, ed2, ed3] = record.event_data();

        write!(
            f,
            "{} {} {} 0x{:02X} 0x{:02X} 0x{:02X} 0x{:02X} 0x{:02X}",
            record.record_id().value(),
            record.timestamp().value(),
            record.severity().legacy_str(),
            record.sensor_type(),
            record.sensor_number(),
            ed1,
            ed2,
            ed3
        )
    }
}

/// The human-readable one-line rendering of a record.
///
/// `<Severity> sensor 0xSN <asserted|deasserted> <event-name><suffix>`
pub struct SummaryLine<'a, P: ?Sized> {
    pub record: &'a EventRecord,
    pub platform: &'a P,
}

impl<'a, P> SummaryLine<'a, P>
where
    P: Platform + ?Sized,
{
    pub fn new(record: &'a EventRecord, platform: &'a P) -> Self {
        Self { record, platform }
    }

    pub fn render(&self) -> Result<String, RenderError> {
        let record = self.record;

        describe(self.platform, record)
            .map(|description| {
                format!(
                    "{} sensor 0x{:02X} {} {description}",
                    record.severity(),
                    record.sensor_number(),
                    record.event_dir()
                )
            })
            .map_err(render_error(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sel::{RecordId, Severity, Timestamp};
    use crate::{DefaultPlatform, ReferencePlatform};

    fn voltage_event() -> EventRecord {
        EventRecord::new(Severity::Critical, 0x02, 0x30, 0x01, 0x49, 0xC8, 0x00)
    }

    #[test]
    fn test_threshold_message() {
        let message =
            assemble_message(&DefaultPlatform, &voltage_event(), OverlengthPolicy::Reject)
                .unwrap();

        assert_eq!(
            message,
            "Voltage sensor 0x30 asserted Upper Critical Going High, trigger reading 0xC8"
        );
    }

    #[test]
    fn test_deasserted_message() {
        let record = EventRecord::new(Severity::Ok, 0x0D, 0x05, 0x83, 0x01, 0x00, 0x00);
        let message = assemble_message(&DefaultPlatform, &record, OverlengthPolicy::Reject)
            .unwrap();

        assert_eq!(message, "Drive Slot sensor 0x05 deasserted State Asserted");
    }

    #[test]
    fn test_oem_message() {
        let platform = ReferencePlatform::new();
        let record = EventRecord::new(Severity::Warning, 0x28, 0x41, 0x70, 0x86, 87, 0x00);

        let message = assemble_message(&platform, &record, OverlengthPolicy::Reject).unwrap();
        assert_eq!(
            message,
            "Management Subsystem Health sensor 0x41 asserted Memory Utilization High, 87%"
        );
    }

    #[test]
    fn test_render_error_context() {
        let record = EventRecord::new(Severity::Info, 0x02, 0x30, 0x20, 0x01, 0x00, 0x00)
            .with_record_id(RecordId::new(7).unwrap());

        let error = assemble_message(&DefaultPlatform, &record, OverlengthPolicy::Reject)
            .unwrap_err();

        assert_eq!(
            error,
            RenderError {
                record_id: RecordId::new(7).unwrap(),
                sensor_number: 0x30,
                error: FormatError::ReservedEventType(0x20),
            }
        );
        assert_eq!(
            error.to_string(),
            "sensor 0x30 (record 7): reserved event type 0x20"
        );
    }

    #[test]
    fn test_fit_message() {
        let short = "a".repeat(MAX_MESSAGE_LEN);
        assert_eq!(
            fit_message(short.clone(), OverlengthPolicy::Reject),
            Ok(short)
        );

        let long = "é".repeat(MAX_MESSAGE_LEN + 1);
        assert_eq!(
            fit_message(long.clone(), OverlengthPolicy::Reject),
            Err(FormatError::MessageTooLong(MAX_MESSAGE_LEN + 1))
        );

        let truncated = fit_message(long, OverlengthPolicy::Truncate).unwrap();
        assert_eq!(truncated.chars().count(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn test_legacy_line() {
        let record = voltage_event()
            .with_record_id(RecordId::new(3).unwrap())
            .with_timestamp(Timestamp::from(100));

        assert_eq!(
            LegacyLine(&record).to_string(),
            "3 100 CRITICAL 0x02 0x30 0x49 0xC8 0x00"
        );
    }

    #[test]
    fn test_summary_line() {
        let record = voltage_event();
        let line = SummaryLine::new(&record, &DefaultPlatform).render().unwrap();

        assert_eq!(
            line,
            "Critical sensor 0x30 asserted Upper Critical Going High, trigger reading 0xC8"
        );
    }
}
