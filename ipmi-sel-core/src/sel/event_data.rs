//! Event Data Field Formatting
//!
//! Reference: IPMI 2.0 Specification, Section 29.7 "Event Data Field Formats"
//!
//! Renders event data 2 and 3 into the clauses that follow the event name in a message.
//! How each byte is read depends on the class of the event type and on the 2-bit usage
//! code carried in event data 1.

use super::{
    event_data_2_usage, event_data_3_usage, event_names::lookup_event_name, sensor_specific,
    EventTypeClass, FormatError,
};
use crate::{DataByte, Platform};

/// The descriptive suffix for an event, each clause starting with `", "`.
///
/// Returns an empty string when neither data byte carries information.
pub fn format_event_data<P>(
    platform: &P,
    sensor_type: u8,
    event_type: u8,
    event_data: [u8; 3],
) -> Result<String, FormatError>
where
    P: Platform + ?Sized,
{
    let formatter = Formatter {
        platform,
        sensor_type,
        event_type,
        event_data,
    };

    let (data_2, data_3) = match EventTypeClass::from(event_type) {
        EventTypeClass::Reserved => return Err(FormatError::ReservedEventType(event_type)),
        EventTypeClass::Invalid => return Err(FormatError::InvalidEventType(event_type)),
        EventTypeClass::Threshold => (
            formatter.threshold(DataByte::Two),
            formatter.threshold(DataByte::Three),
        ),
        EventTypeClass::GenericDiscrete | EventTypeClass::SensorSpecific => (
            formatter.discrete(DataByte::Two)?,
            formatter.discrete(DataByte::Three)?,
        ),
        EventTypeClass::Oem => (
            formatter.oem(DataByte::Two)?,
            formatter.oem(DataByte::Three)?,
        ),
    };

    Ok(data_2 + &data_3)
}

struct Formatter<'a, P: ?Sized> {
    platform: &'a P,
    sensor_type: u8,
    event_type: u8,
    event_data: [u8; 3],
}

impl<P> Formatter<'_, P>
where
    P: Platform + ?Sized,
{
    fn offset(&self) -> u8 {
        super::event_offset(self.event_data[0])
    }

    fn usage(&self, byte: DataByte) -> u8 {
        match byte {
            DataByte::Two => event_data_2_usage(self.event_data[0]),
            DataByte::Three => event_data_3_usage(self.event_data[0]),
        }
    }

    fn value(&self, byte: DataByte) -> u8 {
        self.event_data[byte.index()]
    }

    fn reserved_usage(&self, byte: DataByte) -> FormatError {
        FormatError::ReservedUsage {
            data: byte.number(),
            usage: self.usage(byte),
            event_type: self.event_type,
        }
    }

    fn oem_code(&self, byte: DataByte) -> String {
        format!(", OEM event data {} 0x{:02X}", byte.number(), self.value(byte))
    }

    fn extension_code(&self, byte: DataByte) -> String {
        format!(
            ", sensor-specific event extension code 0x{:02X} from event data {}",
            self.value(byte),
            byte.number()
        )
    }

    fn threshold(&self, byte: DataByte) -> String {
        match (self.usage(byte), byte) {
            (0b00, _) => String::new(),
            (0b01, DataByte::Two) => format!(", trigger reading 0x{:02X}", self.value(byte)),
            (0b01, DataByte::Three) => format!(", threshold 0x{:02X}", self.value(byte)),
            (0b10, _) => self.oem_code(byte),
            _ => self.extension_code(byte),
        }
    }

    fn discrete(&self, byte: DataByte) -> Result<String, FormatError> {
        let text = match (self.usage(byte), byte) {
            (0b00, _) => String::new(),
            (0b01, DataByte::Two) => {
                let previous = lookup_event_name(
                    self.platform,
                    self.sensor_type,
                    self.event_type,
                    self.value(byte) & 0x0F,
                )?;
                format!(", previous state {previous}")
            }
            (0b01, DataByte::Three) => return Err(self.reserved_usage(byte)),
            (0b10, _) => self
                .platform
                .oem_discrete_data(self.sensor_type, self.offset(), byte, self.event_data)
                .map(clause)
                .unwrap_or_else(|| self.oem_code(byte)),
            _ if self.event_type == 0x6F => sensor_specific::format(
                self.platform,
                self.sensor_type,
                self.offset(),
                byte,
                self.event_data,
            )
            .map(clause)
            .unwrap_or_default(),
            _ => self.extension_code(byte),
        };

        Ok(text)
    }

    fn oem(&self, byte: DataByte) -> Result<String, FormatError> {
        let text = match (self.usage(byte), byte) {
            (0b00, _) => String::new(),
            (0b01, DataByte::Two) => format!(", previous state 0x{:02X}", self.value(byte)),
            (0b10, _) => self
                .platform
                .oem_event_data(self.event_type, self.offset(), byte, self.event_data)
                .map(clause)
                .unwrap_or_else(|| self.oem_code(byte)),
            _ => return Err(self.reserved_usage(byte)),
        };

        Ok(text)
    }
}

fn clause(phrase: String) -> String {
    if phrase.is_empty() {
        phrase
    } else {
        format!(", {phrase}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DefaultPlatform, ReferencePlatform};

    #[test]
    fn test_threshold_trigger_reading() {
        let suffix = format_event_data(&DefaultPlatform, 0x02, 0x01, [0x49, 0xC8, 0x00]).unwrap();
        assert_eq!(suffix, ", trigger reading 0xC8");

        let suffix = format_event_data(&DefaultPlatform, 0x02, 0x01, [0x59, 0xC8, 0xB4])
            .unwrap();
        assert_eq!(suffix, ", trigger reading 0xC8, threshold 0xB4");
    }

    #[test]
    fn test_threshold_other_usages() {
        let suffix = format_event_data(&DefaultPlatform, 0x01, 0x01, [0xA0, 0x11, 0x22]).unwrap();
        assert_eq!(suffix, ", OEM event data 2 0x11, OEM event data 3 0x22");

        let suffix = format_event_data(&DefaultPlatform, 0x01, 0x01, [0xF0, 0x11, 0x22]).unwrap();
        assert_eq!(
            suffix,
            ", sensor-specific event extension code 0x11 from event data 2, \
             sensor-specific event extension code 0x22 from event data 3"
        );

        let suffix = format_event_data(&DefaultPlatform, 0x01, 0x01, [0x00, 0x11, 0x22]).unwrap();
        assert_eq!(suffix, "");
    }

    #[test]
    fn test_reserved_event_types() {
        assert_eq!(
            format_event_data(&DefaultPlatform, 0x02, 0x00, [0x59, 0, 0]),
            Err(FormatError::ReservedEventType(0x00))
        );
        assert_eq!(
            format_event_data(&DefaultPlatform, 0x02, 0x20, [0x59, 0, 0]),
            Err(FormatError::ReservedEventType(0x20))
        );
        assert_eq!(
            format_event_data(&DefaultPlatform, 0x02, 0x80, [0x59, 0, 0]),
            Err(FormatError::InvalidEventType(0x80))
        );
    }

    #[test]
    fn test_discrete_previous_state() {
        let suffix = format_event_data(&DefaultPlatform, 0x0D, 0x07, [0x41, 0x00, 0x00]).unwrap();
        assert_eq!(suffix, ", previous state Transition To OK");

        assert_eq!(
            format_event_data(&DefaultPlatform, 0x0D, 0x07, [0x41, 0x0C, 0x00]),
            Err(FormatError::InvalidOffset {
                event_type: 0x07,
                sensor_type: 0x0D,
                offset: 0x0C,
            })
        );
    }

    #[test]
    fn test_discrete_reserved_data_3_usage() {
        assert_eq!(
            format_event_data(&DefaultPlatform, 0x0D, 0x07, [0x11, 0x00, 0x00]),
            Err(FormatError::ReservedUsage {
                data: 3,
                usage: 0b01,
                event_type: 0x07,
            })
        );
    }

    #[test]
    fn test_discrete_oem_and_extension() {
        let suffix = format_event_data(&DefaultPlatform, 0x0D, 0x03, [0xA1, 0x12, 0x34]).unwrap();
        assert_eq!(suffix, ", OEM event data 2 0x12, OEM event data 3 0x34");

        let suffix = format_event_data(&DefaultPlatform, 0x0D, 0x03, [0xC1, 0x12, 0x34]).unwrap();
        assert_eq!(
            suffix,
            ", sensor-specific event extension code 0x12 from event data 2"
        );
    }

    #[test]
    fn test_sensor_specific_psu_configuration_error() {
        let suffix = format_event_data(&DefaultPlatform, 0x08, 0x6F, [0x36, 0xFF, 0x01]).unwrap();
        assert!(suffix.contains("vendor mismatch"), "{suffix}");
        assert_eq!(suffix, ", vendor mismatch");

        let suffix = format_event_data(&DefaultPlatform, 0x08, 0x6F, [0xF6, 0xFF, 0x01]).unwrap();
        assert!(suffix.contains("vendor mismatch"), "{suffix}");
    }

    #[test]
    fn test_sensor_specific_unknown_degrades() {
        let suffix = format_event_data(&DefaultPlatform, 0x07, 0x6F, [0xF0, 0x12, 0x34]).unwrap();
        assert_eq!(suffix, "");
    }

    #[test]
    fn test_oem_event_type() {
        let platform = ReferencePlatform::new();

        let suffix = format_event_data(&platform, 0x28, 0x70, [0x86, 42, 0x00]).unwrap();
        assert_eq!(suffix, ", 42%");

        let suffix = format_event_data(&DefaultPlatform, 0x28, 0x70, [0x86, 42, 0x00]).unwrap();
        assert_eq!(suffix, ", OEM event data 2 0x2A");

        let suffix = format_event_data(&platform, 0x28, 0x70, [0x60, 0x07, 0x09]).unwrap();
        assert_eq!(suffix, ", previous state 0x07, OEM event data 3 0x09");

        assert_eq!(
            format_event_data(&platform, 0x28, 0x70, [0xC0, 0, 0]),
            Err(FormatError::ReservedUsage {
                data: 2,
                usage: 0b11,
                event_type: 0x70,
            })
        );
        assert_eq!(
            format_event_data(&platform, 0x28, 0x70, [0x10, 0, 0]),
            Err(FormatError::ReservedUsage {
                data: 3,
                usage: 0b01,
                event_type: 0x70,
            })
        );
    }
}
