//! Platform-specific extensions to event naming and rendering.
//!
//! Standard IPMI tables cover sensor types 0x01-0x2C and event types 0x01-0x0C and 0x6F.
//! Everything in the OEM ranges (sensor types 0xC0-0xFF, event types 0x70-0x7F), as well as
//! OEM-coded event data, is resolved through a [`Platform`].

mod reference;
pub use reference::ReferencePlatform;

/// Which of the two auxiliary event data bytes is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataByte {
    Two,
    Three,
}

impl DataByte {
    /// The number used when naming the byte, "event data N".
    pub fn number(&self) -> u8 {
        match self {
            DataByte::Two => 2,
            DataByte::Three => 3,
        }
    }

    /// Index of the byte within the 3-byte event data field.
    pub fn index(&self) -> usize {
        match self {
            DataByte::Two => 1,
            DataByte::Three => 2,
        }
    }
}

/// The set of capabilities a platform can layer over the standard tables.
///
/// Every method has an empty default, so a platform only implements what it defines.
/// Name tables use `None` for reserved offsets; an empty table means nothing is defined.
/// Data renderers return a phrase without leading separator, or `None` when the platform
/// has nothing to say about the data.
pub trait Platform {
    /// Event names for an OEM event type (0x70-0x7F), indexed by event offset.
    fn oem_event_names(&self, event_type: u8) -> &[Option<&str>] {
        let _ = event_type;
        &[]
    }

    /// Name of an OEM sensor type (0xC0-0xFF).
    fn oem_sensor_type_name(&self, sensor_type: u8) -> Option<&str> {
        let _ = sensor_type;
        None
    }

    /// Sensor-specific event names for an OEM sensor type, indexed by event offset.
    fn oem_sensor_specific_names(&self, sensor_type: u8) -> &[Option<&str>] {
        let _ = sensor_type;
        &[]
    }

    /// OEM-coded event data of a generic or sensor-specific discrete event.
    fn oem_discrete_data(
        &self,
        sensor_type: u8,
        offset: u8,
        byte: DataByte,
        event_data: [u8; 3],
    ) -> Option<String> {
        let _ = (sensor_type, offset, byte, event_data);
        None
    }

    /// OEM-coded event data of an OEM event type.
    fn oem_event_data(
        &self,
        event_type: u8,
        offset: u8,
        byte: DataByte,
        event_data: [u8; 3],
    ) -> Option<String> {
        let _ = (event_type, offset, byte, event_data);
        None
    }

    /// Sensor-specific extension data of an OEM sensor type.
    fn oem_sensor_specific_data(
        &self,
        sensor_type: u8,
        offset: u8,
        byte: DataByte,
        event_data: [u8; 3],
    ) -> Option<String> {
        let _ = (sensor_type, offset, byte, event_data);
        None
    }

    fn user_name(&self, user_id: u8) -> Option<&str> {
        let _ = user_id;
        None
    }

    fn channel_name(&self, channel: u8) -> Option<&str> {
        let _ = channel;
        None
    }
}

/// A platform without any OEM extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPlatform;

impl Platform for DefaultPlatform {}
