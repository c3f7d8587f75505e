use super::{DataByte, Platform};

const BMC_HEALTH: u8 = 0x70;
const NTP_STATUS: u8 = 0x71;
const SYSTEM_EVENT: u8 = 0x72;

const SYSTEM_THROTTLE: u8 = 0xC0;

const BMC_HEALTH_NAMES: &[Option<&str>] = names![
    "BMC Reboot",
    "BMC Watchdog Timeout",
    "Memory Low",
    "Disk Space Low",
    "Filesystem Error",
    "CPU Utilization High",
    "Memory Utilization High",
    "Root Filesystem Utilization High",
];

const NTP_STATUS_NAMES: &[Option<&str>] = names![
    "NTP Synchronized",
    "NTP Synchronization Lost",
    "NTP Server Unreachable",
];

const SYSTEM_EVENT_NAMES: &[Option<&str>] = names![
    "Host Power On",
    "Host Power Off",
    "Host Reset",
    "BMC Firmware Update Started",
    "BMC Firmware Update Completed",
];

const SYSTEM_THROTTLE_NAMES: &[Option<&str>] = names![
    "Power Capping Throttle",
    "Thermal Throttle",
    "PROCHOT Throttle",
    "Memory Throttle",
];

/// A BMC platform defining a small set of OEM events.
///
/// * `0x70` BMC health, where offsets 5 through 7 carry a utilization percentage in
///   event data 2.
/// * `0x71` NTP status and `0x72` system events.
/// * OEM sensor type `0xC0`, system throttle.
#[derive(Debug, Clone, Default)]
pub struct ReferencePlatform {
    users: Vec<(u8, String)>,
}

impl ReferencePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user<T: Into<String>>(mut self, user_id: u8, name: T) -> Self {
        self.users.retain(|(id, _)| *id != user_id);
        self.users.push((user_id, name.into()));
        self
    }
}

impl Platform for ReferencePlatform {
    fn oem_event_names(&self, event_type: u8) -> &[Option<&str>] {
        match event_type {
            BMC_HEALTH => BMC_HEALTH_NAMES,
            NTP_STATUS => NTP_STATUS_NAMES,
            SYSTEM_EVENT => SYSTEM_EVENT_NAMES,
            _ => &[],
        }
    }

    fn oem_sensor_type_name(&self, sensor_type: u8) -> Option<&str> {
        match sensor_type {
            SYSTEM_THROTTLE => Some("System Throttle"),
            _ => None,
        }
    }

    fn oem_sensor_specific_names(&self, sensor_type: u8) -> &[Option<&str>] {
        match sensor_type {
            SYSTEM_THROTTLE => SYSTEM_THROTTLE_NAMES,
            _ => &[],
        }
    }

    fn oem_event_data(
        &self,
        event_type: u8,
        offset: u8,
        byte: DataByte,
        event_data: [u8; 3],
    ) -> Option<String> {
        match (event_type, offset, byte) {
            (BMC_HEALTH, 0x05..=0x07, DataByte::Two) => Some(format!("{}%", event_data[1])),
            _ => None,
        }
    }

    fn user_name(&self, user_id: u8) -> Option<&str> {
        self.users
            .iter()
            .find(|(id, _)| *id == user_id)
            .map(|(_, name)| name.as_str())
    }

    fn channel_name(&self, channel: u8) -> Option<&str> {
        match channel {
            0x00 => Some("IPMB"),
            0x01 => Some("LAN 1"),
            0x02 => Some("LAN 2"),
            0x0E => Some("current channel"),
            0x0F => Some("system interface"),
            _ => None,
        }
    }
}
