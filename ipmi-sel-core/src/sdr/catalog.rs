use std::collections::HashMap;

use super::{SdrError, SensorDataRecord};

/// An immutable set of sensor descriptions, indexed by sensor number and by name.
///
/// Share it between threads with an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct SdrCatalog {
    records: Vec<SensorDataRecord>,
    by_number: HashMap<u8, usize>,
    by_name: HashMap<String, usize>,
}

impl SdrCatalog {
    pub fn builder() -> SdrCatalogBuilder {
        SdrCatalogBuilder::default()
    }

    pub fn get_by_number(&self, sensor_number: u8) -> Option<&SensorDataRecord> {
        self.by_number.get(&sensor_number).map(|i| &self.records[*i])
    }

    pub fn get_by_name(&self, name: &str) -> Option<&SensorDataRecord> {
        self.by_name.get(name).map(|i| &self.records[*i])
    }

    /// Records in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &SensorDataRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a SdrCatalog {
    type Item = &'a SensorDataRecord;
    type IntoIter = core::slice::Iter<'a, SensorDataRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SdrCatalogBuilder {
    records: Vec<SensorDataRecord>,
}

impl SdrCatalogBuilder {
    pub fn record(mut self, record: SensorDataRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn records(mut self, records: impl IntoIterator<Item = SensorDataRecord>) -> Self {
        self.records.extend(records);
        self
    }

    pub fn build(self) -> Result<SdrCatalog, SdrError> {
        let mut by_number = HashMap::with_capacity(self.records.len());
        let mut by_name = HashMap::with_capacity(self.records.len());

        for (idx, record) in self.records.iter().enumerate() {
            if by_number.insert(record.sensor_number(), idx).is_some() {
                return Err(SdrError::DuplicateSensorNumber(record.sensor_number()));
            }

            if by_name.insert(record.sensor_name().to_string(), idx).is_some() {
                return Err(SdrError::DuplicateSensorName(
                    record.sensor_name().to_string(),
                ));
            }
        }

        Ok(SdrCatalog {
            records: self.records,
            by_number,
            by_name,
        })
    }
}
