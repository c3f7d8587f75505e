use ipmi_sel_core::sel::RenderError;

use crate::flat_file::FlatFileError;

#[derive(Debug, thiserror::Error)]
pub enum EventLogError<STORE> {
    #[error("could not render event: {0}")]
    Render(RenderError),
    #[error("event store error: {0}")]
    Store(STORE),
    #[error("could not export records: {0}")]
    Export(FlatFileError),
}

impl<STORE> From<STORE> for EventLogError<STORE> {
    fn from(value: STORE) -> Self {
        Self::Store(value)
    }
}

impl<STORE> EventLogError<STORE> {
    pub fn map<STORE2, F>(self, f: F) -> EventLogError<STORE2>
    where
        F: FnOnce(STORE) -> STORE2,
    {
        match self {
            EventLogError::Render(e) => EventLogError::Render(e),
            EventLogError::Store(e) => EventLogError::Store(f(e)),
            EventLogError::Export(e) => EventLogError::Export(e),
        }
    }
}
