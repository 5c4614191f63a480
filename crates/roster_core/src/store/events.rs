//! Change notifications published by the store.

use crate::model::employee::EmployeeId;

/// Committed table change. Sent only when a row was actually affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// A new row was inserted.
    Inserted {
        /// Assigned id.
        id: EmployeeId,
    },
    /// An existing row was replaced.
    Updated {
        /// Updated id.
        id: EmployeeId,
    },
    /// A row was removed.
    Deleted {
        /// Removed id.
        id: EmployeeId,
    },
}

impl StoreEvent {
    /// Id of the row this event touched.
    pub fn employee_id(&self) -> EmployeeId {
        match self {
            Self::Inserted { id } | Self::Updated { id } | Self::Deleted { id } => *id,
        }
    }
}
