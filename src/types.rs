use crate::slots::SlotLabel;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One booking attempt, built by the booking session and consumed once by
/// the store's create call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub date: NaiveDate,
    pub slot_label: SlotLabel,
    pub customer_name: String,
    pub customer_phone: String,
    pub notes: Option<String>,
}

impl AppointmentRequest {
    /// The persisted timestamp: the chosen date at local midnight plus the
    /// slot's start time. The only place a slot label is decomposed back
    /// into a point in time. `None` for a label outside the catalog format
    /// or a start time that does not exist on that local date.
    pub fn start_date_time(&self) -> Option<DateTime<Utc>> {
        let start = self.slot_label.start_time()?;
        let naive = self.date.and_time(start);
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}

/// A persisted reservation. Identity is the store-assigned `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedAppointment {
    pub id: i64,
    pub date_time: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    pub slot_label: SlotLabel,
    pub notes: Option<String>,
}

/// Change-feed notification for the appointment collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum StoreEvent {
    Inserted(BookedAppointment),
    Updated(BookedAppointment),
    Deleted { id: i64 },
}
