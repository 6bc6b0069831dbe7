use crate::error::StoreError;
use crate::store::AppointmentStore;
use crate::types::{BookedAppointment, StoreEvent};
use chrono::{Local, NaiveDate};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::info;

/// Live in-memory mirror of the appointment collection, kept consistent
/// by change-feed events rather than polling. Always sorted by date_time
/// ascending.
#[derive(Debug, Default)]
pub struct AdminRoster {
    mirror: Vec<BookedAppointment>,
}

impl AdminRoster {
    pub fn with_appointments(mut appointments: Vec<BookedAppointment>) -> Self {
        appointments.sort_unstable_by_key(|appt| appt.date_time);
        Self {
            mirror: appointments,
        }
    }

    pub fn all(&self) -> &[BookedAppointment] {
        &self.mirror
    }

    /// Appointments falling on the given local date, sorted by slot label
    /// ascending for display.
    pub fn on_date(&self, date: NaiveDate) -> Vec<BookedAppointment> {
        let mut appointments: Vec<BookedAppointment> = self
            .mirror
            .iter()
            .filter(|appt| appt.date_time.with_timezone(&Local).date_naive() == date)
            .cloned()
            .collect();
        appointments.sort_unstable_by(|a, b| a.slot_label.cmp(&b.slot_label));
        appointments
    }

    /// Fold one feed event into the mirror. Idempotent: re-inserting a
    /// known id replaces it, removing an absent id is a no-op.
    pub fn apply(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::Inserted(appointment) | StoreEvent::Updated(appointment) => {
                self.mirror.retain(|appt| appt.id != appointment.id);
                self.mirror.push(appointment);
                self.mirror.sort_unstable_by_key(|appt| appt.date_time);
            }
            StoreEvent::Deleted { id } => {
                self.mirror.retain(|appt| appt.id != id);
            }
        }
    }
}

/// Bulk-load the roster and keep it live from the store's change feed.
///
/// Subscribes before the bulk load so no event falls into the gap; events
/// that overlap the load converge because `apply` is idempotent. A load
/// failure drops the subscription, so the feed is never started.
pub async fn activate<S: AppointmentStore>(
    store: &S,
) -> Result<(Arc<Mutex<AdminRoster>>, JoinHandle<()>), StoreError> {
    let mut feed = store.subscribe();
    let initial = store.all_appointments().await?;
    info!(appointments = initial.len(), "admin roster loaded");

    let roster = Arc::new(Mutex::new(AdminRoster::with_appointments(initial)));
    let task = tokio::spawn({
        let roster = roster.clone();
        async move {
            while let Some(event) = feed.next_event().await {
                roster.lock().unwrap().apply(event);
            }
        }
    });
    Ok((roster, task))
}
