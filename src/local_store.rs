use crate::error::StoreError;
use crate::slots::SlotLabel;
use crate::store::{AppointmentStore, ChangeFeed};
use crate::types::{AppointmentRequest, BookedAppointment, StoreEvent};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc, Mutex,
    },
};
use tokio::sync::broadcast;

const FEED_CAPACITY: usize = 64;

/// In-memory appointment store. Default backend when no database is
/// configured; reservations do not survive a restart.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    appointments: Arc<Mutex<HashMap<i64, BookedAppointment>>>,
    next_id: Arc<AtomicI64>,
    sender: broadcast::Sender<StoreEvent>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            appointments: Arc::new(Mutex::default()),
            next_id: Arc::new(AtomicI64::new(1)),
            sender,
        }
    }
}

impl InMemoryStore {
    fn emit(&self, event: StoreEvent) {
        // Send only fails when no subscriber is listening.
        let _ = self.sender.send(event);
    }
}

fn falls_on(appointment: &BookedAppointment, date: NaiveDate) -> bool {
    appointment.date_time.with_timezone(&Local).date_naive() == date
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn create(&self, request: &AppointmentRequest) -> Result<BookedAppointment, StoreError> {
        let date_time = request.start_date_time().ok_or_else(|| {
            StoreError::Validation(format!("Unparseable slot label: {}", request.slot_label))
        })?;

        let appointment = {
            let mut appointments = self.appointments.lock().unwrap();
            let taken = appointments
                .values()
                .any(|appt| appt.slot_label == request.slot_label && falls_on(appt, request.date));
            if taken {
                return Err(StoreError::Conflict(format!(
                    "{} on {} is already booked",
                    request.slot_label, request.date
                )));
            }

            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let appointment = BookedAppointment {
                id,
                date_time,
                customer_name: request.customer_name.clone(),
                customer_phone: request.customer_phone.clone(),
                slot_label: request.slot_label.clone(),
                notes: request.notes.clone(),
            };
            appointments.insert(id, appointment.clone());
            appointment
        };

        self.emit(StoreEvent::Inserted(appointment.clone()));
        Ok(appointment)
    }

    async fn booked_labels(&self, date: NaiveDate) -> Result<Vec<SlotLabel>, StoreError> {
        let appointments = self.appointments.lock().unwrap();
        let mut labels: Vec<SlotLabel> = appointments
            .values()
            .filter(|appt| falls_on(appt, date))
            .map(|appt| appt.slot_label.clone())
            .collect();
        labels.sort();
        Ok(labels)
    }

    async fn all_appointments(&self) -> Result<Vec<BookedAppointment>, StoreError> {
        let mut appointments: Vec<BookedAppointment> =
            self.appointments.lock().unwrap().values().cloned().collect();
        appointments.sort_unstable_by_key(|appt| appt.date_time);
        Ok(appointments)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        if self.appointments.lock().unwrap().remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        self.emit(StoreEvent::Deleted { id });
        Ok(())
    }

    fn subscribe(&self) -> ChangeFeed {
        ChangeFeed::new(self.sender.subscribe())
    }
}
