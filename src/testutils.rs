use crate::error::StoreError;
use crate::slots::SlotLabel;
use crate::store::{AppointmentStore, ChangeFeed};
use crate::types::{AppointmentRequest, BookedAppointment, StoreEvent};
use async_trait::async_trait;
use chrono::{Local, NaiveDate, Utc};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering},
        Arc, Mutex,
    },
};
use tokio::sync::broadcast;

pub struct MockStoreInner {
    pub success: AtomicBool,
    pub failure: Mutex<StoreError>,
    pub calls_to_create: AtomicU64,
    pub calls_to_booked_labels: AtomicU64,
    pub calls_to_all_appointments: AtomicU64,
    pub calls_to_delete: AtomicU64,
    pub appointments: Mutex<HashMap<i64, BookedAppointment>>,
    pub next_id: AtomicI64,
    pub sender: broadcast::Sender<StoreEvent>,
}

#[derive(Clone)]
pub struct MockAppointmentStore(pub Arc<MockStoreInner>);

impl MockAppointmentStore {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self(Arc::new(MockStoreInner {
            success: AtomicBool::new(true),
            failure: Mutex::new(StoreError::Transport("supposed to fail".into())),
            calls_to_create: AtomicU64::default(),
            calls_to_booked_labels: AtomicU64::default(),
            calls_to_all_appointments: AtomicU64::default(),
            calls_to_delete: AtomicU64::default(),
            appointments: Mutex::default(),
            next_id: AtomicI64::new(1),
            sender,
        }))
    }

    pub fn fail_with(&self, error: StoreError) {
        self.0.success.store(false, Ordering::SeqCst);
        *self.0.failure.lock().unwrap() = error;
    }

    pub fn emit(&self, event: StoreEvent) {
        let _ = self.0.sender.send(event);
    }

    fn result(&self) -> Result<(), StoreError> {
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(self.0.failure.lock().unwrap().clone()),
        }
    }
}

#[async_trait]
impl AppointmentStore for MockAppointmentStore {
    async fn create(&self, request: &AppointmentRequest) -> Result<BookedAppointment, StoreError> {
        self.0.calls_to_create.fetch_add(1, Ordering::SeqCst);
        self.result()?;

        let id = self.0.next_id.fetch_add(1, Ordering::SeqCst);
        let appointment = BookedAppointment {
            id,
            date_time: request.start_date_time().unwrap_or_else(Utc::now),
            customer_name: request.customer_name.clone(),
            customer_phone: request.customer_phone.clone(),
            slot_label: request.slot_label.clone(),
            notes: request.notes.clone(),
        };
        self.0
            .appointments
            .lock()
            .unwrap()
            .insert(id, appointment.clone());
        Ok(appointment)
    }

    async fn booked_labels(&self, date: NaiveDate) -> Result<Vec<SlotLabel>, StoreError> {
        self.0.calls_to_booked_labels.fetch_add(1, Ordering::SeqCst);
        self.result()?;

        let appointments = self.0.appointments.lock().unwrap();
        let mut labels: Vec<SlotLabel> = appointments
            .values()
            .filter(|appt| appt.date_time.with_timezone(&Local).date_naive() == date)
            .map(|appt| appt.slot_label.clone())
            .collect();
        labels.sort();
        Ok(labels)
    }

    async fn all_appointments(&self) -> Result<Vec<BookedAppointment>, StoreError> {
        self.0
            .calls_to_all_appointments
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;

        let mut appointments: Vec<BookedAppointment> = self
            .0
            .appointments
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect();
        appointments.sort_unstable_by_key(|appt| appt.date_time);
        Ok(appointments)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.0.calls_to_delete.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        self.0.appointments.lock().unwrap().remove(&id);
        Ok(())
    }

    fn subscribe(&self) -> ChangeFeed {
        ChangeFeed::new(self.0.sender.subscribe())
    }
}
