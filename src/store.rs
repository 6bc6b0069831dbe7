use crate::error::StoreError;
use crate::slots::SlotLabel;
use crate::types::{AppointmentRequest, BookedAppointment, StoreEvent};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

/// Live subscription to the appointment collection. Dropping the feed
/// cancels the subscription.
pub struct ChangeFeed {
    receiver: broadcast::Receiver<StoreEvent>,
}

impl ChangeFeed {
    pub fn new(receiver: broadcast::Receiver<StoreEvent>) -> Self {
        Self { receiver }
    }

    /// Next event in store-emission order, or `None` once the store side
    /// has shut down. A lagged subscriber skips the missed events.
    pub async fn next_event(&mut self) -> Option<StoreEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "change feed lagged, skipping missed events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn into_stream(self) -> BroadcastStream<StoreEvent> {
        BroadcastStream::new(self.receiver)
    }
}

/// Remote appointment collection. Implementations are cheaply cloneable
/// handles to one underlying connection, constructed and injected
/// explicitly rather than reached through a global.
#[async_trait]
pub trait AppointmentStore: Clone + Send + Sync + 'static {
    /// Persist a reservation. Fails with `Conflict` when the (date, slot)
    /// pair is already taken.
    async fn create(&self, request: &AppointmentRequest) -> Result<BookedAppointment, StoreError>;

    /// Slot labels already reserved on the given local date.
    async fn booked_labels(&self, date: NaiveDate) -> Result<Vec<SlotLabel>, StoreError>;

    /// Every reservation, ordered by date_time ascending.
    async fn all_appointments(&self) -> Result<Vec<BookedAppointment>, StoreError>;

    /// Remove a reservation. `NotFound` when the id does not exist;
    /// callers treat that as success.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    fn subscribe(&self) -> ChangeFeed;
}
