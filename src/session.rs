use crate::availability::{resolve, DayAvailability};
use crate::error::StoreError;
use crate::slots::SlotLabel;
use crate::store::AppointmentStore;
use crate::types::{AppointmentRequest, BookedAppointment};
use chrono::NaiveDate;

/// Where a booking attempt currently stands. `Submitting` is transient
/// inside [`BookingSession::submit`]; a failed submit lands back in
/// `SlotChosen` with the user's selections intact.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    DateChosen {
        date: NaiveDate,
        availability: DayAvailability,
    },
    SlotChosen {
        date: NaiveDate,
        availability: DayAvailability,
        slot: SlotLabel,
    },
    Confirmed(BookedAppointment),
}

/// Orchestrates one booking flow: date, then slot, then contact details,
/// then the single store create call.
pub struct BookingSession<S: AppointmentStore> {
    store: S,
    state: SessionState,
}

impl<S: AppointmentStore> BookingSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Select a date and refresh its availability from the store. Any
    /// previously chosen slot is cleared, since availability is
    /// date-scoped. Rejected while a booking is confirmed; `reset` is the
    /// only way out of `Confirmed`.
    pub async fn choose_date(&mut self, date: NaiveDate) -> Result<DayAvailability, StoreError> {
        if matches!(self.state, SessionState::Confirmed(_)) {
            return Err(StoreError::Validation(
                "Booking already confirmed, reset the session first".into(),
            ));
        }

        let booked = self.store.booked_labels(date).await?;
        let availability = resolve(date, &booked);
        self.state = SessionState::DateChosen {
            date,
            availability: availability.clone(),
        };
        Ok(availability)
    }

    /// Select a slot from the current available set. A label outside that
    /// set (stale UI) is a no-op; returns whether the slot was taken over.
    pub fn choose_slot(&mut self, slot: &SlotLabel) -> bool {
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        let (next, selected) = match state {
            SessionState::DateChosen { date, availability }
                if availability.slots().contains(slot) =>
            {
                (
                    SessionState::SlotChosen {
                        date,
                        availability,
                        slot: slot.clone(),
                    },
                    true,
                )
            }
            SessionState::SlotChosen {
                date,
                availability,
                slot: current,
            } => {
                if availability.slots().contains(slot) {
                    (
                        SessionState::SlotChosen {
                            date,
                            availability,
                            slot: slot.clone(),
                        },
                        true,
                    )
                } else {
                    (
                        SessionState::SlotChosen {
                            date,
                            availability,
                            slot: current,
                        },
                        false,
                    )
                }
            }
            other => (other, false),
        };
        self.state = next;
        selected
    }

    /// Submit contact details and create the reservation. Empty name or
    /// phone (after trimming) fails locally without a store call. A store
    /// failure leaves the session in `SlotChosen` for a retry.
    pub async fn submit(
        &mut self,
        name: &str,
        phone: &str,
        notes: Option<String>,
    ) -> Result<BookedAppointment, StoreError> {
        let (date, slot) = match &self.state {
            SessionState::SlotChosen { date, slot, .. } => (*date, slot.clone()),
            _ => return Err(StoreError::Validation("No slot selected".into())),
        };

        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() || phone.is_empty() {
            return Err(StoreError::Validation(
                "Name and phone number are required".into(),
            ));
        }

        let request = AppointmentRequest {
            date,
            slot_label: slot,
            customer_name: name.to_string(),
            customer_phone: phone.to_string(),
            notes: notes.filter(|notes| !notes.trim().is_empty()),
        };
        if request.start_date_time().is_none() {
            return Err(StoreError::Validation(format!(
                "Unparseable slot label: {}",
                request.slot_label
            )));
        }

        let appointment = self.store.create(&request).await?;
        self.state = SessionState::Confirmed(appointment.clone());
        Ok(appointment)
    }

    /// Clear all selections. The only way out of `Confirmed`.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }
}
