use crate::slots::{slots_for_date, SlotLabel};
use chrono::NaiveDate;

/// Bookable subset of a date's slot catalog.
///
/// `Closed` (the weekday has no slots at all) is distinct from `Full`
/// (slots exist but every one is taken) so callers can render different
/// messaging for the two.
#[derive(Debug, Clone, PartialEq)]
pub enum DayAvailability {
    Closed,
    Full,
    Open(Vec<SlotLabel>),
}

impl DayAvailability {
    pub fn status(&self) -> &'static str {
        match self {
            DayAvailability::Closed => "closed",
            DayAvailability::Full => "full",
            DayAvailability::Open(_) => "open",
        }
    }

    pub fn slots(&self) -> &[SlotLabel] {
        match self {
            DayAvailability::Open(slots) => slots,
            _ => &[],
        }
    }
}

/// Catalog slots for `date` minus the already-booked labels, in catalog
/// order. Pure given its two inputs.
pub fn resolve(date: NaiveDate, booked: &[SlotLabel]) -> DayAvailability {
    let potential = slots_for_date(date);
    if potential.is_empty() {
        return DayAvailability::Closed;
    }

    let open: Vec<SlotLabel> = potential
        .into_iter()
        .filter(|slot| !booked.contains(slot))
        .collect();

    if open.is_empty() {
        DayAvailability::Full
    } else {
        DayAvailability::Open(open)
    }
}
