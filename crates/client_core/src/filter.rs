//! Derives the displayed roster from the full roster and the active filters.

use shared::domain::{AttendanceStatus, Participant, PaymentStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub payment: Option<PaymentStatus>,
    pub attendance: Option<AttendanceStatus>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.payment.is_none() && self.attendance.is_none()
    }
}

/// Stable filter over `roster`; both selections must hold for a row to stay.
pub fn project<'a>(
    roster: &'a [Participant],
    payment: Option<PaymentStatus>,
    attendance: Option<&AttendanceStatus>,
) -> Vec<&'a Participant> {
    roster
        .iter()
        .filter(|row| payment.map_or(true, |status| row.payment_status == status))
        .filter(|row| attendance.map_or(true, |status| &row.attendance_status == status))
        .collect()
}

pub fn project_selection<'a>(
    roster: &'a [Participant],
    selection: &FilterSelection,
) -> Vec<&'a Participant> {
    project(roster, selection.payment, selection.attendance.as_ref())
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
