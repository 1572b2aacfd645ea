//! In-memory view state: the roster, active filters, and per-row markers.

use std::collections::{HashMap, HashSet};

use shared::{
    domain::{AttendanceStatus, Participant, ParticipantId, PaymentStatus},
    error::RosterError,
};

use crate::filter::{project_selection, FilterSelection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Payment(Option<PaymentStatus>),
    Attendance(Option<AttendanceStatus>),
}

#[derive(Debug, Default)]
pub struct RosterStore {
    roster: Vec<Participant>,
    filters: FilterSelection,
    inflight_confirms: HashSet<ParticipantId>,
    tentative_confirms: HashSet<ParticipantId>,
    payment_stamps: HashMap<ParticipantId, u64>,
    payment_clock: u64,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the roster wholesale. A duplicated id rejects the input and
    /// leaves the current roster as it was. In-flight markers survive for ids
    /// still in the new roster; they are only cleared when the request settles.
    pub fn load(&mut self, initial: Vec<Participant>) -> Result<usize, RosterError> {
        {
            let mut seen = HashSet::with_capacity(initial.len());
            for participant in &initial {
                if !seen.insert(&participant.id) {
                    return Err(RosterError::DuplicateId(participant.id.clone()));
                }
            }
        }

        self.roster = initial;
        let roster = &self.roster;
        self.inflight_confirms
            .retain(|id| roster.iter().any(|row| &row.id == id));
        self.tentative_confirms.clear();
        self.payment_stamps.clear();
        Ok(self.roster.len())
    }

    pub fn participants(&self) -> &[Participant] {
        &self.roster
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.roster.iter().find(|row| &row.id == id)
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn filtered(&self) -> Vec<&Participant> {
        project_selection(&self.roster, &self.filters)
    }

    /// Returns how many rows were updated; zero means no row carries `id`.
    pub fn set_payment_status(&mut self, id: &ParticipantId, status: PaymentStatus) -> usize {
        let touched = self.update_matching(id, |row| row.payment_status = status);
        if touched > 0 {
            self.stamp_payment(id);
        }
        touched
    }

    /// Stamp of the latest payment change on `id`. Stamps never repeat, so a
    /// row toggled away and back again carries a new one.
    pub fn payment_stamp(&self, id: &ParticipantId) -> Option<u64> {
        self.payment_stamps.get(id).copied()
    }

    /// Puts `previous` back only if nothing changed the row's payment since
    /// `stamp` was taken. Returns the number of rows reverted.
    pub fn revert_payment_status(
        &mut self,
        id: &ParticipantId,
        stamp: u64,
        previous: PaymentStatus,
    ) -> usize {
        if self.payment_stamp(id) != Some(stamp) {
            return 0;
        }
        self.set_payment_status(id, previous)
    }

    pub fn set_attendance_confirmed(&mut self, id: &ParticipantId) -> usize {
        self.update_matching(id, |row| row.attendance_status = AttendanceStatus::Present)
    }

    /// Selecting the value that is already active clears that filter.
    pub fn set_filter(&mut self, change: FilterChange) {
        match change {
            FilterChange::Payment(value) => {
                self.filters.payment = toggle(self.filters.payment.take(), value);
            }
            FilterChange::Attendance(value) => {
                self.filters.attendance = toggle(self.filters.attendance.take(), value);
            }
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterSelection::default();
    }

    /// Whether the confirm action should be offered for `id` right now.
    pub fn can_confirm(&self, id: &ParticipantId) -> bool {
        !self.inflight_confirms.contains(id)
            && self
                .get(id)
                .is_some_and(|row| row.is_paid() && !row.is_present())
    }

    /// Sets the in-flight marker. Returns `false` if one was already set.
    pub fn begin_confirm(&mut self, id: &ParticipantId) -> bool {
        self.inflight_confirms.insert(id.clone())
    }

    pub fn settle_confirm(&mut self, id: &ParticipantId) {
        self.inflight_confirms.remove(id);
    }

    pub fn is_confirm_inflight(&self, id: &ParticipantId) -> bool {
        self.inflight_confirms.contains(id)
    }

    pub fn mark_tentative(&mut self, id: &ParticipantId) {
        self.tentative_confirms.insert(id.clone());
    }

    pub fn is_tentative(&self, id: &ParticipantId) -> bool {
        self.tentative_confirms.contains(id)
    }

    /// Applies a row returned by the service over the local copy. The id and
    /// name stay as loaded; only the server-owned statuses are taken.
    pub fn reconcile(&mut self, authoritative: &Participant) -> usize {
        let touched = self.update_matching(&authoritative.id, |row| {
            row.payment_status = authoritative.payment_status;
            row.attendance_status = authoritative.attendance_status.clone();
        });
        if touched > 0 {
            self.tentative_confirms.remove(&authoritative.id);
            self.stamp_payment(&authoritative.id);
        }
        touched
    }

    fn stamp_payment(&mut self, id: &ParticipantId) {
        self.payment_clock += 1;
        self.payment_stamps.insert(id.clone(), self.payment_clock);
    }

    fn update_matching(
        &mut self,
        id: &ParticipantId,
        mut apply: impl FnMut(&mut Participant),
    ) -> usize {
        let mut touched = 0;
        for row in self.roster.iter_mut().filter(|row| &row.id == id) {
            apply(row);
            touched += 1;
        }
        touched
    }
}

fn toggle<T: PartialEq>(current: Option<T>, requested: Option<T>) -> Option<T> {
    match (current, requested) {
        (Some(current), Some(requested)) if current == requested => None,
        (_, requested) => requested,
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
