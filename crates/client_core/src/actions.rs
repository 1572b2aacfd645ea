//! Row actions: user intent turned into store mutations and service calls.

use std::sync::{Arc, Weak};

use serde::Deserialize;
use shared::domain::{AttendanceStatus, ParticipantId, PaymentStatus};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::{
    service::{ConfirmAck, ParticipantService},
    store::RosterStore,
    RosterEvent,
};

/// Where a payment toggle ends up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSync {
    /// Kept in the view only; the service never hears about it.
    #[default]
    #[serde(alias = "local")]
    LocalOnly,
    /// Applied locally first, then sent to the service. Reverted if the
    /// service refuses.
    #[serde(alias = "remote")]
    RemoteSynced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfirmRejection {
    #[error("participant is not in the roster")]
    UnknownParticipant,
    #[error("participant has not paid")]
    NotPaid,
    #[error("participant is already present")]
    AlreadyPresent,
    #[error("a confirmation is already in flight")]
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// `tentative` is set when the service did not echo the row back.
    Confirmed { tentative: bool },
    /// The service answered with the row, but it is still not present. The
    /// row now shows what the service returned.
    NotRecorded(AttendanceStatus),
    Rejected(ConfirmRejection),
    Failed(String),
    /// The view went away before the response arrived.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Applied { rows: usize, synced: bool },
    Reverted(String),
    /// The sync failed, but the row changed again before the failure came
    /// back, so it was left as it is.
    Superseded(String),
    Discarded,
}

#[derive(Clone)]
pub struct RowActions {
    store: Weak<Mutex<RosterStore>>,
    service: Arc<dyn ParticipantService>,
    payment_sync: PaymentSync,
    events: broadcast::Sender<RosterEvent>,
}

impl RowActions {
    pub fn new(
        store: Weak<Mutex<RosterStore>>,
        service: Arc<dyn ParticipantService>,
        payment_sync: PaymentSync,
        events: broadcast::Sender<RosterEvent>,
    ) -> Self {
        Self {
            store,
            service,
            payment_sync,
            events,
        }
    }

    pub fn payment_sync(&self) -> PaymentSync {
        self.payment_sync
    }

    pub async fn toggle_payment(&self, id: &ParticipantId, status: PaymentStatus) -> PaymentOutcome {
        let Some(store) = self.store.upgrade() else {
            return PaymentOutcome::Discarded;
        };
        let (applied, rows) = {
            let mut guard = store.lock().await;
            let previous = guard.get(id).map(|row| row.payment_status);
            let rows = guard.set_payment_status(id, status);
            let applied = previous.zip(guard.payment_stamp(id));
            (applied, rows)
        };
        drop(store);

        let Some((previous, stamp)) = applied else {
            debug!(participant_id = %id, "payment toggle for unknown participant ignored");
            return PaymentOutcome::Applied { rows: 0, synced: false };
        };
        self.emit(RosterEvent::RowUpdated(id.clone()));

        if self.payment_sync == PaymentSync::LocalOnly {
            return PaymentOutcome::Applied { rows, synced: false };
        }

        match self.service.update_payment(id, status).await {
            Ok(()) => {
                info!(participant_id = %id, status = %status, "payment status synced");
                PaymentOutcome::Applied { rows, synced: true }
            }
            Err(err) => {
                error!(participant_id = %id, "failed to sync payment status: {err:#}");
                let Some(store) = self.store.upgrade() else {
                    return PaymentOutcome::Discarded;
                };
                let reverted = store
                    .lock()
                    .await
                    .revert_payment_status(id, stamp, previous);
                let message = format!("{err:#}");
                self.emit(RosterEvent::PaymentSyncFailed {
                    participant_id: id.clone(),
                    message: message.clone(),
                });
                if reverted == 0 {
                    warn!(participant_id = %id, "row changed while payment sync was pending; not reverting");
                    return PaymentOutcome::Superseded(message);
                }
                self.emit(RosterEvent::RowUpdated(id.clone()));
                PaymentOutcome::Reverted(message)
            }
        }
    }

    pub async fn confirm_attendance(&self, id: &ParticipantId) -> ConfirmOutcome {
        {
            let Some(store) = self.store.upgrade() else {
                return ConfirmOutcome::Discarded;
            };
            let mut guard = store.lock().await;
            if let Err(reason) = check_confirmable(&guard, id) {
                warn!(participant_id = %id, "confirm rejected: {reason}");
                return ConfirmOutcome::Rejected(reason);
            }
            guard.begin_confirm(id);
        }

        let result = self.service.confirm_attendance(id).await;

        let Some(store) = self.store.upgrade() else {
            debug!(participant_id = %id, "view dropped before confirmation settled");
            return ConfirmOutcome::Discarded;
        };
        let mut guard = store.lock().await;
        guard.settle_confirm(id);

        let outcome = match result {
            Ok(ConfirmAck::Row(row)) if &row.id == id => {
                guard.reconcile(&row);
                if row.is_present() {
                    info!(participant_id = %id, "attendance reconciled");
                    ConfirmOutcome::Confirmed { tentative: false }
                } else {
                    warn!(
                        participant_id = %id,
                        attendance = %row.attendance_status,
                        "service echoed the row without recording attendance"
                    );
                    ConfirmOutcome::NotRecorded(row.attendance_status)
                }
            }
            Ok(ack) => {
                if let ConfirmAck::Row(row) = ack {
                    warn!(
                        participant_id = %id,
                        echoed_id = %row.id,
                        "confirmation echoed a different participant; keeping optimistic state"
                    );
                }
                guard.set_attendance_confirmed(id);
                guard.mark_tentative(id);
                info!(participant_id = %id, "attendance confirmed");
                ConfirmOutcome::Confirmed { tentative: true }
            }
            Err(err) => {
                error!(participant_id = %id, "failed to confirm attendance: {err:#}");
                let message = format!("{err:#}");
                self.emit(RosterEvent::ConfirmFailed {
                    participant_id: id.clone(),
                    message: message.clone(),
                });
                return ConfirmOutcome::Failed(message);
            }
        };
        drop(guard);

        self.emit(RosterEvent::RowUpdated(id.clone()));
        outcome
    }

    fn emit(&self, event: RosterEvent) {
        let _ = self.events.send(event);
    }
}

fn check_confirmable(store: &RosterStore, id: &ParticipantId) -> Result<(), ConfirmRejection> {
    if store.is_confirm_inflight(id) {
        return Err(ConfirmRejection::InFlight);
    }
    let row = store.get(id).ok_or(ConfirmRejection::UnknownParticipant)?;
    if !row.is_paid() {
        return Err(ConfirmRejection::NotPaid);
    }
    if row.is_present() {
        return Err(ConfirmRejection::AlreadyPresent);
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/actions_tests.rs"]
mod tests;
