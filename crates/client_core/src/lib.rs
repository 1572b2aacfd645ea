use std::sync::Arc;

use anyhow::Result;
use shared::domain::{Participant, ParticipantId, PaymentStatus};
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info};

pub mod actions;
pub mod filter;
pub mod report;
pub mod service;
pub mod store;

pub use actions::{ConfirmOutcome, ConfirmRejection, PaymentOutcome, PaymentSync, RowActions};
pub use filter::{project, FilterSelection};
pub use report::{build_summary, ReportScope, SummaryDocument, SummaryRow};
pub use service::{ConfirmAck, HttpParticipantService, ParticipantService};
pub use store::{FilterChange, RosterStore};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Notifications for whoever renders the roster; each one means the visible
/// rows may have changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterEvent {
    Loaded {
        rows: usize,
    },
    LoadFailed(String),
    RowUpdated(ParticipantId),
    FiltersChanged,
    ConfirmFailed {
        participant_id: ParticipantId,
        message: String,
    },
    PaymentSyncFailed {
        participant_id: ParticipantId,
        message: String,
    },
}

/// One open roster view. Dropping it discards the roster; row actions still
/// in flight settle as no-ops.
pub struct RosterView {
    store: Arc<Mutex<RosterStore>>,
    service: Arc<dyn ParticipantService>,
    actions: RowActions,
    events: broadcast::Sender<RosterEvent>,
}

impl RosterView {
    pub fn new(service: Arc<dyn ParticipantService>, payment_sync: PaymentSync) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let store = Arc::new(Mutex::new(RosterStore::new()));
        let actions = RowActions::new(
            Arc::downgrade(&store),
            service.clone(),
            payment_sync,
            events.clone(),
        );
        Self {
            store,
            service,
            actions,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RosterEvent> {
        self.events.subscribe()
    }

    /// Handle for issuing row actions from elsewhere (a UI task, a worker).
    pub fn actions(&self) -> RowActions {
        self.actions.clone()
    }

    /// Fetches the roster and replaces the local copy. On any failure the
    /// current roster is kept.
    pub async fn load(&self) -> Result<usize> {
        let fetched = match self.service.fetch_roster().await {
            Ok(roster) => self
                .store
                .lock()
                .await
                .load(roster)
                .map_err(anyhow::Error::from),
            Err(err) => Err(err),
        };

        match fetched {
            Ok(rows) => {
                info!(rows, "roster loaded");
                let _ = self.events.send(RosterEvent::Loaded { rows });
                Ok(rows)
            }
            Err(err) => {
                error!("failed to load roster: {err:#}");
                let _ = self.events.send(RosterEvent::LoadFailed(format!("{err:#}")));
                Err(err)
            }
        }
    }

    pub async fn toggle_payment(&self, id: &ParticipantId, status: PaymentStatus) -> PaymentOutcome {
        self.actions.toggle_payment(id, status).await
    }

    pub async fn confirm_attendance(&self, id: &ParticipantId) -> ConfirmOutcome {
        self.actions.confirm_attendance(id).await
    }

    pub async fn set_filter(&self, change: FilterChange) -> FilterSelection {
        let selection = {
            let mut guard = self.store.lock().await;
            guard.set_filter(change);
            guard.filters().clone()
        };
        let _ = self.events.send(RosterEvent::FiltersChanged);
        selection
    }

    pub async fn filters(&self) -> FilterSelection {
        self.store.lock().await.filters().clone()
    }

    pub async fn roster(&self) -> Vec<Participant> {
        self.store.lock().await.participants().to_vec()
    }

    pub async fn filtered(&self) -> Vec<Participant> {
        self.store
            .lock()
            .await
            .filtered()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn participant(&self, id: &ParticipantId) -> Option<Participant> {
        self.store.lock().await.get(id).cloned()
    }

    pub async fn can_confirm(&self, id: &ParticipantId) -> bool {
        self.store.lock().await.can_confirm(id)
    }

    pub async fn is_tentative(&self, id: &ParticipantId) -> bool {
        self.store.lock().await.is_tentative(id)
    }

    pub async fn summary(&self, scope: ReportScope) -> SummaryDocument {
        let guard = self.store.lock().await;
        match scope {
            ReportScope::Filtered => build_summary(guard.filtered()),
            ReportScope::Full => build_summary(guard.participants()),
        }
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
