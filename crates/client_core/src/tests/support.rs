use std::sync::{Arc, Mutex as StdMutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::domain::{Participant, ParticipantId, PaymentStatus};
use tokio::sync::Notify;

use crate::service::{ConfirmAck, ParticipantService};

pub(crate) fn paid_absent(id: &str, name: &str) -> Participant {
    Participant::new(id, name, PaymentStatus::Paid, "Belum Hadir")
}

pub(crate) fn paid_present(id: &str, name: &str) -> Participant {
    Participant::new(id, name, PaymentStatus::Paid, "Hadir")
}

pub(crate) fn unpaid_absent(id: &str, name: &str) -> Participant {
    Participant::new(id, name, PaymentStatus::Unpaid, "Belum Hadir")
}

/// In-memory participant service with scripted replies.
pub(crate) struct StubService {
    roster: StdMutex<Result<Vec<Participant>, String>>,
    confirm_reply: StdMutex<Result<ConfirmAck, String>>,
    payment_failure: Option<String>,
    gate: Option<Arc<Notify>>,
    payment_gate: Option<Arc<Notify>>,
    pub(crate) confirm_started: Arc<Notify>,
    pub(crate) payment_started: Arc<Notify>,
    pub(crate) confirm_calls: StdMutex<Vec<ParticipantId>>,
    pub(crate) payment_calls: StdMutex<Vec<(ParticipantId, PaymentStatus)>>,
}

impl StubService {
    pub(crate) fn with_roster(roster: Vec<Participant>) -> Self {
        Self {
            roster: StdMutex::new(Ok(roster)),
            confirm_reply: StdMutex::new(Ok(ConfirmAck::Acknowledged)),
            payment_failure: None,
            gate: None,
            payment_gate: None,
            confirm_started: Arc::new(Notify::new()),
            payment_started: Arc::new(Notify::new()),
            confirm_calls: StdMutex::new(Vec::new()),
            payment_calls: StdMutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_fetch(err: impl Into<String>) -> Self {
        let service = Self::with_roster(Vec::new());
        *service.roster.lock().expect("lock") = Err(err.into());
        service
    }

    pub(crate) fn confirm_replies(self, reply: Result<ConfirmAck, String>) -> Self {
        *self.confirm_reply.lock().expect("lock") = reply;
        self
    }

    pub(crate) fn failing_payment(mut self, err: impl Into<String>) -> Self {
        self.payment_failure = Some(err.into());
        self
    }

    /// Confirmations block until the returned gate is notified.
    pub(crate) fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Payment updates block until the returned gate is notified.
    pub(crate) fn gated_payments(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.payment_gate = Some(gate.clone());
        (self, gate)
    }

    pub(crate) fn set_roster(&self, roster: Vec<Participant>) {
        *self.roster.lock().expect("lock") = Ok(roster);
    }

    pub(crate) fn confirm_call_count(&self) -> usize {
        self.confirm_calls.lock().expect("lock").len()
    }
}

#[async_trait]
impl ParticipantService for StubService {
    async fn fetch_roster(&self) -> Result<Vec<Participant>> {
        self.roster
            .lock()
            .expect("lock")
            .clone()
            .map_err(|err| anyhow!(err))
    }

    async fn confirm_attendance(&self, id: &ParticipantId) -> Result<ConfirmAck> {
        self.confirm_calls.lock().expect("lock").push(id.clone());
        self.confirm_started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.confirm_reply
            .lock()
            .expect("lock")
            .clone()
            .map_err(|err| anyhow!(err))
    }

    async fn update_payment(&self, id: &ParticipantId, status: PaymentStatus) -> Result<()> {
        self.payment_calls
            .lock()
            .expect("lock")
            .push((id.clone(), status));
        self.payment_started.notify_one();
        if let Some(gate) = &self.payment_gate {
            gate.notified().await;
        }
        match &self.payment_failure {
            Some(err) => Err(anyhow!(err.clone())),
            None => Ok(()),
        }
    }
}
