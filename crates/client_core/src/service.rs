//! Remote participant service: the HTTP endpoints the roster is read from and
//! confirmations are posted to.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{
    domain::{Participant, ParticipantId, PaymentStatus},
    protocol::{
        decode_confirmed_row, decode_roster, ConfirmAttendanceRequest, UpdatePaymentRequest,
        CONFIRM_PATH, PAYMENT_UPDATE_PATH, ROSTER_PATH,
    },
};
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAck {
    /// The service echoed the participant as it now stands.
    Row(Participant),
    /// Success with nothing to reconcile against.
    Acknowledged,
}

#[async_trait]
pub trait ParticipantService: Send + Sync {
    async fn fetch_roster(&self) -> Result<Vec<Participant>>;
    async fn confirm_attendance(&self, id: &ParticipantId) -> Result<ConfirmAck>;
    async fn update_payment(&self, id: &ParticipantId, status: PaymentStatus) -> Result<()>;
}

pub struct HttpParticipantService {
    http: Client,
    base_url: Url,
}

impl HttpParticipantService {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Self::with_client(base_url, http)
    }

    pub fn with_client(base_url: &str, http: Client) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("invalid service url '{base_url}'"))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("failed to build endpoint for '{path}'"))
    }
}

#[async_trait]
impl ParticipantService for HttpParticipantService {
    async fn fetch_roster(&self) -> Result<Vec<Participant>> {
        let url = self.endpoint(ROSTER_PATH)?;
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?
            .error_for_status()?;
        let body: Value = res.json().await.context("roster response is not json")?;
        let roster = decode_roster(body)?;
        debug!(rows = roster.len(), "roster fetched");
        Ok(roster)
    }

    async fn confirm_attendance(&self, id: &ParticipantId) -> Result<ConfirmAck> {
        let url = self.endpoint(CONFIRM_PATH)?;
        let res = self
            .http
            .post(url.clone())
            .json(&ConfirmAttendanceRequest { id: id.clone() })
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?
            .error_for_status()?;
        Ok(ack_from_body(id, res.text().await))
    }

    async fn update_payment(&self, id: &ParticipantId, status: PaymentStatus) -> Result<()> {
        let url = self.endpoint(PAYMENT_UPDATE_PATH)?;
        self.http
            .post(url.clone())
            .json(&UpdatePaymentRequest {
                id: id.clone(),
                payment_status: status,
            })
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?
            .error_for_status()?;
        Ok(())
    }
}

/// The status already said the confirmation went through, so an unreadable
/// body only loses the echo.
fn ack_from_body<E: std::fmt::Display>(id: &ParticipantId, body: Result<String, E>) -> ConfirmAck {
    let body = match body {
        Ok(body) => body,
        Err(err) => {
            debug!(participant_id = %id, "could not read confirmation body: {err}");
            return ConfirmAck::Acknowledged;
        }
    };
    debug!(participant_id = %id, body = %body, "attendance confirmed by service");
    match decode_confirmed_row(&body) {
        Some(row) => ConfirmAck::Row(row),
        None => ConfirmAck::Acknowledged,
    }
}
