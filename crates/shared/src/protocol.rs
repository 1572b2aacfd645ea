use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{Participant, ParticipantId, PaymentStatus},
    error::RosterError,
};

pub const ROSTER_PATH: &str = "data/peserta";
pub const CONFIRM_PATH: &str = "confirm/peserta";
pub const PAYMENT_UPDATE_PATH: &str = "update/pembayaran";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmAttendanceRequest {
    pub id: ParticipantId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePaymentRequest {
    pub id: ParticipantId,
    #[serde(rename = "status_pembayaran")]
    pub payment_status: PaymentStatus,
}

/// Decodes a `GET /data/peserta` body. The first row that does not carry the
/// expected fields fails the entire roster.
pub fn decode_roster(value: Value) -> Result<Vec<Participant>, RosterError> {
    let Value::Array(items) = value else {
        return Err(RosterError::NotAList);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Participant>(item).map_err(|err| {
                RosterError::MalformedRow {
                    index,
                    message: err.to_string(),
                }
            })
        })
        .collect()
}

/// Reads a participant echoed back by `POST /confirm/peserta`, if the body is
/// one. Acknowledgements without a row yield `None`.
pub fn decode_confirmed_row(body: &str) -> Option<Participant> {
    let value: Value = serde_json::from_str(body).ok()?;
    let Value::Object(mut map) = value else {
        return None;
    };
    if map.contains_key("id") {
        return serde_json::from_value(Value::Object(map)).ok();
    }
    map.remove("data")
        .and_then(|inner| serde_json::from_value(inner).ok())
}
