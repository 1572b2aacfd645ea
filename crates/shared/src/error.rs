use thiserror::Error;

use crate::domain::ParticipantId;

/// Shape problems found while turning a service response into a roster.
/// Any of these rejects the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("roster payload is not a list")]
    NotAList,
    #[error("malformed participant at index {index}: {message}")]
    MalformedRow { index: usize, message: String },
    #[error("duplicate participant id {0}")]
    DuplicateId(ParticipantId),
}
