use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(ParticipantId);

pub const PAID_LABEL: &str = "Sudah Bayar";
pub const UNPAID_LABEL: &str = "Belum Bayar";
pub const PRESENT_LABEL: &str = "Hadir";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "Sudah Bayar")]
    Paid,
    #[serde(rename = "Belum Bayar")]
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => PAID_LABEL,
            PaymentStatus::Unpaid => UNPAID_LABEL,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Attendance as reported by the service. Anything other than `"Hadir"` is
/// kept verbatim so it round-trips to the wire unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttendanceStatus {
    Present,
    Other(String),
}

impl AttendanceStatus {
    pub fn is_present(&self) -> bool {
        matches!(self, AttendanceStatus::Present)
    }

    pub fn as_str(&self) -> &str {
        match self {
            AttendanceStatus::Present => PRESENT_LABEL,
            AttendanceStatus::Other(label) => label,
        }
    }
}

impl From<String> for AttendanceStatus {
    fn from(value: String) -> Self {
        if value == PRESENT_LABEL {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Other(value)
        }
    }
}

impl From<&str> for AttendanceStatus {
    fn from(value: &str) -> Self {
        AttendanceStatus::from(value.to_string())
    }
}

impl From<AttendanceStatus> for String {
    fn from(value: AttendanceStatus) -> Self {
        match value {
            AttendanceStatus::Present => PRESENT_LABEL.to_string(),
            AttendanceStatus::Other(label) => label,
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(rename = "status_pembayaran")]
    pub payment_status: PaymentStatus,
    #[serde(rename = "status_hadir")]
    pub attendance_status: AttendanceStatus,
}

impl Participant {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        payment_status: PaymentStatus,
        attendance_status: impl Into<AttendanceStatus>,
    ) -> Self {
        Self {
            id: ParticipantId::new(id),
            name: name.into(),
            payment_status,
            attendance_status: attendance_status.into(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    pub fn is_present(&self) -> bool {
        self.attendance_status.is_present()
    }
}
