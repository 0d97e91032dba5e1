use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ClientError, ClientResult};

/// Behaviour shared by the status enums of every submission type
pub trait SubmissionStatus: Copy + Eq + fmt::Debug + Serialize + 'static {
    fn as_str(self) -> &'static str;

    fn label(self) -> &'static str;

    /// Statuses an admin may move a submission to from `self`
    fn targets(self) -> &'static [Self];

    fn is_rejected(self) -> bool;

    /// Whether the target accepts an optional closing note
    fn accepts_note(self) -> bool {
        false
    }

    fn is_editable(self) -> bool {
        !self.targets().is_empty()
    }

    /// Whether updates send `rejectionReason` and `closingNote` even when unset
    fn sends_every_field() -> bool {
        false
    }
}

macro_rules! status_names {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            fn wire_name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.wire_name())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(format!("unknown {} '{}'", stringify!($ty), other)),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    InReview,
    Resolved,
    Rejected,
    Cancelled,
}

status_names!(RequestStatus {
    Pending => "pending",
    InReview => "in_review",
    Resolved => "resolved",
    Rejected => "rejected",
    Cancelled => "cancelled",
});

impl SubmissionStatus for RequestStatus {
    fn as_str(self) -> &'static str {
        self.wire_name()
    }

    fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "Kutilmoqda",
            RequestStatus::InReview => "Ko'rib chiqilmoqda",
            RequestStatus::Resolved => "Yechildi",
            RequestStatus::Rejected => "Rad etildi",
            RequestStatus::Cancelled => "Bekor qilingan",
        }
    }

    // Closed once resolved or rejected
    fn targets(self) -> &'static [Self] {
        use RequestStatus::*;
        match self {
            Resolved | Rejected => &[],
            Pending => &[InReview, Resolved, Rejected],
            InReview => &[Pending, Resolved, Rejected],
            Cancelled => &[Pending, InReview, Resolved, Rejected],
        }
    }

    fn is_rejected(self) -> bool {
        self == RequestStatus::Rejected
    }

    fn accepts_note(self) -> bool {
        self == RequestStatus::Resolved
    }

    fn sends_every_field() -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceReportStatus {
    Unavailable,
    InProgress,
    PendingConfirmation,
    Confirmed,
    Rejected,
    Cancelled,
}

status_names!(ServiceReportStatus {
    Unavailable => "unavailable",
    InProgress => "in_progress",
    PendingConfirmation => "pending_confirmation",
    Confirmed => "confirmed",
    Rejected => "rejected",
    Cancelled => "cancelled",
});

impl SubmissionStatus for ServiceReportStatus {
    fn as_str(self) -> &'static str {
        self.wire_name()
    }

    fn label(self) -> &'static str {
        match self {
            ServiceReportStatus::Unavailable => "Mavjud emas",
            ServiceReportStatus::InProgress => "Jarayonda",
            ServiceReportStatus::PendingConfirmation => "Tasdiq kutilmoqda",
            ServiceReportStatus::Confirmed => "Tasdiqlandi",
            ServiceReportStatus::Rejected => "Rad etildi",
            ServiceReportStatus::Cancelled => "Bekor qilingan",
        }
    }

    // pending_confirmation waits on the citizen; the rest are final
    fn targets(self) -> &'static [Self] {
        use ServiceReportStatus::*;
        match self {
            Unavailable => &[InProgress, PendingConfirmation, Rejected],
            InProgress => &[PendingConfirmation, Rejected],
            PendingConfirmation | Confirmed | Rejected | Cancelled => &[],
        }
    }

    fn is_rejected(self) -> bool {
        self == ServiceReportStatus::Rejected
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MskOrderStatus {
    Pending,
    InReview,
    PendingConfirmation,
    Confirmed,
    Rejected,
    Cancelled,
}

status_names!(MskOrderStatus {
    Pending => "pending",
    InReview => "in_review",
    PendingConfirmation => "pending_confirmation",
    Confirmed => "confirmed",
    Rejected => "rejected",
    Cancelled => "cancelled",
});

impl SubmissionStatus for MskOrderStatus {
    fn as_str(self) -> &'static str {
        self.wire_name()
    }

    fn label(self) -> &'static str {
        match self {
            MskOrderStatus::Pending => "Kutilmoqda",
            MskOrderStatus::InReview => "Ko'rib chiqilmoqda",
            MskOrderStatus::PendingConfirmation => "Tasdiq kutilmoqda",
            MskOrderStatus::Confirmed => "Tasdiqlandi",
            MskOrderStatus::Rejected => "Rad etildi",
            MskOrderStatus::Cancelled => "Bekor qilingan",
        }
    }

    fn targets(self) -> &'static [Self] {
        use MskOrderStatus::*;
        match self {
            Pending => &[InReview, PendingConfirmation, Rejected],
            InReview => &[PendingConfirmation, Rejected],
            PendingConfirmation | Confirmed | Rejected | Cancelled => &[],
        }
    }

    fn is_rejected(self) -> bool {
        self == MskOrderStatus::Rejected
    }
}

/// Validated body for `PUT .../:id/status`
///
/// Requests always carry both text keys, `null` when unset; the other
/// modules only send the ones that apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate<S> {
    status: S,
    rejection_reason: Option<String>,
    closing_note: Option<String>,
}

impl<S: SubmissionStatus> Serialize for StatusUpdate<S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        let every = S::sends_every_field();
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("status", &self.status)?;
        if every || self.rejection_reason.is_some() {
            map.serialize_entry("rejectionReason", &self.rejection_reason)?;
        }
        if every || self.closing_note.is_some() {
            map.serialize_entry("closingNote", &self.closing_note)?;
        }
        map.end()
    }
}

impl<S: SubmissionStatus> StatusUpdate<S> {
    pub fn status(&self) -> S {
        self.status
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn closing_note(&self) -> Option<&str> {
        self.closing_note.as_deref()
    }

    /// Check a transition from `current` to `target`.
    ///
    /// Rejections need a non-blank reason; the reason and note are trimmed
    /// and only kept where the target status uses them.
    pub fn validate(current: S, target: S, reason: Option<&str>, note: Option<&str>) -> ClientResult<Self> {
        if current == target {
            return Err(ClientError::field("status", "Status is unchanged"));
        }
        if !current.targets().contains(&target) {
            return Err(ClientError::field(
                "status",
                format!("Cannot change status from {} to {}", current.as_str(), target.as_str()),
            ));
        }

        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        let rejection_reason = if target.is_rejected() {
            match reason {
                Some(r) => Some(r.to_string()),
                None => return Err(ClientError::field("rejectionReason", "Rejection reason is required")),
            }
        } else {
            None
        };

        let closing_note = if target.accepts_note() {
            note.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string)
        } else {
            None
        };

        Ok(Self {
            status: target,
            rejection_reason,
            closing_note,
        })
    }
}
