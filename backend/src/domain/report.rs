//! User reports about venues or other users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::validation::{FieldError, bounded_text};
use crate::domain::{ReportId, UserId};

/// What a report is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportTargetKind {
    /// A venue listing.
    Venue,
    /// Another account.
    User,
}

impl ReportTargetKind {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Venue => "venue",
            Self::User => "user",
        }
    }
}

impl std::str::FromStr for ReportTargetKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "venue" => Ok(Self::Venue),
            "user" => Ok(Self::User),
            _ => Err(FieldError::new(
                "targetKind",
                "invalid_target_kind",
                "targetKind must be venue or user",
            )),
        }
    }
}

/// Category of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    /// Offensive text or photos.
    InappropriateContent,
    /// Listing that does not exist.
    FakeListing,
    /// Unsafe facility.
    SafetyConcern,
    /// Abusive behaviour.
    Harassment,
    /// Anything else.
    Other,
}

impl ReportReason {
    const ALL: [Self; 5] = [
        Self::InappropriateContent,
        Self::FakeListing,
        Self::SafetyConcern,
        Self::Harassment,
        Self::Other,
    ];

    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InappropriateContent => "inappropriate_content",
            Self::FakeListing => "fake_listing",
            Self::SafetyConcern => "safety_concern",
            Self::Harassment => "harassment",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for ReportReason {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|reason| reason.as_str() == normalised)
            .ok_or_else(|| FieldError::new("reason", "invalid_reason", "reason is not supported"))
    }
}

/// Moderation state of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Waiting for an admin.
    Open,
    /// Acted upon.
    Resolved,
    /// Closed without action.
    Dismissed,
}

impl ReportStatus {
    /// Every state, in dashboard order.
    pub const ALL: [Self; 3] = [Self::Open, Self::Resolved, Self::Dismissed];

    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "resolved" => Ok(Self::Resolved),
            "dismissed" => Ok(Self::Dismissed),
            _ => Err(FieldError::new(
                "status",
                "invalid_status",
                "status must be open, resolved or dismissed",
            )),
        }
    }
}

/// Stored report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Identifier.
    pub id: ReportId,
    /// Reporting account.
    pub reporter_id: UserId,
    /// Target type.
    pub target_kind: ReportTargetKind,
    /// Venue or user id.
    pub target_id: Uuid,
    /// Category.
    pub reason: ReportReason,
    /// Reporter's explanation.
    pub description: String,
    /// Moderation state.
    pub status: ReportStatus,
    /// Admin note on closing.
    pub resolution_note: Option<String>,
    /// Admin who closed it.
    pub resolved_by: Option<UserId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Closing time.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Validate a description (10..=1000 characters).
    ///
    /// # Errors
    /// Returns a [`FieldError`] for `description`.
    pub fn validate_description(raw: &str) -> Result<String, FieldError> {
        bounded_text("description", raw, 10, 1000)
    }

    /// Close an open report.
    ///
    /// # Errors
    /// Returns `invalid_status` when `outcome` is [`ReportStatus::Open`].
    pub fn close(
        &mut self,
        outcome: ReportStatus,
        note: Option<String>,
        admin: UserId,
        now: DateTime<Utc>,
    ) -> Result<(), FieldError> {
        if outcome == ReportStatus::Open {
            return Err(FieldError::new(
                "status",
                "invalid_status",
                "status must be resolved or dismissed",
            ));
        }
        self.status = outcome;
        self.resolution_note = note;
        self.resolved_by = Some(admin);
        self.resolved_at = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn parses_reasons() {
        assert_eq!(
            "Fake_Listing".parse::<ReportReason>().expect("known"),
            ReportReason::FakeListing
        );
        assert!("spam".parse::<ReportReason>().is_err());
    }

    #[rstest]
    #[case("too short", false)]
    #[case("long enough text", true)]
    fn description_bounds(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(Report::validate_description(raw).is_ok(), ok);
    }

    #[rstest]
    fn closing_records_admin() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).single().expect("time");
        let admin = UserId::random();
        let mut report = Report {
            id: ReportId::random(),
            reporter_id: UserId::random(),
            target_kind: ReportTargetKind::Venue,
            target_id: Uuid::new_v4(),
            reason: ReportReason::Other,
            description: "Courts were flooded".into(),
            status: ReportStatus::Open,
            resolution_note: None,
            resolved_by: None,
            created_at: now,
            resolved_at: None,
        };
        assert!(report.close(ReportStatus::Open, None, admin, now).is_err());
        report
            .close(ReportStatus::Dismissed, Some("duplicate".into()), admin, now)
            .expect("close");
        assert_eq!(report.status, ReportStatus::Dismissed);
        assert_eq!(report.resolved_by, Some(admin));
    }
}
