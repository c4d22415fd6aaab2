//! Report data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ads::models::AdvertisementId;
use crate::auth::models::UserId;

/// Report ID type
pub type ReportId = i64;

/// A complaint filed against an advertisement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub advertisement_id: AdvertisementId,
    pub user_id: UserId,
    pub reason: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for filing a report. The reporter is always the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
    pub advertisement_id: AdvertisementId,
    pub reason: String,
}
