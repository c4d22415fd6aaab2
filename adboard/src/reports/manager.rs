//! Report management: filing complaints and the staff review queue.

use std::sync::Arc;

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;

use crate::auth::models::Identity;
use crate::policy::{self, ReportScope};

use super::errors::{ReportError, ReportResult};
use super::models::{NewReport, Report, ReportId};

/// Manages reports filed against advertisements.
pub struct ReportManager {
    pool: Arc<PgPool>,
}

impl ReportManager {
    /// Create a new report manager backed by the given pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// File a report against an advertisement. The caller is recorded as
    /// the reporter and the report starts unread.
    ///
    /// # Errors
    /// Returns `Validation` for an empty reason and
    /// `AdvertisementNotFound` for an unknown advertisement.
    pub async fn create(&self, identity: &Identity, new_report: NewReport) -> ReportResult<Report> {
        if new_report.reason.trim().is_empty() {
            return Err(ReportError::Validation(
                "Reason must not be empty".to_string(),
            ));
        }

        sqlx::query("SELECT 1 FROM advertisements WHERE id = $1")
            .bind(new_report.advertisement_id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(ReportError::AdvertisementNotFound(
                new_report.advertisement_id,
            ))?;

        let row = sqlx::query(
            "INSERT INTO reports (advertisement_id, user_id, reason)
             VALUES ($1, $2, $3)
             RETURNING id, advertisement_id, user_id, reason, is_read, created_at",
        )
        .bind(new_report.advertisement_id)
        .bind(identity.user_id)
        .bind(&new_report.reason)
        .fetch_one(self.pool.as_ref())
        .await?;

        info!(
            advertisement_id = new_report.advertisement_id,
            reporter = %identity.username,
            "Report filed"
        );
        Ok(report_from_row(&row))
    }

    /// List reports visible to the caller, newest first. Staff see every
    /// report; everyone else sees only the reports they filed.
    pub async fn list(&self, identity: &Identity) -> ReportResult<Vec<Report>> {
        let rows = match policy::report_scope(identity) {
            ReportScope::All => {
                sqlx::query(
                    "SELECT id, advertisement_id, user_id, reason, is_read, created_at
                     FROM reports
                     ORDER BY created_at DESC",
                )
                .fetch_all(self.pool.as_ref())
                .await?
            }
            ReportScope::Own(user_id) => {
                sqlx::query(
                    "SELECT id, advertisement_id, user_id, reason, is_read, created_at
                     FROM reports
                     WHERE user_id = $1
                     ORDER BY created_at DESC",
                )
                .bind(user_id)
                .fetch_all(self.pool.as_ref())
                .await?
            }
        };

        Ok(rows.iter().map(report_from_row).collect())
    }

    /// Set a report's is-read flag. Staff only.
    ///
    /// # Errors
    /// Returns `Forbidden` for non-staff callers and `ReportNotFound`
    /// for an unknown report.
    pub async fn set_read(
        &self,
        identity: &Identity,
        report_id: ReportId,
        is_read: bool,
    ) -> ReportResult<Report> {
        if !policy::can_mark_report_read(identity).is_allowed() {
            return Err(ReportError::Forbidden);
        }

        let row = sqlx::query(
            "UPDATE reports SET is_read = $2
             WHERE id = $1
             RETURNING id, advertisement_id, user_id, reason, is_read, created_at",
        )
        .bind(report_id)
        .bind(is_read)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(ReportError::ReportNotFound(report_id))?;

        info!(report_id, reviewer = %identity.username, is_read, "Report flag updated");
        Ok(report_from_row(&row))
    }
}

fn report_from_row(row: &PgRow) -> Report {
    Report {
        id: row.get("id"),
        advertisement_id: row.get("advertisement_id"),
        user_id: row.get("user_id"),
        reason: row.get("reason"),
        is_read: row.get("is_read"),
        created_at: row.get("created_at"),
    }
}
