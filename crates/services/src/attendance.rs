//! Attendance operations: one record per (classroom, account, date), holding
//! the append-only session log and the accumulated duration derived from it.

use aula_db::models::{Activity, AttendanceRecord};
use bson::{DateTime, oid::ObjectId};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::locks::LockArena;
use crate::session_log::{self, SessionLogError};
use crate::store::AttendanceStore;

impl From<SessionLogError> for CoreError {
    fn from(err: SessionLogError) -> Self {
        match err {
            SessionLogError::InvalidTransition => CoreError::InvalidTransition,
            SessionLogError::NoOpenSession => CoreError::NoOpenSession,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub classroom_id: ObjectId,
    pub account_id: String,
    pub date: String,
}

/// Partial update; `None` leaves the field untouched. `Some(false)` and
/// `Some(0)` are real assignments.
#[derive(Debug, Clone, Default)]
pub struct AttendanceUpdate {
    pub present: Option<bool>,
    pub duration: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct MarkUpdate {
    pub id: ObjectId,
    pub present: bool,
}

/// Outcome of a batch mark. The batch itself always completes; per-record
/// failures are reported here instead of aborting the rest.
#[derive(Debug, Clone, Serialize, Default)]
pub struct BatchReport {
    pub updated: usize,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub id: String,
    pub error: String,
}

pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
    locks: LockArena,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        Self {
            store,
            locks: LockArena::new(),
        }
    }

    /// Returns the record for the triple, creating it on first request.
    pub async fn create(&self, new: NewAttendance) -> CoreResult<AttendanceRecord> {
        if new.account_id.trim().is_empty() {
            return Err(CoreError::InvalidInput("Account id is required".into()));
        }
        if new.date.trim().is_empty() {
            return Err(CoreError::InvalidInput("Date is required".into()));
        }

        if let Some(existing) = self
            .store
            .find_by_triple(new.classroom_id, &new.account_id, &new.date)
            .await?
        {
            return Ok(existing);
        }

        let now = DateTime::now();
        let mut record = AttendanceRecord {
            id: None,
            classroom_id: new.classroom_id,
            account_id: new.account_id,
            date: new.date,
            present: false,
            duration: 0,
            session: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let id = self.store.insert(&record).await?;
        record.id = Some(id);
        Ok(record)
    }

    /// Appends one JOIN/LEAVE event to the record's session log. The event
    /// time is stamped server-side; a LEAVE credits the elapsed time since
    /// the matching JOIN to `duration`. Rejections leave the record
    /// untouched.
    pub async fn append_event(
        &self,
        attendance_id: ObjectId,
        activity: Activity,
    ) -> CoreResult<AttendanceRecord> {
        let _guard = self.locks.lock(attendance_id).await;

        let mut record = self
            .store
            .find_by_id(attendance_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        let now = DateTime::now();
        let (event, delta) = session_log::append(&record.session, activity, now)?;
        record.session.push(event);
        record.duration += delta;
        record.updated_at = now;

        self.store.save(&record).await?;
        Ok(record)
    }

    /// Partial-field merge of `present` / `duration`.
    pub async fn update_fields(
        &self,
        attendance_id: ObjectId,
        update: AttendanceUpdate,
    ) -> CoreResult<AttendanceRecord> {
        let _guard = self.locks.lock(attendance_id).await;

        let mut record = self
            .store
            .find_by_id(attendance_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        if let Some(present) = update.present {
            record.present = present;
        }
        if let Some(duration) = update.duration {
            record.duration = duration;
        }
        record.updated_at = DateTime::now();

        self.store.save(&record).await?;
        Ok(record)
    }

    /// Applies the presence flags concurrently, one independent update per
    /// record. A failing record is reported and skipped; the rest proceed.
    pub async fn mark_batch(&self, updates: Vec<MarkUpdate>) -> BatchReport {
        let results = futures::future::join_all(updates.into_iter().map(|mark| async move {
            let outcome = self
                .update_fields(
                    mark.id,
                    AttendanceUpdate {
                        present: Some(mark.present),
                        duration: None,
                    },
                )
                .await;
            (mark.id, outcome)
        }))
        .await;

        let mut report = BatchReport::default();
        for (id, outcome) in results {
            match outcome {
                Ok(_) => report.updated += 1,
                Err(err) => {
                    warn!(attendance_id = %id, error = %err, "Batch mark failed for record");
                    report.failures.push(BatchFailure {
                        id: id.to_hex(),
                        error: err.to_string(),
                    });
                }
            }
        }
        report
    }

    pub async fn get(&self, attendance_id: ObjectId) -> CoreResult<AttendanceRecord> {
        self.store
            .find_by_id(attendance_id)
            .await?
            .ok_or(CoreError::NotFound)
    }

    pub async fn get_by_triple(
        &self,
        classroom_id: ObjectId,
        account_id: &str,
        date: &str,
    ) -> CoreResult<AttendanceRecord> {
        self.store
            .find_by_triple(classroom_id, account_id, date)
            .await?
            .ok_or(CoreError::NotFound)
    }

    pub async fn list_by_classroom(
        &self,
        classroom_id: ObjectId,
    ) -> CoreResult<Vec<AttendanceRecord>> {
        Ok(self.store.list_by_classroom(classroom_id).await?)
    }

    pub async fn list_by_classroom_and_date(
        &self,
        classroom_id: ObjectId,
        date: &str,
    ) -> CoreResult<Vec<AttendanceRecord>> {
        Ok(self
            .store
            .list_by_classroom_and_date(classroom_id, date)
            .await?)
    }
}
