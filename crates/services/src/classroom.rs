//! Classroom lifecycle and roster operations.
//!
//! Lifecycle: CREATED_LOCAL (no external session) -> PROVISIONED (provider
//! room exists) -> ENDED (record removed; terminal). The provider is only
//! consulted on provision and on end; a room can therefore exist provider-side
//! before local status reflects it.

use aula_db::models::{Classroom, ClassroomStatus, ScheduleSlot};
use bson::{DateTime, oid::ObjectId};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{CoreError, CoreResult};
use crate::locks::LockArena;
use crate::provider::{PROVIDER_ERROR_MESSAGES, ProviderError, ProviderParticipant, ProviderSessionStatus, SessionProvider};
use crate::roster;
use crate::store::ClassroomStore;

/// Privilege threshold for classroom create/end/update.
pub const ADMIN_PRIVILEGE: i32 = 99;

#[derive(Debug, Clone)]
pub struct NewClassroom {
    pub unique_name: String,
    pub university_id: String,
    pub creator_account_id: String,
    pub teacher_id: Option<String>,
    pub mark_attendance: Option<bool>,
    pub schedule: Vec<ScheduleSlot>,
    pub status_callback: Option<String>,
}

/// Partial update; `None` means "leave the field untouched". `Some(false)`
/// and friends are real assignments, never ignored.
#[derive(Debug, Clone, Default)]
pub struct ClassroomUpdate {
    pub unique_name: Option<String>,
    pub status: Option<ClassroomStatus>,
    pub teacher_id: Option<String>,
    pub mark_attendance: Option<bool>,
    pub weight_age: Option<f64>,
    pub schedule: Option<Vec<ScheduleSlot>>,
}

pub struct ClassroomService {
    store: Arc<dyn ClassroomStore>,
    provider: Arc<dyn SessionProvider>,
    locks: LockArena,
    error_messages: &'static [(i64, &'static str)],
}

impl ClassroomService {
    pub fn new(store: Arc<dyn ClassroomStore>, provider: Arc<dyn SessionProvider>) -> Self {
        Self::with_error_map(store, provider, PROVIDER_ERROR_MESSAGES)
    }

    pub fn with_error_map(
        store: Arc<dyn ClassroomStore>,
        provider: Arc<dyn SessionProvider>,
        error_messages: &'static [(i64, &'static str)],
    ) -> Self {
        Self {
            store,
            provider,
            locks: LockArena::new(),
            error_messages,
        }
    }

    fn provider_err(&self, err: ProviderError) -> CoreError {
        CoreError::Provider(err.with_friendly(self.error_messages))
    }

    fn require_admin(privilege: i32) -> CoreResult<()> {
        if privilege >= ADMIN_PRIVILEGE {
            Ok(())
        } else {
            Err(CoreError::Forbidden)
        }
    }

    /// Creates a classroom in CREATED_LOCAL: persisted, no provider room yet.
    pub async fn create(&self, privilege: i32, new: NewClassroom) -> CoreResult<Classroom> {
        Self::require_admin(privilege)?;

        if new.unique_name.trim().is_empty() {
            return Err(CoreError::InvalidInput("Room name is required".into()));
        }
        if new.university_id.trim().is_empty() {
            return Err(CoreError::InvalidInput("University id is required".into()));
        }
        if new.creator_account_id.trim().is_empty() {
            return Err(CoreError::InvalidInput("Account id is required".into()));
        }

        let now = DateTime::now();
        let mut classroom = Classroom {
            id: None,
            unique_name: new.unique_name,
            university_id: new.university_id,
            creator_account_id: new.creator_account_id,
            status: ClassroomStatus::Inactive,
            external_session_id: None,
            status_callback: new.status_callback,
            min_privilege: 0,
            teacher_id: new.teacher_id,
            mark_attendance: new.mark_attendance,
            schedule: new.schedule,
            weight_age: 0.0,
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let id = self.store.insert(&classroom).await?;
        classroom.id = Some(id);
        info!(classroom_id = %id, "Created classroom");
        Ok(classroom)
    }

    /// Requests a provider room for the classroom and stores the returned
    /// session id. The room name is derived from the classroom identity so
    /// two universities (or two admins) with the same room name cannot
    /// collide provider-side. On provider failure the classroom stays
    /// CREATED_LOCAL; the caller may retry.
    pub async fn provision(&self, classroom_id: ObjectId) -> CoreResult<Classroom> {
        let _guard = self.locks.lock(classroom_id).await;

        let mut classroom = self
            .store
            .find_by_id(classroom_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        // The external session id is assigned at most once.
        if classroom.external_session_id.is_some() {
            return Err(CoreError::InvalidInput(
                "Classroom already has a live session".into(),
            ));
        }

        let room_name = format!(
            "{}{}{}",
            classroom.unique_name, classroom.creator_account_id, classroom.university_id
        );
        let callback = classroom.status_callback.clone().unwrap_or_default();

        let session = self
            .provider
            .create_session(&room_name, &callback)
            .await
            .map_err(|e| self.provider_err(e))?;

        classroom.external_session_id = Some(session.id);
        classroom.updated_at = DateTime::now();
        self.store.save(&classroom).await?;
        info!(classroom_id = %classroom_id, "Provisioned classroom session");
        Ok(classroom)
    }

    /// Ends a classroom. Terminal: the record is removed and every later
    /// operation against the id answers NotFound.
    ///
    /// When a provider session exists its status is checked first; a session
    /// the provider already reports completed is not asked to complete again.
    /// A provider failure leaves the classroom PROVISIONED so the caller can
    /// retry the whole end().
    pub async fn end(&self, privilege: i32, classroom_id: ObjectId) -> CoreResult<()> {
        Self::require_admin(privilege)?;

        let _guard = self.locks.lock(classroom_id).await;

        let classroom = self
            .store
            .find_by_id(classroom_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        if let Some(session_id) = &classroom.external_session_id {
            let status = self
                .provider
                .get_session_status(session_id)
                .await
                .map_err(|e| self.provider_err(e))?;

            if status != ProviderSessionStatus::Completed {
                self.provider
                    .complete_session(session_id)
                    .await
                    .map_err(|e| self.provider_err(e))?;
            }
        }

        if !self.store.delete(classroom_id).await? {
            return Err(CoreError::NotFound);
        }
        drop(_guard);
        self.locks.forget(&classroom_id);
        info!(classroom_id = %classroom_id, "Ended classroom");
        Ok(())
    }

    pub async fn get(&self, classroom_id: ObjectId) -> CoreResult<Classroom> {
        self.store
            .find_by_id(classroom_id)
            .await?
            .ok_or(CoreError::NotFound)
    }

    pub async fn list_by_university(&self, university_id: &str) -> CoreResult<Vec<Classroom>> {
        Ok(self.store.list_by_university(university_id).await?)
    }

    pub async fn list_by_creator(
        &self,
        creator_account_id: &str,
        university_id: &str,
    ) -> CoreResult<Vec<Classroom>> {
        Ok(self
            .store
            .list_by_creator(creator_account_id, university_id)
            .await?)
    }

    pub async fn update(
        &self,
        privilege: i32,
        classroom_id: ObjectId,
        update: ClassroomUpdate,
    ) -> CoreResult<Classroom> {
        Self::require_admin(privilege)?;

        let _guard = self.locks.lock(classroom_id).await;

        let mut classroom = self
            .store
            .find_by_id(classroom_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        if let Some(unique_name) = update.unique_name {
            classroom.unique_name = unique_name;
        }
        if let Some(status) = update.status {
            classroom.status = status;
        }
        if let Some(teacher_id) = update.teacher_id {
            classroom.teacher_id = Some(teacher_id);
        }
        if let Some(mark_attendance) = update.mark_attendance {
            classroom.mark_attendance = Some(mark_attendance);
        }
        if let Some(weight_age) = update.weight_age {
            classroom.weight_age = weight_age;
        }
        if let Some(schedule) = update.schedule {
            classroom.schedule = schedule;
        }
        classroom.updated_at = DateTime::now();

        self.store.save(&classroom).await?;
        Ok(classroom)
    }

    /// Enrolls the given accounts; already-enrolled accounts keep their grade.
    pub async fn add_members(
        &self,
        classroom_id: ObjectId,
        account_ids: &[String],
    ) -> CoreResult<Classroom> {
        let _guard = self.locks.lock(classroom_id).await;

        let mut classroom = self
            .store
            .find_by_id(classroom_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        roster::add_members(&mut classroom.members, account_ids);
        classroom.updated_at = DateTime::now();
        self.store.save(&classroom).await?;
        Ok(classroom)
    }

    /// Unenrolls the given accounts; absent accounts are silently skipped.
    pub async fn remove_members(
        &self,
        classroom_id: ObjectId,
        account_ids: &[String],
    ) -> CoreResult<Classroom> {
        let _guard = self.locks.lock(classroom_id).await;

        let mut classroom = self
            .store
            .find_by_id(classroom_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        roster::remove_members(&mut classroom.members, account_ids);
        classroom.updated_at = DateTime::now();
        self.store.save(&classroom).await?;
        Ok(classroom)
    }

    /// Live participants as the provider sees them. Requires a provisioned
    /// session.
    pub async fn participants(
        &self,
        classroom_id: ObjectId,
    ) -> CoreResult<Vec<ProviderParticipant>> {
        let classroom = self.get(classroom_id).await?;
        let session_id = classroom.external_session_id.as_deref().ok_or_else(|| {
            CoreError::InvalidInput("Classroom has no live session".into())
        })?;

        self.provider
            .list_participants(session_id)
            .await
            .map_err(|e| {
                warn!(classroom_id = %classroom_id, error = %e, "Participant listing failed");
                self.provider_err(e)
            })
    }
}
