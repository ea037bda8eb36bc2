//! DashMap-backed stores mirroring the Mongo implementations. Used by the
//! integration tests and local runs without a database; they honor the same
//! trait contracts, including the attendance triple uniqueness.

use async_trait::async_trait;
use aula_db::models::{AttendanceRecord, Classroom};
use bson::oid::ObjectId;
use dashmap::DashMap;

use super::{AttendanceStore, ClassroomStore, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryClassroomStore {
    docs: DashMap<ObjectId, Classroom>,
}

impl MemoryClassroomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClassroomStore for MemoryClassroomStore {
    async fn insert(&self, classroom: &Classroom) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        let mut stored = classroom.clone();
        stored.id = Some(id);
        self.docs.insert(id, stored);
        Ok(id)
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Classroom>> {
        Ok(self.docs.get(&id).map(|c| c.clone()))
    }

    async fn list_by_university(&self, university_id: &str) -> StoreResult<Vec<Classroom>> {
        Ok(self
            .docs
            .iter()
            .filter(|c| c.university_id == university_id)
            .map(|c| c.clone())
            .collect())
    }

    async fn list_by_creator(
        &self,
        creator_account_id: &str,
        university_id: &str,
    ) -> StoreResult<Vec<Classroom>> {
        Ok(self
            .docs
            .iter()
            .filter(|c| {
                c.creator_account_id == creator_account_id && c.university_id == university_id
            })
            .map(|c| c.clone())
            .collect())
    }

    async fn save(&self, classroom: &Classroom) -> StoreResult<()> {
        if let Some(id) = classroom.id {
            self.docs.insert(id, classroom.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> StoreResult<bool> {
        Ok(self.docs.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryAttendanceStore {
    docs: DashMap<ObjectId, AttendanceRecord>,
}

impl MemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    async fn insert(&self, record: &AttendanceRecord) -> StoreResult<ObjectId> {
        let duplicate = self.docs.iter().any(|r| {
            r.classroom_id == record.classroom_id
                && r.account_id == record.account_id
                && r.date == record.date
        });
        if duplicate {
            return Err(StoreError::DuplicateKey(format!(
                "attendance {}/{}/{}",
                record.classroom_id, record.account_id, record.date
            )));
        }

        let id = ObjectId::new();
        let mut stored = record.clone();
        stored.id = Some(id);
        self.docs.insert(id, stored);
        Ok(id)
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self.docs.get(&id).map(|r| r.clone()))
    }

    async fn find_by_triple(
        &self,
        classroom_id: ObjectId,
        account_id: &str,
        date: &str,
    ) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self
            .docs
            .iter()
            .find(|r| {
                r.classroom_id == classroom_id && r.account_id == account_id && r.date == date
            })
            .map(|r| r.clone()))
    }

    async fn list_by_classroom(
        &self,
        classroom_id: ObjectId,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        Ok(self
            .docs
            .iter()
            .filter(|r| r.classroom_id == classroom_id)
            .map(|r| r.clone())
            .collect())
    }

    async fn list_by_classroom_and_date(
        &self,
        classroom_id: ObjectId,
        date: &str,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        Ok(self
            .docs
            .iter()
            .filter(|r| r.classroom_id == classroom_id && r.date == date)
            .map(|r| r.clone())
            .collect())
    }

    async fn save(&self, record: &AttendanceRecord) -> StoreResult<()> {
        if let Some(id) = record.id {
            self.docs.insert(id, record.clone());
        }
        Ok(())
    }
}
