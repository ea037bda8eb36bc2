//! Durable storage collaborator. The core talks to these traits; MongoDB
//! backs them in production and a DashMap-backed store in tests/local runs.
//! Either way, the per-aggregate lock arena supplies write serialization on
//! top of whatever single-document atomicity the store offers.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use aula_db::models::{AttendanceRecord, Classroom};
use bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ClassroomStore: Send + Sync {
    async fn insert(&self, classroom: &Classroom) -> StoreResult<ObjectId>;
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Classroom>>;
    async fn list_by_university(&self, university_id: &str) -> StoreResult<Vec<Classroom>>;
    async fn list_by_creator(
        &self,
        creator_account_id: &str,
        university_id: &str,
    ) -> StoreResult<Vec<Classroom>>;
    /// Whole-document replace keyed by `classroom.id`.
    async fn save(&self, classroom: &Classroom) -> StoreResult<()>;
    /// Returns false when no document with that id existed.
    async fn delete(&self, id: ObjectId) -> StoreResult<bool>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn insert(&self, record: &AttendanceRecord) -> StoreResult<ObjectId>;
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<AttendanceRecord>>;
    async fn find_by_triple(
        &self,
        classroom_id: ObjectId,
        account_id: &str,
        date: &str,
    ) -> StoreResult<Option<AttendanceRecord>>;
    async fn list_by_classroom(&self, classroom_id: ObjectId)
    -> StoreResult<Vec<AttendanceRecord>>;
    async fn list_by_classroom_and_date(
        &self,
        classroom_id: ObjectId,
        date: &str,
    ) -> StoreResult<Vec<AttendanceRecord>>;
    /// Whole-document replace keyed by `record.id`.
    async fn save(&self, record: &AttendanceRecord) -> StoreResult<()>;
}
