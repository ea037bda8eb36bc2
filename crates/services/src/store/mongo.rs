use async_trait::async_trait;
use aula_db::models::{AttendanceRecord, Classroom};
use bson::{Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AttendanceStore, ClassroomStore, StoreError, StoreResult};

/// Thin typed wrapper over one collection; the stores below compose it.
pub struct BaseDao<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Unpin + Send + Sync,
{
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<T>(collection_name),
        }
    }

    pub async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<T>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_one(&self, filter: Document) -> StoreResult<Option<T>> {
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn find_many(&self, filter: Document, sort: Option<Document>) -> StoreResult<Vec<T>> {
        let mut cursor = if let Some(sort) = sort {
            self.collection.find(filter).sort(sort).await?
        } else {
            self.collection.find(filter).await?
        };

        let mut results = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            results.push(doc);
        }
        Ok(results)
    }

    pub async fn insert_one(&self, doc: &T) -> StoreResult<ObjectId> {
        let result = self.collection.insert_one(doc).await.map_err(|e| {
            if let mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(
                ref write_error,
            )) = *e.kind
            {
                if write_error.code == 11000 {
                    return StoreError::DuplicateKey(write_error.message.clone());
                }
            }
            StoreError::Mongo(e)
        })?;

        let id = result
            .inserted_id
            .as_object_id()
            .expect("inserted_id should be ObjectId");
        debug!(?id, "Inserted document");
        Ok(id)
    }

    pub async fn replace_one(&self, id: ObjectId, doc: &T) -> StoreResult<bool> {
        let result = self.collection.replace_one(doc! { "_id": id }, doc).await?;
        Ok(result.matched_count > 0)
    }

    pub async fn delete_one(&self, id: ObjectId) -> StoreResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

pub struct MongoClassroomStore {
    base: BaseDao<Classroom>,
}

impl MongoClassroomStore {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Classroom::COLLECTION),
        }
    }
}

#[async_trait]
impl ClassroomStore for MongoClassroomStore {
    async fn insert(&self, classroom: &Classroom) -> StoreResult<ObjectId> {
        self.base.insert_one(classroom).await
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Classroom>> {
        self.base.find_by_id(id).await
    }

    async fn list_by_university(&self, university_id: &str) -> StoreResult<Vec<Classroom>> {
        self.base
            .find_many(
                doc! { "university_id": university_id },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    async fn list_by_creator(
        &self,
        creator_account_id: &str,
        university_id: &str,
    ) -> StoreResult<Vec<Classroom>> {
        self.base
            .find_many(
                doc! {
                    "creator_account_id": creator_account_id,
                    "university_id": university_id,
                },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    async fn save(&self, classroom: &Classroom) -> StoreResult<()> {
        if let Some(id) = classroom.id {
            self.base.replace_one(id, classroom).await?;
        }
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> StoreResult<bool> {
        self.base.delete_one(id).await
    }
}

pub struct MongoAttendanceStore {
    base: BaseDao<AttendanceRecord>,
}

impl MongoAttendanceStore {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, AttendanceRecord::COLLECTION),
        }
    }
}

#[async_trait]
impl AttendanceStore for MongoAttendanceStore {
    async fn insert(&self, record: &AttendanceRecord) -> StoreResult<ObjectId> {
        self.base.insert_one(record).await
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<AttendanceRecord>> {
        self.base.find_by_id(id).await
    }

    async fn find_by_triple(
        &self,
        classroom_id: ObjectId,
        account_id: &str,
        date: &str,
    ) -> StoreResult<Option<AttendanceRecord>> {
        self.base
            .find_one(doc! {
                "classroom_id": classroom_id,
                "account_id": account_id,
                "date": date,
            })
            .await
    }

    async fn list_by_classroom(
        &self,
        classroom_id: ObjectId,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        self.base
            .find_many(
                doc! { "classroom_id": classroom_id },
                Some(doc! { "date": 1, "account_id": 1 }),
            )
            .await
    }

    async fn list_by_classroom_and_date(
        &self,
        classroom_id: ObjectId,
        date: &str,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        self.base
            .find_many(
                doc! { "classroom_id": classroom_id, "date": date },
                Some(doc! { "account_id": 1 }),
            )
            .await
    }

    async fn save(&self, record: &AttendanceRecord) -> StoreResult<()> {
        if let Some(id) = record.id {
            self.base.replace_one(id, record).await?;
        }
        Ok(())
    }
}
