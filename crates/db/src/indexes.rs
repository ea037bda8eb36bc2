use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Classrooms
    create_indexes(
        db,
        "classrooms",
        vec![
            index(bson::doc! { "university_id": 1 }),
            index(bson::doc! { "creator_account_id": 1, "university_id": 1 }),
            index(bson::doc! { "external_session_id": 1 }),
        ],
    )
    .await?;

    // Attendance records: one per (classroom, account, date)
    create_indexes(
        db,
        "attendances",
        vec![
            index_unique(bson::doc! { "classroom_id": 1, "account_id": 1, "date": 1 }),
            index(bson::doc! { "classroom_id": 1, "date": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
