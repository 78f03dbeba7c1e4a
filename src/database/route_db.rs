use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection,
};

use super::{mongodb::MongoDatabase, DbError};
use crate::{data_types::record::RouteRecord, logln};

/// Computed routes, newest last.
pub struct RouteDB {
    db_conn: MongoDatabase,
}

impl RouteDB {
    const CC: &str = "RouteDB";
    const COLL_NAME: &str = "routes";

    pub async fn new(uri: &str, database: &str) -> Result<Self, DbError> {
        Ok(Self {
            db_conn: MongoDatabase::connect(uri, database).await?,
        })
    }

    fn typed_collection(&self) -> Collection<RouteRecord> {
        self.db_conn.typed_collection(RouteDB::COLL_NAME)
    }

    pub async fn insert(&self, record: &RouteRecord) -> Result<Option<ObjectId>, DbError> {
        let result = self.typed_collection().insert_one(record, None).await?;
        let id = result.inserted_id.as_object_id();

        logln!("Stored route {:?}", id);

        Ok(id)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<RouteRecord>, DbError> {
        self.db_conn
            .latest(&self.typed_collection(), doc! {}, "created_at", limit)
            .await
    }
}
