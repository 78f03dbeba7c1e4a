use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
    Client, Collection, Database,
};
use serde::de::DeserializeOwned;

use super::DbError;

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    database: Database,
}

impl MongoDatabase {
    pub async fn connect(uri: &str, name: &str) -> Result<Self, DbError> {
        let client = Client::with_uri_str(uri).await?;

        Ok(Self {
            database: client.database(name),
        })
    }

    pub fn typed_collection<T>(&self, name: &str) -> Collection<T> {
        self.database.collection(name)
    }

    // Documents matching `filter`, largest `field` first
    pub async fn latest<T: DeserializeOwned + Unpin + Send + Sync>(
        &self,
        collection: &Collection<T>,
        filter: Document,
        field: &str,
        limit: i64,
    ) -> Result<Vec<T>, DbError> {
        let cursor = collection
            .find(
                filter,
                FindOptions::builder()
                    .limit(limit)
                    .sort(doc! {field: -1})
                    .build(),
            )
            .await?;

        Ok(cursor.try_collect().await?)
    }
}
