//! MongoDB client and typed collection wrapper.
//!
//! Collections apply their schema-declared indexes when opened, and every
//! insert stamps the document's metadata. Writes are per-document atomic;
//! there are no multi-document transactions anywhere in this crate.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::{
    options::{IndexOptions, ReturnDocument, UpdateModifications},
    results::UpdateResult,
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{error, info};

use crate::db::schemas::Metadata;
use crate::types::{PantryError, Result};

/// Trait for schemas that declare their index definitions.
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Trait for schemas with mutable metadata.
pub trait MutMetadata {
    fn mut_metadata(&mut self) -> &mut Metadata;
}

/// Counter document backing named sequence fields.
#[derive(Serialize, Deserialize)]
struct CounterDoc {
    _id: String,
    seq: i64,
}

/// MongoDB client wrapper.
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and verify the connection with a ping.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        info!("Connecting to MongoDB at {}", uri);

        // serverSelectionTimeoutMS keeps startup from hanging on an
        // unreachable MongoDB.
        let timeout_uri = if uri.contains('?') {
            format!("{uri}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000")
        } else {
            format!("{uri}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000")
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| PantryError::Database(format!("failed to connect to MongoDB: {e}")))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| PantryError::Database(format!("MongoDB ping failed: {e}")))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Open a typed collection, applying its declared indexes.
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + Default + IntoIndexes + MutMetadata,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }

    /// Atomically allocate the next value of a named sequence.
    ///
    /// Backed by a `counters` collection; the upsert makes the first
    /// allocation create the counter, so sequences start at 1.
    pub async fn next_sequence(&self, name: &str) -> Result<i64> {
        let counters: Collection<CounterDoc> =
            self.client.database(&self.db_name).collection("counters");

        let updated = counters
            .find_one_and_update(doc! { "_id": name }, doc! { "$inc": { "seq": 1i64 } })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| PantryError::Database(format!("sequence '{name}' update failed: {e}")))?
            .ok_or_else(|| {
                PantryError::Database(format!("sequence '{name}' returned no document"))
            })?;

        Ok(updated.seq)
    }
}

/// Typed MongoDB collection with automatic indexing.
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + Default + IntoIndexes + MutMetadata,
{
    async fn new(client: &Client, db_name: &str, collection_name: &str) -> Result<Self> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    async fn apply_indexes(&self) -> Result<()> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| PantryError::Database(format!("failed to create indexes: {e}")))?;

        Ok(())
    }

    /// Insert a document, stamping metadata timestamps.
    pub async fn insert_one(&self, mut item: T) -> Result<ObjectId> {
        let metadata = item.mut_metadata();
        metadata.created_at = Some(DateTime::now());
        metadata.updated_at = Some(DateTime::now());

        let result = self
            .inner
            .insert_one(item)
            .await
            .map_err(|e| PantryError::Database(format!("insert failed: {e}")))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| PantryError::Database("failed to get inserted ID".into()))
    }

    /// Find one document by filter.
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| PantryError::Database(format!("find failed: {e}")))
    }

    /// Find many documents by filter.
    pub async fn find_many(&self, filter: Document) -> Result<Vec<T>> {
        use futures_util::StreamExt;

        let cursor = self
            .inner
            .find(filter)
            .await
            .map_err(|e| PantryError::Database(format!("find failed: {e}")))?;

        let results: Vec<T> = cursor
            .filter_map(|doc| async {
                match doc {
                    Ok(d) => Some(d),
                    Err(e) => {
                        error!("Error reading document: {}", e);
                        None
                    }
                }
            })
            .collect()
            .await;

        Ok(results)
    }

    /// Update one document, bumping its metadata timestamp.
    pub async fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult> {
        let mut modifications = update.into();
        if let UpdateModifications::Document(ref mut d) = modifications {
            match d.get_document_mut("$set") {
                Ok(set) => {
                    set.insert("metadata.updated_at", DateTime::now());
                }
                Err(_) => {
                    d.insert("$set", doc! { "metadata.updated_at": DateTime::now() });
                }
            }
        }

        self.inner
            .update_one(filter, modifications)
            .await
            .map_err(|e| PantryError::Database(format!("update failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    // Integration tests require a running MongoDB instance.
}
