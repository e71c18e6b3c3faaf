use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection,
    bson::{Document, doc},
};
use tracing::{debug, info};

use crate::mapper::{document_to_json, inserted_id_string, json_to_document};
use crate::models::song::Song;
use crate::secrets::Secrets;
use crate::store::{SongStore, StoreError};

/// MongoDB-backed song collection.
#[derive(Clone, Debug)]
pub struct Database {
    collection: Collection<Document>,
}

impl Database {
    /// Connects and pings the server, so bad credentials or an unreachable
    /// host fail here rather than on the first request.
    pub async fn connect(secrets: &Secrets) -> Result<Self, StoreError> {
        info!("Connecting to URL: {}", secrets.redacted_database_url());

        let client = Client::with_uri_str(secrets.database_url()).await?;
        let database = client.database(&secrets.database_name);
        database.run_command(doc! { "ping": 1 }).await?;
        debug!(
            "database={} collection={}",
            secrets.database_name, secrets.collection_name
        );

        Ok(Self {
            collection: database.collection(&secrets.collection_name),
        })
    }

    fn by_id(id: i64) -> Document {
        doc! { "id": id }
    }
}

#[async_trait]
impl SongStore for Database {
    async fn replace_all(&self, songs: Vec<Song>) -> Result<(), StoreError> {
        let docs = songs
            .iter()
            .map(json_to_document)
            .collect::<Result<Vec<_>, _>>()?;

        self.collection.drop().await?;
        // insert_many rejects an empty batch
        if !docs.is_empty() {
            self.collection.insert_many(docs).await?;
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn find_all(&self) -> Result<Vec<Song>, StoreError> {
        let docs: Vec<Document> = self.collection.find(doc! {}).await?.try_collect().await?;
        Ok(docs.iter().map(document_to_json).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Song>, StoreError> {
        let doc = self.collection.find_one(Self::by_id(id)).await?;
        Ok(doc.as_ref().map(document_to_json))
    }

    async fn insert(&self, song: Song) -> Result<String, StoreError> {
        let result = self.collection.insert_one(json_to_document(&song)?).await?;
        Ok(inserted_id_string(&result.inserted_id))
    }

    async fn update(&self, id: i64, fields: Song) -> Result<(), StoreError> {
        let fields = json_to_document(&fields)?;
        self.collection
            .update_one(Self::by_id(id), doc! { "$set": fields })
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let result = self.collection.delete_one(Self::by_id(id)).await?;
        Ok(result.deleted_count)
    }
}
