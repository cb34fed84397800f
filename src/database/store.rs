use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};

use super::{ConnectionManager, StoreError};

/// Resultado de um merge (`$set`) em um documento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Operações de persistência da coleção de usuários.
///
/// Cada método é uma única ida ao banco, sem retry.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Todos os documentos, na ordem natural do banco
    async fn list(&self) -> Result<Vec<Document>, StoreError>;

    /// Insere e devolve o `_id` atribuído pelo banco
    async fn insert(&self, document: Document) -> Result<ObjectId, StoreError>;

    async fn find(&self, id: ObjectId) -> Result<Option<Document>, StoreError>;

    /// Aplica os campos por cima do documento sem substituí-lo
    async fn merge(&self, id: ObjectId, fields: Document) -> Result<MergeOutcome, StoreError>;

    /// Remove no máximo um documento; devolve quantos foram removidos
    async fn delete(&self, id: ObjectId) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

pub struct MongoUserStore {
    connections: ConnectionManager,
}

impl MongoUserStore {
    pub fn new(connections: ConnectionManager) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn list(&self) -> Result<Vec<Document>, StoreError> {
        let collection = self.connections.acquire_collection().await?;
        let cursor = collection.find(doc! {}).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn insert(&self, document: Document) -> Result<ObjectId, StoreError> {
        let collection = self.connections.acquire_collection().await?;
        let result = collection.insert_one(document).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Io(format!("unexpected inserted id: {}", result.inserted_id)))
    }

    async fn find(&self, id: ObjectId) -> Result<Option<Document>, StoreError> {
        let collection = self.connections.acquire_collection().await?;
        Ok(collection.find_one(doc! { "_id": id }).await?)
    }

    async fn merge(&self, id: ObjectId, fields: Document) -> Result<MergeOutcome, StoreError> {
        let collection = self.connections.acquire_collection().await?;

        // O MongoDB rejeita `$set` vazio; só checa se o documento existe
        if fields.is_empty() {
            let exists = collection.find_one(doc! { "_id": id }).await?.is_some();
            return Ok(MergeOutcome {
                matched: u64::from(exists),
                modified: 0,
            });
        }

        let result = collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await?;

        Ok(MergeOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, StoreError> {
        let collection = self.connections.acquire_collection().await?;
        let result = collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.connections.ping().await
    }
}
