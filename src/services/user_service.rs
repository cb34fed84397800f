// ==================== USERS ====================
// Mapeamento direto requisição -> operação no MongoDB, sem cache nem retry

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::{
    config::StatusPolicy,
    database::UserStore,
    models::{UserDocument, UserFields},
    utils::ApiError,
};

/// Operações que recebem um id na URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdOperation {
    Get,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Updated,
    /// Documento encontrado mas nenhum campo mudou (só na política strict)
    Unchanged,
}

pub struct UserService {
    store: Arc<dyn UserStore>,
    policy: StatusPolicy,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, policy: StatusPolicy) -> Self {
        Self { store, policy }
    }

    fn parse_id(&self, raw_id: &str, operation: IdOperation) -> Result<ObjectId, ApiError> {
        ObjectId::parse_str(raw_id).map_err(|e| match (self.policy, operation) {
            (StatusPolicy::Strict, _) => ApiError::MalformedInput("Invalid user id".to_string()),
            (StatusPolicy::Legacy, IdOperation::Get) => ApiError::NotFound(raw_id.to_string()),
            (StatusPolicy::Legacy, _) => {
                ApiError::StoreIo(format!("invalid ObjectId '{}': {}", raw_id, e))
            }
        })
    }

    pub async fn list_users(&self) -> Result<Vec<UserDocument>, ApiError> {
        let documents = self.store.list().await?;
        Ok(documents.into_iter().map(UserDocument::from).collect())
    }

    /// Insere e relê o documento pelo `_id` atribuído, para devolver
    /// exatamente o que ficou gravado.
    pub async fn create_user(&self, fields: UserFields) -> Result<UserDocument, ApiError> {
        let document = fields.into_document()?;
        let id = self.store.insert(document).await?;

        match self.store.find(id).await? {
            Some(document) => Ok(UserDocument::from(document)),
            None => Err(ApiError::Connection(format!(
                "inserted user {} could not be read back",
                id.to_hex()
            ))),
        }
    }

    pub async fn get_user(&self, raw_id: &str) -> Result<UserDocument, ApiError> {
        let id = self.parse_id(raw_id, IdOperation::Get)?;

        self.store
            .find(id)
            .await?
            .map(UserDocument::from)
            .ok_or_else(|| ApiError::NotFound(raw_id.to_string()))
    }

    pub async fn update_user(&self, raw_id: &str, fields: UserFields) -> Result<UpdateStatus, ApiError> {
        let id = self.parse_id(raw_id, IdOperation::Update)?;
        let fields = fields.into_document()?;
        let outcome = self.store.merge(id, fields).await?;

        match self.policy {
            // "nada modificado" e "não encontrado" são indistinguíveis aqui
            StatusPolicy::Legacy if outcome.modified == 0 => Err(ApiError::NotFound(raw_id.to_string())),
            StatusPolicy::Legacy => Ok(UpdateStatus::Updated),
            StatusPolicy::Strict if outcome.matched == 0 => Err(ApiError::NotFound(raw_id.to_string())),
            StatusPolicy::Strict if outcome.modified == 0 => Ok(UpdateStatus::Unchanged),
            StatusPolicy::Strict => Ok(UpdateStatus::Updated),
        }
    }

    pub async fn delete_user(&self, raw_id: &str) -> Result<(), ApiError> {
        let id = self.parse_id(raw_id, IdOperation::Delete)?;

        match self.store.delete(id).await? {
            0 => Err(ApiError::NotFound(raw_id.to_string())),
            _ => Ok(()),
        }
    }

    pub async fn check_store(&self) -> Result<(), ApiError> {
        self.store.ping().await?;
        Ok(())
    }
}
