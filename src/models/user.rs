use mongodb::bson::{self, Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::ApiError;

/// Campo de identificador atribuído pelo banco
pub const ID_FIELD: &str = "_id";

/// Campos livres enviados pelo cliente (POST e PUT). Qualquer objeto JSON é aceito.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct UserFields(pub Map<String, Value>);

impl UserFields {
    /// Converte para documento BSON, descartando qualquer `_id` do cliente:
    /// o identificador é sempre do banco e nunca muda.
    pub fn into_document(mut self) -> Result<Document, ApiError> {
        self.0.remove(ID_FIELD);
        bson::to_document(&self.0)
            .map_err(|e| ApiError::MalformedInput(format!("Unsupported value in request body: {}", e)))
    }
}

/// Documento de usuário como é devolvido pela API, com `_id` em hex.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct UserDocument(pub Map<String, Value>);

impl UserDocument {
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }
}

impl From<Document> for UserDocument {
    fn from(document: Document) -> Self {
        let mut fields = Map::new();
        for (key, value) in document {
            let json = match (key.as_str(), value) {
                (ID_FIELD, Bson::ObjectId(oid)) => Value::String(oid.to_hex()),
                (_, value) => value.into_relaxed_extjson(),
            };
            fields.insert(key, json);
        }
        UserDocument(fields)
    }
}
