use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use std::sync::RwLock;

use super::{MergeOutcome, StoreError, UserStore};

/// Store em memória com a mesma semântica observável do MongoDB
/// (ordem de inserção, contagem de campos modificados, delete único).
#[derive(Default)]
pub struct InMemoryUserStore {
    documents: RwLock<Vec<Document>>,
    offline: bool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store que falha toda operação como se o banco estivesse fora do ar
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Connection("connection refused".to_string()));
        }
        Ok(())
    }

    fn lock_poisoned() -> StoreError {
        StoreError::Io("in-memory store lock poisoned".to_string())
    }
}

fn has_id(document: &Document, id: &ObjectId) -> bool {
    document.get_object_id("_id").map(|oid| oid == *id).unwrap_or(false)
}

/// `$set` de um campo, onde `a.b.c` aponta para documentos aninhados.
/// Devolve `true` se o valor mudou.
fn set_path(document: &mut Document, path: &str, value: Bson) -> Result<bool, StoreError> {
    match path.split_once('.') {
        None => {
            if document.get(path) == Some(&value) {
                return Ok(false);
            }
            document.insert(path, value);
            Ok(true)
        }
        Some((head, rest)) => {
            if !document.contains_key(head) {
                document.insert(head, Document::new());
            }
            match document.get_mut(head) {
                Some(Bson::Document(inner)) => set_path(inner, rest, value),
                _ => Err(StoreError::Io(format!(
                    "Cannot create field '{}' in element {{{}}}",
                    rest, head
                ))),
            }
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self) -> Result<Vec<Document>, StoreError> {
        self.check_online()?;
        let documents = self.documents.read().map_err(|_| Self::lock_poisoned())?;
        Ok(documents.clone())
    }

    async fn insert(&self, document: Document) -> Result<ObjectId, StoreError> {
        self.check_online()?;
        let id = ObjectId::new();
        let mut stored = doc! { "_id": id };
        for (key, value) in document {
            stored.insert(key, value);
        }

        self.documents
            .write()
            .map_err(|_| Self::lock_poisoned())?
            .push(stored);
        Ok(id)
    }

    async fn find(&self, id: ObjectId) -> Result<Option<Document>, StoreError> {
        self.check_online()?;
        let documents = self.documents.read().map_err(|_| Self::lock_poisoned())?;
        Ok(documents.iter().find(|d| has_id(d, &id)).cloned())
    }

    async fn merge(&self, id: ObjectId, fields: Document) -> Result<MergeOutcome, StoreError> {
        self.check_online()?;
        let mut documents = self.documents.write().map_err(|_| Self::lock_poisoned())?;

        let Some(document) = documents.iter_mut().find(|d| has_id(d, &id)) else {
            return Ok(MergeOutcome { matched: 0, modified: 0 });
        };

        // Aplica numa cópia: se um caminho falhar, nada muda (como o `$set`)
        let mut updated = document.clone();
        let mut changed = false;
        for (key, value) in fields {
            changed |= set_path(&mut updated, &key, value)?;
        }
        *document = updated;

        Ok(MergeOutcome {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, StoreError> {
        self.check_online()?;
        let mut documents = self.documents.write().map_err(|_| Self::lock_poisoned())?;

        match documents.iter().position(|d| has_id(d, &id)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_merge_counts_only_real_changes() {
        let store = InMemoryUserStore::new();
        let id = store.insert(doc! { "name": "Alice", "age": 30_i64 }).await.unwrap();

        let same = store.merge(id, doc! { "age": 30_i64 }).await.unwrap();
        assert_eq!(same, MergeOutcome { matched: 1, modified: 0 });

        let changed = store.merge(id, doc! { "age": 31_i64, "city": "Lisboa" }).await.unwrap();
        assert_eq!(changed, MergeOutcome { matched: 1, modified: 1 });

        let stored = store.find(id).await.unwrap().unwrap();
        assert_eq!(stored.get_str("name").unwrap(), "Alice");
        assert_eq!(stored.get_i64("age").unwrap(), 31);
        assert_eq!(stored.get_str("city").unwrap(), "Lisboa");
    }

    #[tokio::test]
    async fn test_merge_resolves_dotted_paths() {
        let store = InMemoryUserStore::new();
        let id = store
            .insert(doc! { "name": "Alice", "address": { "city": "Recife", "zip": "50000" } })
            .await
            .unwrap();

        let changed = store.merge(id, doc! { "address.city": "Natal" }).await.unwrap();
        assert_eq!(changed, MergeOutcome { matched: 1, modified: 1 });

        let same = store.merge(id, doc! { "address.city": "Natal" }).await.unwrap();
        assert_eq!(same, MergeOutcome { matched: 1, modified: 0 });

        store.merge(id, doc! { "prefs.theme.color": "dark" }).await.unwrap();

        let stored = store.find(id).await.unwrap().unwrap();
        assert!(!stored.contains_key("address.city"));
        let address = stored.get_document("address").unwrap();
        assert_eq!(address.get_str("city").unwrap(), "Natal");
        assert_eq!(address.get_str("zip").unwrap(), "50000");
        let theme = stored.get_document("prefs").unwrap().get_document("theme").unwrap();
        assert_eq!(theme.get_str("color").unwrap(), "dark");
    }

    #[tokio::test]
    async fn test_merge_through_scalar_fails_without_partial_write() {
        let store = InMemoryUserStore::new();
        let id = store.insert(doc! { "name": "Alice", "age": 30_i64 }).await.unwrap();

        let result = store.merge(id, doc! { "name": "Bia", "age.years": 31_i64 }).await;
        assert!(matches!(result, Err(StoreError::Io(_))));

        let stored = store.find(id).await.unwrap().unwrap();
        assert_eq!(stored.get_str("name").unwrap(), "Alice");
        assert_eq!(stored.get_i64("age").unwrap(), 30);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = InMemoryUserStore::new();
        for name in ["a", "b", "c"] {
            store.insert(doc! { "name": name }).await.unwrap();
        }

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|d| d.get_str("name").unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_delete_removes_once() {
        let store = InMemoryUserStore::new();
        let id = store.insert(doc! { "name": "Alice" }).await.unwrap();

        assert_eq!(store.delete(id).await.unwrap(), 1);
        assert_eq!(store.delete(id).await.unwrap(), 0);
        assert!(store.find(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_offline_store_fails_with_connection_error() {
        let store = InMemoryUserStore::offline();
        assert!(matches!(store.list().await, Err(StoreError::Connection(_))));
        assert!(matches!(store.ping().await, Err(StoreError::Connection(_))));
    }
}
